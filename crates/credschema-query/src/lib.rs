//! # credschema-query: Zero-Knowledge Query Compiler
//!
//! Compiles a verifier's query form into iden3-style ZK proof queries.
//!
//! - [`build_query`] produces one combined [`ZkQuery`].
//! - [`build_query_objects`] produces one [`QueryObject`] per condition,
//!   linking them into a group when there is more than one.
//! - [`build_request`] wraps the query in an iden3comm request envelope.
//!
//! Authoring edits go through [`QuerySession`]. The compiler functions are
//! pure over a [`QueryBuilderState`] apart from the clock that stamps query
//! object ids.
//!
//! ## Readiness
//!
//! An incomplete form is not an error. Every compiler entry point answers
//! `None` (or an empty vector) until the schema reference and at least one
//! usable condition are present.

pub mod circuit;
pub mod compiler;
pub mod condition;
pub mod error;
pub mod operator;
pub mod reference;
pub mod request;
pub mod session;
pub mod state;

pub use circuit::{
    available_circuits, is_on_chain_circuit, is_v3_circuit, map_circuit_id, CircuitId, ProofType,
    LINKED_MULTI_QUERY_CIRCUIT,
};
pub use compiler::{
    build_query, build_query_objects, build_query_objects_with, QueryClock, QueryObject,
    SystemClock, ZkQuery,
};
pub use condition::{describe_condition, ConditionItem, ConditionKind, ConditionPatch};
pub use error::QueryError;
pub use operator::{available_operators, compile_operator, ConditionValue, Operator};
pub use reference::{
    extract_json_ld_context, extract_schema_type, ipfs_gateway_url, is_valid_http_url,
    is_valid_ipfs_url,
};
pub use request::{build_request, build_request_with, QueryRequest, RequestBody, DEFAULT_REASON};
pub use session::QuerySession;
pub use state::{Network, QueryBuilderState, QueryType, VerificationType};
