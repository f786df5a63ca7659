//! # credschema-core: Attribute Tree Model
//!
//! This crate is the leaf of the credschema workspace. It defines the data
//! model shared by the schema generator, the schema importer, and the query
//! compiler: a credential's attribute tree, the schema metadata that travels
//! with it, and the authoring rules that keep the tree well-formed.
//!
//! ## Key Design Principles
//!
//! 1. **Owned value tree.** The root `credentialSubject` attribute owns its
//!    subtree through ordered `children` vectors. `parent_id` is a lookup key
//!    only, never a pointer.
//!
//! 2. **Closed enumerations.** `DataType` and `CredentialType` are exhaustive
//!    enums. Every format, XSD, and operator mapping downstream is a `match`.
//!
//! 3. **Explicit sessions.** Authoring state lives in a [`SchemaSession`]
//!    value passed by reference. There is no process-wide store.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credschema-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![deny(missing_docs)]

pub mod attribute;
pub mod error;
pub mod metadata;
pub mod rules;
pub mod session;
pub mod value;

pub use attribute::{
    find_credential_subject, Attribute, AttributeConstraints, DataType,
    CREDENTIAL_SUBJECT_ID, SUBJECT_ID_ATTRIBUTE_ID,
};
pub use error::ModelError;
pub use metadata::{CredentialType, SchemaMetadata, NON_MERKLIZED_ATTRIBUTE_LIMIT};
pub use session::{AttributeDraft, AttributePatch, AuthoringStep, SchemaSession, SchemaSnapshot};
pub use value::ScalarValue;
