//! # Verification Request Envelope
//!
//! Wraps a compiled [`ZkQuery`] into an iden3comm plain-JSON message.

use serde::{Deserialize, Serialize};

use crate::compiler::{build_query, ZkQuery};
use crate::state::{QueryBuilderState, VerificationType};

/// Media type of the envelope.
pub const PLAIN_JSON_TYP: &str = "application/iden3comm-plain-json";
/// Message type for off-chain verification.
pub const AUTHORIZATION_REQUEST_TYPE: &str = "https://iden3-communication.io/authorization/1.0/request";
/// Message type for on-chain verification.
pub const CONTRACT_REQUEST_TYPE: &str = "https://iden3-communication.io/proofs/1.0/contract-based-request";
/// `body.reason` when none is configured.
pub const DEFAULT_REASON: &str = "Query verification";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub id: String,
    pub typ: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub reason: String,
    pub query: ZkQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
}

/// Build the request with the default reason. `None` when the query is not
/// ready.
pub fn build_request(state: &QueryBuilderState, verifier_did: Option<&str>) -> Option<QueryRequest> {
    build_request_with(state, verifier_did, DEFAULT_REASON)
}

/// Build the request. The verifier DID is only attached to on-chain
/// requests.
pub fn build_request_with(
    state: &QueryBuilderState,
    verifier_did: Option<&str>,
    reason: &str,
) -> Option<QueryRequest> {
    let query = build_query(state)?;
    let on_chain = state.verification_type == VerificationType::OnChain;
    let message_type = if on_chain {
        CONTRACT_REQUEST_TYPE
    } else {
        AUTHORIZATION_REQUEST_TYPE
    };
    Some(QueryRequest {
        id: "1".to_string(),
        typ: PLAIN_JSON_TYP.to_string(),
        message_type: message_type.to_string(),
        body: RequestBody {
            reason: reason.to_string(),
            query,
            verifier: verifier_did
                .filter(|did| on_chain && !did.is_empty())
                .map(str::to_string),
        },
    })
}
