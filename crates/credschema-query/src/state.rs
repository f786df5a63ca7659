//! # Query Builder State
//!
//! Session-scoped configuration consumed by the compiler: schema reference,
//! proof configuration, query type, issuer, and verification target.

use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitId, ProofType};
use crate::condition::ConditionItem;
use crate::operator::{ConditionValue, Operator};

/// What the verifier wants proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryType {
    /// Constraints on attribute values.
    #[default]
    Condition,
    /// Attribute values to reveal.
    SelectiveDisclosure,
    /// Only that a credential of the type was issued.
    CredentialIssued,
}

impl QueryType {
    /// `condition` and `selectiveDisclosure` share a condition list;
    /// `credentialIssued` has none.
    pub fn uses_conditions(self) -> bool {
        !matches!(self, Self::CredentialIssued)
    }
}

/// Where the proof is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationType {
    #[default]
    OffChain,
    OnChain,
}

/// Target network for on-chain verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    PolygonMainnet,
    PolygonAmoy,
}

/// Everything the compiler reads.
///
/// Missing fields take their defaults when deserialized, so a state file
/// only needs the fields it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryBuilderState {
    pub json_ld_context_url: String,
    pub schema_type: String,
    /// Attribute path for the single legacy condition.
    pub selected_attribute_path: Option<String>,

    pub proof_type: Option<ProofType>,
    pub circuit_id: Option<CircuitId>,
    /// V3 circuits only.
    pub enable_proof_of_uniqueness: bool,
    pub nullifier_session_id: String,

    pub query_type: QueryType,
    /// Legacy single-condition operator, used when `conditions` is empty.
    pub operator: Option<Operator>,
    /// Legacy single-condition operand.
    pub attribute_value: Option<ConditionValue>,

    /// Allowed issuer DID; empty or `*` allows any issuer.
    pub issuer_did: String,
    pub skip_revocation_check: bool,

    pub verification_type: VerificationType,
    pub network: Option<Network>,
    pub request_id: String,
    pub contract_address: String,

    pub conditions: Vec<ConditionItem>,
}

impl Default for QueryBuilderState {
    fn default() -> Self {
        Self {
            json_ld_context_url: String::new(),
            schema_type: String::new(),
            selected_attribute_path: None,
            proof_type: Some(ProofType::Sig),
            circuit_id: Some(CircuitId::V3),
            enable_proof_of_uniqueness: false,
            nullifier_session_id: String::new(),
            query_type: QueryType::Condition,
            operator: None,
            attribute_value: None,
            issuer_did: String::new(),
            skip_revocation_check: false,
            verification_type: VerificationType::OffChain,
            network: None,
            request_id: String::new(),
            contract_address: String::new(),
            conditions: Vec::new(),
        }
    }
}

impl QueryBuilderState {
    /// Both parts of the schema reference are set.
    pub fn has_schema_reference(&self) -> bool {
        !self.json_ld_context_url.is_empty() && !self.schema_type.is_empty()
    }

    /// `allowedIssuers` value: the configured DID, or `*`.
    pub fn allowed_issuers(&self) -> Vec<String> {
        if self.issuer_did.is_empty() || self.issuer_did == "*" {
            vec!["*".to_string()]
        } else {
            vec![self.issuer_did.clone()]
        }
    }
}
