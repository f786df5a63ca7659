//! # Query Authoring Session
//!
//! [`QuerySession`] owns one [`QueryBuilderState`] plus the attribute tree of
//! the credential being queried, and exposes the edits the query form makes.
//! Compilation delegates to [`crate::compiler`] and [`crate::request`].

use serde_json::Value;

use credschema_core::Attribute;

use crate::circuit::{CircuitId, ProofType};
use crate::compiler::{self, QueryClock, QueryObject, ZkQuery};
use crate::condition::{ConditionItem, ConditionPatch};
use crate::error::QueryError;
use crate::operator::{available_operators, ConditionValue, Operator};
use crate::reference::{extract_json_ld_context, extract_schema_type};
use crate::request::{self, QueryRequest};
use crate::state::{Network, QueryBuilderState, QueryType, VerificationType};

/// Query-side authoring state.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySession {
    state: QueryBuilderState,
    attributes: Vec<Attribute>,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    /// Default state with the bare `credentialSubject` tree.
    pub fn new() -> Self {
        Self::from_state(QueryBuilderState::default())
    }

    /// Resume from a saved state, with the bare `credentialSubject` tree.
    pub fn from_state(state: QueryBuilderState) -> Self {
        Self {
            state,
            attributes: vec![Attribute::credential_subject()],
        }
    }

    /// The form state the compiler reads.
    pub fn state(&self) -> &QueryBuilderState {
        &self.state
    }

    /// Back to [`QuerySession::new`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// JSON-LD context URL of the queried schema.
    pub fn set_json_ld_context_url(&mut self, url: impl Into<String>) {
        self.state.json_ld_context_url = url.into();
    }

    /// Credential type of the queried schema.
    pub fn set_schema_type(&mut self, schema_type: impl Into<String>) {
        self.state.schema_type = schema_type.into();
    }

    /// Attribute the legacy single condition applies to.
    ///
    /// A new path clears the operand. The operator is also cleared when the
    /// attribute's type does not offer it.
    pub fn set_selected_attribute_path(&mut self, path: Option<String>) {
        if path == self.state.selected_attribute_path {
            return;
        }
        self.state.selected_attribute_path = path;
        self.state.attribute_value = None;

        let data_type = self
            .state
            .selected_attribute_path
            .as_deref()
            .and_then(|p| self.query_attribute(p))
            .map(|attr| attr.data_type);
        if let Some(operator) = self.state.operator {
            if !available_operators(data_type).contains(&operator) {
                self.state.operator = None;
            }
        }
    }

    /// Operator of the legacy single condition. An operand whose shape the
    /// new operator cannot take is dropped; `exists` drops any operand.
    pub fn set_operator(&mut self, operator: Option<Operator>) {
        self.state.operator = operator;
        let keep = match (operator, &self.state.attribute_value) {
            (_, None) | (None, _) => true,
            (Some(op), Some(value)) => operand_fits(op, value),
        };
        if !keep {
            self.state.attribute_value = None;
        }
    }

    /// Operand of the legacy single condition.
    pub fn set_attribute_value(&mut self, value: Option<ConditionValue>) {
        self.state.attribute_value = value;
    }

    /// Proof type; `None` offers every circuit.
    pub fn set_proof_type(&mut self, proof_type: Option<ProofType>) {
        self.state.proof_type = proof_type;
    }

    /// Circuit that proves the query.
    pub fn set_circuit_id(&mut self, circuit_id: Option<CircuitId>) {
        self.state.circuit_id = circuit_id;
    }

    /// Proof of uniqueness and its nullifier session id.
    pub fn set_proof_of_uniqueness(&mut self, enabled: bool, nullifier_session_id: impl Into<String>) {
        self.state.enable_proof_of_uniqueness = enabled;
        self.state.nullifier_session_id = nullifier_session_id.into();
    }

    /// Switching between `credentialIssued` and the condition family drops
    /// the condition list. Moving between `condition` and
    /// `selectiveDisclosure` keeps it.
    pub fn set_query_type(&mut self, query_type: QueryType) {
        if query_type.uses_conditions() != self.state.query_type.uses_conditions() {
            self.state.conditions.clear();
        }
        self.state.query_type = query_type;
    }

    /// Allowed issuer DID. Empty allows any issuer.
    pub fn set_issuer_did(&mut self, did: impl Into<String>) {
        self.state.issuer_did = did.into();
    }

    /// Skip the issuer's revocation check.
    pub fn set_skip_revocation_check(&mut self, skip: bool) {
        self.state.skip_revocation_check = skip;
    }

    /// Off-chain or on-chain verification.
    pub fn set_verification_type(&mut self, verification_type: VerificationType) {
        self.state.verification_type = verification_type;
    }

    /// On-chain target. Carried in the state for the form; the compiled
    /// query does not include it.
    pub fn set_on_chain_target(
        &mut self,
        network: Option<Network>,
        request_id: impl Into<String>,
        contract_address: impl Into<String>,
    ) {
        self.state.network = network;
        self.state.request_id = request_id.into();
        self.state.contract_address = contract_address.into();
    }

    /// Fill the schema reference from a fetched JSON-LD document.
    ///
    /// The context URL is replaced only when the document names one; the
    /// type only when one is found.
    pub fn apply_schema_document(&mut self, document: &Value) {
        if let Some(context) = extract_json_ld_context(document) {
            self.state.json_ld_context_url = context;
        }
        if let Some(schema_type) = extract_schema_type(document) {
            self.state.schema_type = schema_type;
        }
    }

    // -- attribute tree --------------------------------------------------

    /// Attribute tree of the queried credential.
    pub fn query_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Replace the attribute tree, usually from an imported schema.
    pub fn set_query_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }

    /// Look up an attribute by dot path. `credentialSubject` segments are
    /// ignored, and each segment matches by name or id anywhere below the
    /// previous match.
    pub fn query_attribute(&self, path: &str) -> Option<&Attribute> {
        let mut segments = path
            .split('.')
            .filter(|segment| !segment.is_empty() && *segment != "credentialSubject");
        let first = segments.next()?;
        let mut current = find_by_segment(&self.attributes, first)?;
        for segment in segments {
            current = find_by_segment(current.children(), segment)?;
        }
        Some(current)
    }

    // -- conditions ------------------------------------------------------

    /// Conditions in insertion order.
    pub fn conditions(&self) -> &[ConditionItem] {
        &self.state.conditions
    }

    /// Append a condition. Ids are unique within the session.
    pub fn add_condition(&mut self, condition: ConditionItem) -> Result<(), QueryError> {
        if self.state.conditions.iter().any(|c| c.id == condition.id) {
            return Err(QueryError::DuplicateCondition(condition.id));
        }
        self.state.conditions.push(condition);
        Ok(())
    }

    /// Apply a partial edit to the condition with this id.
    pub fn update_condition(&mut self, id: &str, patch: ConditionPatch) -> Result<(), QueryError> {
        let condition = self
            .state
            .conditions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| QueryError::ConditionNotFound(id.to_string()))?;
        patch.apply(condition);
        Ok(())
    }

    /// Remove and return the condition with this id.
    pub fn remove_condition(&mut self, id: &str) -> Result<ConditionItem, QueryError> {
        let index = self
            .state
            .conditions
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| QueryError::ConditionNotFound(id.to_string()))?;
        Ok(self.state.conditions.remove(index))
    }

    /// Drop every condition.
    pub fn clear_conditions(&mut self) {
        self.state.conditions.clear();
    }

    // -- compilation -----------------------------------------------------

    /// See [`compiler::build_query`].
    pub fn build_query(&self) -> Option<ZkQuery> {
        compiler::build_query(&self.state)
    }

    /// See [`compiler::build_query_objects`].
    pub fn build_query_objects(&self) -> Vec<QueryObject> {
        compiler::build_query_objects(&self.state)
    }

    /// See [`compiler::build_query_objects_with`].
    pub fn build_query_objects_with(&self, clock: &dyn QueryClock) -> Vec<QueryObject> {
        compiler::build_query_objects_with(&self.state, clock)
    }

    /// See [`request::build_request`].
    pub fn build_request(&self, verifier_did: Option<&str>) -> Option<QueryRequest> {
        request::build_request(&self.state, verifier_did)
    }
}

/// Whether an operand already has the shape the operator takes.
fn operand_fits(operator: Operator, value: &ConditionValue) -> bool {
    match operator {
        Operator::Exists => false,
        Operator::In | Operator::Nin => {
            matches!(value, ConditionValue::List(_) | ConditionValue::Pair(..))
        }
        Operator::Between | Operator::NonBetween => value.as_range().is_some(),
        _ => matches!(value, ConditionValue::Scalar(_)),
    }
}

/// Depth-first search for the first attribute whose name or id is `segment`.
fn find_by_segment<'a>(attributes: &'a [Attribute], segment: &str) -> Option<&'a Attribute> {
    attributes.iter().find_map(|attr| {
        if attr.name == segment || attr.id == segment {
            Some(attr)
        } else {
            find_by_segment(attr.children(), segment)
        }
    })
}
