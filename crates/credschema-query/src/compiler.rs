//! # Query Compiler
//!
//! Turns a [`QueryBuilderState`] into the wire shapes consumed by verifiers:
//! a single combined [`ZkQuery`], or one [`QueryObject`] per condition.
//!
//! ## Readiness
//!
//! The compiler never fails. A state that is missing its schema reference,
//! or that yields no usable condition, compiles to `None` (or an empty
//! vector for [`build_query_objects`]). Callers treat that as "not ready".
//!
//! ## Identifiers
//!
//! Query object ids are millisecond timestamps read from a [`QueryClock`].
//! One reading is taken per call: entry `i` gets `now + i`, and a linked
//! group shares `groupId = now`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::circuit::map_circuit_id;
use crate::condition::ConditionItem;
use crate::operator::compile_operator;
use crate::state::{QueryBuilderState, QueryType};

/// A zero-knowledge proof query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkQuery {
    /// JSON-LD context URL of the credential schema.
    pub context: String,
    /// Credential type within that context.
    #[serde(rename = "type")]
    pub credential_type: String,
    pub allowed_issuers: Vec<String>,
    /// Present only as `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_claim_revocation_check: Option<bool>,
    /// Attribute path to compiled operator, `{}` for a disclosure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_subject: Option<Map<String, Value>>,
}

impl ZkQuery {
    fn base(state: &QueryBuilderState) -> Self {
        Self {
            context: state.json_ld_context_url.clone(),
            credential_type: state.schema_type.clone(),
            allowed_issuers: state.allowed_issuers(),
            skip_claim_revocation_check: state.skip_revocation_check.then_some(true),
            credential_subject: None,
        }
    }
}

/// One entry of the structured per-condition output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryObject {
    pub circuit_id: String,
    pub id: u64,
    pub query: ZkQuery,
    /// Shared by every entry of a linked group except the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
}

/// Source of the millisecond timestamps used as query ids.
pub trait QueryClock {
    fn now_millis(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl QueryClock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
    }
}

/// Compile the state into one combined query.
///
/// `credentialIssued` yields an empty `credentialSubject` without looking at
/// conditions. Otherwise every condition contributes its attribute path;
/// a later condition on the same path replaces the earlier one. With no
/// conditions at all, the legacy single `operator`/`attributeValue` pair on
/// `selectedAttributePath` is used.
pub fn build_query(state: &QueryBuilderState) -> Option<ZkQuery> {
    if !state.has_schema_reference() {
        return None;
    }
    let mut query = ZkQuery::base(state);

    if state.query_type == QueryType::CredentialIssued {
        query.credential_subject = Some(Map::new());
        return Some(query);
    }

    if state.conditions.is_empty() {
        let operator = state.operator?;
        let path = state.selected_attribute_path.as_deref().filter(|p| !p.is_empty())?;
        let compiled = compile_operator(operator, state.attribute_value.as_ref())?;
        let mut subject = Map::new();
        subject.insert(path.to_string(), compiled);
        query.credential_subject = Some(subject);
        return Some(query);
    }

    let mut subject = Map::new();
    for condition in &state.conditions {
        let Some(compiled) = compile_condition(condition) else {
            tracing::debug!(
                condition = %condition.id,
                operator = %condition.operator,
                "skipping condition whose value does not fit its operator"
            );
            continue;
        };
        if subject.contains_key(&condition.attribute_path) {
            tracing::debug!(
                path = %condition.attribute_path,
                "later condition replaces an earlier one on the same attribute"
            );
        }
        subject.insert(condition.attribute_path.clone(), compiled);
    }

    if subject.is_empty() {
        return None;
    }
    query.credential_subject = Some(subject);
    Some(query)
}

/// Compile the state into one query object per condition, ids from the
/// wall clock.
pub fn build_query_objects(state: &QueryBuilderState) -> Vec<QueryObject> {
    build_query_objects_with(state, &SystemClock)
}

/// Compile the state into one query object per condition.
///
/// `credentialIssued` yields a single object whose query has no
/// `credentialSubject`. With more than one condition the objects form a
/// linked group: all use the linked-query circuit, and all but the first
/// carry the group id. A condition whose value does not compile still gets
/// an object, with an empty `credentialSubject`.
pub fn build_query_objects_with(state: &QueryBuilderState, clock: &dyn QueryClock) -> Vec<QueryObject> {
    if !state.has_schema_reference() {
        return Vec::new();
    }
    let now = clock.now_millis();

    if state.query_type == QueryType::CredentialIssued {
        return vec![QueryObject {
            circuit_id: map_circuit_id(state.circuit_id, state.proof_type, false).to_string(),
            id: now,
            query: ZkQuery::base(state),
            group_id: None,
        }];
    }

    let linked = state.conditions.len() > 1;
    let circuit_id = map_circuit_id(state.circuit_id, state.proof_type, linked);
    let group_id = linked.then_some(now);

    state
        .conditions
        .iter()
        .enumerate()
        .map(|(index, condition)| {
            let mut subject = Map::new();
            match compile_condition(condition) {
                Some(compiled) => {
                    subject.insert(condition.attribute_path.clone(), compiled);
                }
                None => tracing::debug!(
                    condition = %condition.id,
                    "condition value does not fit its operator; emitting empty subject"
                ),
            }
            QueryObject {
                circuit_id: circuit_id.to_string(),
                id: now + index as u64,
                query: ZkQuery {
                    credential_subject: Some(subject),
                    ..ZkQuery::base(state)
                },
                group_id: group_id.filter(|_| index > 0),
            }
        })
        .collect()
}

fn compile_condition(condition: &ConditionItem) -> Option<Value> {
    if condition.is_disclosure() {
        return Some(Value::Object(Map::new()));
    }
    compile_operator(condition.operator, condition.value.as_ref())
}
