//! # Query Conditions
//!
//! A condition constrains one attribute of the credential with an operator
//! and a value; a selective disclosure asks for the attribute's value to be
//! revealed instead. Both target an attribute by a dot-separated path below
//! `credentialSubject`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use credschema_core::{Attribute, ScalarValue};

use crate::operator::{ConditionValue, Operator};

/// What a condition item asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    /// Constrain the attribute with an operator.
    #[default]
    Condition,
    /// Reveal the attribute's value.
    SelectiveDisclosure,
}

/// One user-authored condition or disclosure request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Dot path below `credentialSubject`, e.g. `address.country`.
    pub attribute_path: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<ConditionValue>,
}

impl ConditionItem {
    /// A condition with a fresh random id.
    pub fn condition(
        attribute_path: impl Into<String>,
        operator: Operator,
        value: Option<ConditionValue>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: ConditionKind::Condition,
            attribute_path: attribute_path.into(),
            operator,
            value,
        }
    }

    /// A selective disclosure with a fresh random id.
    pub fn disclosure(attribute_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: ConditionKind::SelectiveDisclosure,
            attribute_path: attribute_path.into(),
            operator: Operator::Eq,
            value: None,
        }
    }

    pub fn is_disclosure(&self) -> bool {
        self.kind == ConditionKind::SelectiveDisclosure
    }
}

/// Partial update for a condition. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub kind: Option<ConditionKind>,
    pub attribute_path: Option<String>,
    pub operator: Option<Operator>,
    /// `Some(None)` clears the value.
    pub value: Option<Option<ConditionValue>>,
}

impl ConditionPatch {
    pub(crate) fn apply(self, item: &mut ConditionItem) {
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(path) = self.attribute_path {
            item.attribute_path = path;
        }
        if let Some(operator) = self.operator {
            item.operator = operator;
        }
        if let Some(value) = self.value {
            item.value = value;
        }
    }
}

/// Human sentence for a condition, e.g. `Age is greater than 18`.
///
/// Uses the attribute's title (or name) when the attribute is known, and
/// the raw path otherwise.
pub fn describe_condition(condition: &ConditionItem, attribute: Option<&Attribute>) -> String {
    let subject = attribute
        .map(|a| if a.title.is_empty() { a.name.as_str() } else { a.title.as_str() })
        .unwrap_or(condition.attribute_path.as_str());

    if condition.is_disclosure() {
        return format!("{subject} value will be revealed");
    }

    let operator = condition.operator;
    let phrase = operator.label().to_lowercase();
    if operator == Operator::Exists {
        return if condition.value.as_ref().is_some_and(ConditionValue::is_false) {
            format!("{subject} does not exist in the credential")
        } else {
            format!("{subject} {phrase} in the credential")
        };
    }

    let value_text = match (&condition.value, operator) {
        (Some(value), Operator::In | Operator::Nin) => join(&value.items()),
        (value, op) if op.is_range() => match value.as_ref().and_then(ConditionValue::as_range) {
            Some((from, to)) => format!("{from}, {to}"),
            None => "0, 0".to_string(),
        },
        (Some(value), _) => join(&value.items()),
        (None, _) => String::new(),
    };
    format!("{subject} {phrase} {value_text}").trim_end().to_string()
}

fn join(values: &[ScalarValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
