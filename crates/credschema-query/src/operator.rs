//! # Operators and Condition Values
//!
//! The closed set of query operators, their wire symbols, and the table that
//! compiles an operator plus a value into the shape placed under an
//! attribute path in `credentialSubject`.
//!
//! | operator | wire form |
//! |---|---|
//! | `eq` | raw value |
//! | `neq`, `lt`, `gt`, `lte`, `gte` | `{ "$op": value }` |
//! | `in`, `nin` | `{ "$op": [values] }` (a scalar is wrapped) |
//! | `between`, `nonbetween` | `{ "$op": [from, to] }` (exactly two values) |
//! | `exists` | `{ "$exists": false }` for `false`/`"false"`, else `true` |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use credschema_core::{DataType, ScalarValue};

use crate::error::QueryError;

/// A query operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    Eq,
    Neq,
    In,
    Nin,
    Lt,
    Gt,
    Lte,
    Gte,
    Between,
    NonBetween,
    Exists,
}

impl Operator {
    /// Every operator, in menu order.
    pub fn all() -> &'static [Operator] {
        &[
            Self::Eq,
            Self::Neq,
            Self::In,
            Self::Nin,
            Self::Lt,
            Self::Gt,
            Self::Lte,
            Self::Gte,
            Self::Between,
            Self::NonBetween,
            Self::Exists,
        ]
    }

    /// Wire name used in condition items.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Lte => "lte",
            Self::Gte => "gte",
            Self::Between => "between",
            Self::NonBetween => "nonbetween",
            Self::Exists => "exists",
        }
    }

    /// Query-language key (`$eq`, `$ne`, ...).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Neq => "$ne",
            Self::In => "$in",
            Self::Nin => "$nin",
            Self::Lt => "$lt",
            Self::Gt => "$gt",
            Self::Lte => "$lte",
            Self::Gte => "$gte",
            Self::Between => "$between",
            Self::NonBetween => "$nonbetween",
            Self::Exists => "$exists",
        }
    }

    /// Human label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Self::Eq => "Is equal to",
            Self::Neq => "Is not equal to",
            Self::In => "Matches one of the values",
            Self::Nin => "Matches none of the values",
            Self::Lt => "Is less than",
            Self::Gt => "Is greater than",
            Self::Lte => "Is less than or equal to",
            Self::Gte => "Is greater than or equal to",
            Self::Between => "Falls within the range",
            Self::NonBetween => "Falls outside the range",
            Self::Exists => "Exists",
        }
    }

    /// Operators only V3 circuits can prove.
    pub fn requires_v3(self) -> bool {
        matches!(self, Self::Lte | Self::Gte | Self::Exists)
    }

    /// Whether the operand is a two-element range.
    pub fn is_range(self) -> bool {
        matches!(self, Self::Between | Self::NonBetween)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators offered for an attribute of the given type. `None` (no
/// attribute selected) offers everything.
pub fn available_operators(data_type: Option<DataType>) -> &'static [Operator] {
    use Operator as Op;
    match data_type {
        None | Some(DataType::Number) | Some(DataType::Integer) => Operator::all(),
        Some(DataType::String) | Some(DataType::Uri) => &[Op::Eq, Op::Neq, Op::Exists, Op::In, Op::Nin],
        Some(DataType::DateTime) => &[
            Op::Eq,
            Op::Neq,
            Op::Exists,
            Op::Lt,
            Op::Gt,
            Op::Lte,
            Op::Gte,
            Op::Between,
            Op::NonBetween,
        ],
        Some(DataType::Boolean) | Some(DataType::Object) => &[Op::Eq, Op::Neq, Op::Exists],
    }
}

/// Operand of a condition: one scalar, a two-element range, or a list.
///
/// Deserializes from any JSON scalar or flat array. Two-element arrays
/// become [`ConditionValue::Pair`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ConditionValue {
    Scalar(ScalarValue),
    Pair(ScalarValue, ScalarValue),
    List(Vec<ScalarValue>),
}

impl ConditionValue {
    /// Every scalar in the operand, in order. A scalar yields a single item.
    pub fn items(&self) -> Vec<ScalarValue> {
        match self {
            Self::Scalar(v) => vec![v.clone()],
            Self::Pair(a, b) => vec![a.clone(), b.clone()],
            Self::List(items) => items.clone(),
        }
    }

    /// The operand as a `[from, to]` range, if it has exactly two elements.
    pub fn as_range(&self) -> Option<(&ScalarValue, &ScalarValue)> {
        match self {
            Self::Pair(a, b) => Some((a, b)),
            Self::List(items) if items.len() == 2 => Some((&items[0], &items[1])),
            _ => None,
        }
    }

    /// `false` or the string `"false"`.
    pub fn is_false(&self) -> bool {
        match self {
            Self::Scalar(ScalarValue::Bool(b)) => !b,
            Self::Scalar(ScalarValue::String(s)) => s == "false",
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(v) => v.to_json(),
            Self::Pair(a, b) => json!([a.to_json(), b.to_json()]),
            Self::List(items) => Value::Array(items.iter().map(ScalarValue::to_json).collect()),
        }
    }
}

impl TryFrom<Value> for ConditionValue {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(members) => {
                let items = members
                    .iter()
                    .map(|m| {
                        ScalarValue::from_json(m)
                            .ok_or_else(|| QueryError::UnsupportedValue(m.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if let [from, to] = items.as_slice() {
                    return Ok(Self::Pair(from.clone(), to.clone()));
                }
                Ok(Self::List(items))
            }
            other => ScalarValue::from_json(&other)
                .map(Self::Scalar)
                .ok_or_else(|| QueryError::UnsupportedValue(other.to_string())),
        }
    }
}

impl From<ConditionValue> for Value {
    fn from(value: ConditionValue) -> Self {
        value.to_json()
    }
}

impl From<ScalarValue> for ConditionValue {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

/// Compile an operator and its operand into the wire shape.
///
/// Returns `None` when the operand does not fit the operator: a missing
/// value for anything but `exists`, or a range that is not exactly two
/// elements.
pub fn compile_operator(operator: Operator, value: Option<&ConditionValue>) -> Option<Value> {
    let keyed = |v: Value| {
        let mut wrapped = Map::new();
        wrapped.insert(operator.symbol().to_string(), v);
        Value::Object(wrapped)
    };
    match operator {
        Operator::Eq => value.map(ConditionValue::to_json),
        Operator::Neq | Operator::Lt | Operator::Gt | Operator::Lte | Operator::Gte => {
            value.map(|v| keyed(v.to_json()))
        }
        Operator::In | Operator::Nin => value.map(|v| {
            keyed(Value::Array(
                v.items().iter().map(ScalarValue::to_json).collect(),
            ))
        }),
        Operator::Between | Operator::NonBetween => {
            let (from, to) = value?.as_range()?;
            Some(keyed(json!([from.to_json(), to.to_json()])))
        }
        Operator::Exists => {
            let present = !value.is_some_and(ConditionValue::is_false);
            Some(keyed(Value::Bool(present)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: Value) -> ConditionValue {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn operator_wire_names() {
        assert_eq!(serde_json::to_value(Operator::NonBetween).unwrap(), json!("nonbetween"));
        let op: Operator = serde_json::from_value(json!("neq")).unwrap();
        assert_eq!(op, Operator::Neq);
        assert_eq!(op.symbol(), "$ne");
        assert_eq!(op.label(), "Is not equal to");
    }

    #[test]
    fn condition_value_shapes() {
        assert_eq!(value(json!("A")), ConditionValue::Scalar("A".into()));
        assert_eq!(
            value(json!([18, 65])),
            ConditionValue::Pair(18i64.into(), 65i64.into())
        );
        assert_eq!(
            value(json!(["A", "B", "C"])),
            ConditionValue::List(vec!["A".into(), "B".into(), "C".into()])
        );
        assert!(serde_json::from_value::<ConditionValue>(json!([[1]])).is_err());
        assert!(serde_json::from_value::<ConditionValue>(json!({"a": 1})).is_err());
        assert_eq!(serde_json::to_value(value(json!([1, 2]))).unwrap(), json!([1, 2]));
    }

    #[test]
    fn eq_is_the_raw_value() {
        assert_eq!(
            compile_operator(Operator::Eq, Some(&value(json!("Alice")))),
            Some(json!("Alice"))
        );
        assert_eq!(compile_operator(Operator::Eq, None), None);
    }

    #[test]
    fn comparison_operators_wrap_the_value() {
        assert_eq!(
            compile_operator(Operator::Neq, Some(&value(json!(5)))),
            Some(json!({"$ne": 5}))
        );
        assert_eq!(
            compile_operator(Operator::Gte, Some(&value(json!(18)))),
            Some(json!({"$gte": 18}))
        );
        assert_eq!(compile_operator(Operator::Lt, None), None);
    }

    #[test]
    fn membership_operators_always_use_arrays() {
        assert_eq!(
            compile_operator(Operator::In, Some(&value(json!(["A", "B"])))),
            Some(json!({"$in": ["A", "B"]}))
        );
        assert_eq!(
            compile_operator(Operator::Nin, Some(&value(json!("A")))),
            Some(json!({"$nin": ["A"]}))
        );
    }

    #[test]
    fn ranges_need_exactly_two_values() {
        assert_eq!(
            compile_operator(Operator::Between, Some(&value(json!([18, 65])))),
            Some(json!({"$between": [18, 65]}))
        );
        assert_eq!(
            compile_operator(Operator::NonBetween, Some(&value(json!([1, 2])))),
            Some(json!({"$nonbetween": [1, 2]}))
        );
        assert_eq!(compile_operator(Operator::Between, Some(&value(json!(18)))), None);
        assert_eq!(
            compile_operator(Operator::Between, Some(&value(json!([1, 2, 3])))),
            None
        );
        assert_eq!(compile_operator(Operator::Between, None), None);
    }

    #[test]
    fn exists_defaults_to_true() {
        let exists = |v: Option<ConditionValue>| compile_operator(Operator::Exists, v.as_ref());
        assert_eq!(exists(Some(value(json!(false)))), Some(json!({"$exists": false})));
        assert_eq!(exists(Some(value(json!("false")))), Some(json!({"$exists": false})));
        assert_eq!(exists(Some(value(json!(true)))), Some(json!({"$exists": true})));
        assert_eq!(exists(Some(value(json!("yes")))), Some(json!({"$exists": true})));
        assert_eq!(exists(None), Some(json!({"$exists": true})));
    }

    #[test]
    fn operators_by_data_type() {
        assert_eq!(available_operators(None).len(), 11);
        assert_eq!(available_operators(Some(DataType::Integer)).len(), 11);
        assert_eq!(
            available_operators(Some(DataType::Uri)),
            &[Operator::Eq, Operator::Neq, Operator::Exists, Operator::In, Operator::Nin]
        );
        assert_eq!(
            available_operators(Some(DataType::Boolean)),
            &[Operator::Eq, Operator::Neq, Operator::Exists]
        );
        let date_ops = available_operators(Some(DataType::DateTime));
        assert!(date_ops.contains(&Operator::Between));
        assert!(!date_ops.contains(&Operator::In));
    }

    #[test]
    fn v3_only_operators() {
        let v3: Vec<Operator> = Operator::all()
            .iter()
            .copied()
            .filter(|op| op.requires_v3())
            .collect();
        assert_eq!(v3, [Operator::Lte, Operator::Gte, Operator::Exists]);
    }
}
