//! # Credential Subject Validation
//!
//! Checks a credential subject document against the `credentialSubject`
//! schema of a generated credential schema, using the `jsonschema` crate
//! (Draft 2020-12).
//!
//! Generated schemas use the authoring types `uri` and `date-time` in the
//! `type` keyword, which JSON Schema does not define. Both are lowered to
//! `string` before the validator is compiled; the accompanying `format`
//! keyword carries the remaining meaning.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::generator::JSON_SCHEMA_DRAFT;

/// One way a credential subject fails its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted attribute path inside the subject (`address.country`).
    /// Empty when the subject itself is at fault.
    pub attribute_path: String,
    /// The JSON Schema keyword that rejected the value (`minimum`,
    /// `required`, `format`, ...).
    pub keyword: String,
    /// Validator message.
    pub message: String,
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        Self {
            attribute_path: attribute_path(&error.instance_path.to_string()),
            keyword: schema_path.rsplit('/').next().unwrap_or_default().to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attribute = if self.attribute_path.is_empty() {
            "credentialSubject"
        } else {
            self.attribute_path.as_str()
        };
        write!(f, "  {attribute}: {} [{}]", self.message, self.keyword)
    }
}

/// Turn a JSON Pointer into a dotted attribute path.
fn attribute_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Every violation found in one credential subject, in validator order.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false for a reported failure.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations, in validator order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations reported against one attribute path.
    pub fn for_attribute<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.attribute_path == path)
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Extract `properties.credentialSubject` from a credential schema and make
/// it a standalone Draft 2020-12 schema.
pub fn credential_subject_schema(schema: &Value) -> Result<Value, SchemaError> {
    let subject = schema
        .get("properties")
        .and_then(|p| p.get("credentialSubject"))
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::NotACredentialSchema {
            reason: "missing properties.credentialSubject object".to_string(),
        })?;

    let mut lowered = lower_authoring_types(subject);
    lowered.insert("$schema".to_string(), Value::String(JSON_SCHEMA_DRAFT.to_string()));
    Ok(Value::Object(lowered))
}

fn lower_authoring_types(schema: &Map<String, Value>) -> Map<String, Value> {
    schema
        .iter()
        .map(|(key, value)| {
            let value = match (key.as_str(), value) {
                ("type", Value::String(t)) if t == "uri" || t == "date-time" => {
                    Value::String("string".to_string())
                }
                ("properties", Value::Object(props)) => Value::Object(
                    props
                        .iter()
                        .map(|(name, prop)| {
                            let prop = match prop {
                                Value::Object(p) => Value::Object(lower_authoring_types(p)),
                                other => other.clone(),
                            };
                            (name.clone(), prop)
                        })
                        .collect(),
                ),
                _ => value.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Validate a credential subject against a generated credential schema.
///
/// # Errors
///
/// Returns [`SchemaError::ValidationFailed`] with every violation when the
/// subject does not conform, [`SchemaError::NotACredentialSchema`] when the
/// schema has no `credentialSubject`, and [`SchemaError::ValidatorBuild`]
/// when the lowered schema does not compile.
pub fn validate_credential_subject(schema: &Value, subject: &Value) -> Result<(), SchemaError> {
    let subject_schema = credential_subject_schema(schema)?;

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    let validator = opts
        .build(&subject_schema)
        .map_err(|e| SchemaError::ValidatorBuild {
            reason: e.to_string(),
        })?;

    let violations: Vec<Violation> = validator
        .iter_errors(subject)
        .map(|e| Violation::from_error(&e))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::ValidationFailed {
            violations: ValidationViolations { violations },
        })
    }
}
