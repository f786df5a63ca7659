//! # Schema Importer
//!
//! Inverse of the generator: reads an external JSON Schema and rebuilds the
//! attribute tree and metadata.
//!
//! ## Narrowing Rules
//!
//! - A `type` array resolves to its first member that is neither `array`
//!   nor `null`. Properties left with `array`, `null`, or an unrecognised
//!   type are dropped and logged at `warn`.
//! - A missing `type` means `string`.
//! - Object-level `required` arrays are not consulted. Every imported
//!   attribute has `required: false`.
//! - The source `credentialSubject.properties.id` is ignored; a fresh
//!   system `id` attribute is always synthesized.
//! - Only the numeric range constraints, numeric `default`, and `format`
//!   are carried over.

use serde_json::{Map, Number, Value};

use credschema_core::{
    Attribute, AttributeConstraints, CredentialType, DataType, ScalarValue, SchemaMetadata,
    SchemaSnapshot, CREDENTIAL_SUBJECT_ID,
};

use crate::error::ImportError;

const DEFAULT_TITLE: &str = "Imported Schema";
const DEFAULT_SCHEMA_TYPE: &str = "IMPORTED";
const DEFAULT_VERSION: &str = "1.0";

/// Import a JSON Schema document into a metadata + attribute tree snapshot.
pub fn import_json_schema(schema: &Value) -> Result<SchemaSnapshot, ImportError> {
    let schema = schema.as_object().ok_or(ImportError::NotAnObject)?;

    let metadata = SchemaMetadata {
        title: string_or(schema, "title", DEFAULT_TITLE),
        schema_type: string_or(schema, "type", DEFAULT_SCHEMA_TYPE),
        version: string_or(schema, "version", DEFAULT_VERSION),
        description: string_or(schema, "description", ""),
        credential_type: CredentialType::Merklized,
    };

    let subject = schema
        .get("properties")
        .and_then(|p| p.get(CREDENTIAL_SUBJECT_ID))
        .and_then(Value::as_object)
        .ok_or(ImportError::MissingCredentialSubject)?;

    let source_properties = match subject.get("properties") {
        None | Some(Value::Null) => None,
        Some(Value::Object(props)) => Some(props),
        Some(_) => return Err(ImportError::InvalidProperties),
    };

    let mut root = Attribute::credential_subject();
    let defaults = Attribute::credential_subject();
    root.title = string_or(subject, "title", &defaults.title);
    root.description = string_or(subject, "description", &defaults.description);

    let children = root.children.get_or_insert_with(Vec::new);
    for (name, property) in source_properties.into_iter().flatten() {
        if name == "id" {
            continue;
        }
        let Some(property) = property.as_object() else {
            tracing::debug!(property = %name, "skipping non-object property definition");
            continue;
        };
        if let Some(attr) = build_attribute(name, property, CREDENTIAL_SUBJECT_ID) {
            children.push(attr);
        }
    }

    Ok(SchemaSnapshot {
        metadata,
        attributes: vec![root],
    })
}

fn string_or(object: &Map<String, Value>, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Resolve the `type` keyword to a supported data type.
///
/// `Err` carries the offending type name for logging.
fn resolve_data_type(type_value: Option<&Value>) -> Result<DataType, String> {
    let name = match type_value {
        None | Some(Value::Null) => return Ok(DataType::String),
        Some(Value::String(name)) => name.as_str(),
        Some(Value::Array(members)) => members
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "array" && *t != "null")
            .ok_or_else(|| Value::Array(members.clone()).to_string())?,
        Some(other) => return Err(other.to_string()),
    };
    if name == "array" || name == "null" {
        return Err(name.to_string());
    }
    name.parse::<DataType>().map_err(|_| name.to_string())
}

fn number_at(property: &Map<String, Value>, key: &str) -> Option<Number> {
    match property.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

fn build_attribute(name: &str, property: &Map<String, Value>, parent_id: &str) -> Option<Attribute> {
    let id = format!("{parent_id}-{name}");
    let data_type = match resolve_data_type(property.get("type")) {
        Ok(data_type) => data_type,
        Err(unsupported) => {
            tracing::warn!(attribute = %id, ty = %unsupported, "dropping property with unsupported type");
            return None;
        }
    };

    let mut constraints = AttributeConstraints::default();
    if data_type.is_numeric() {
        constraints.exclusive_minimum = number_at(property, "exclusiveMinimum");
        constraints.maximum = number_at(property, "maximum");
        constraints.minimum = number_at(property, "minimum");
        constraints.exclusive_maximum = number_at(property, "exclusiveMaximum");
        constraints.multiple_of = number_at(property, "multipleOf");
        constraints.default = property.get("default").and_then(ScalarValue::from_json);
    }
    if let Some(format) = property
        .get("format")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        constraints.format = Some(format.to_string());
    }

    let mut attribute = Attribute::new(id.clone(), name, data_type, parent_id);
    attribute.title = string_or(property, "title", name);
    attribute.description = string_or(property, "description", "");
    attribute.constraints = (!constraints.is_empty()).then_some(constraints);

    if let (Some(children), Some(nested)) = (
        attribute.children.as_mut(),
        property.get("properties").and_then(Value::as_object),
    ) {
        for (child_name, child) in nested {
            if let Some(child) = child.as_object() {
                if let Some(child_attr) = build_attribute(child_name, child, &id) {
                    children.push(child_attr);
                }
            }
        }
    }
    Some(attribute)
}
