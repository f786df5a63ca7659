//! # JSON Schema Generator
//!
//! Converts an attribute tree plus [`SchemaMetadata`] into a Draft 2020-12
//! credential schema.
//!
//! ## Output Shape
//!
//! - `properties.credentialSubject.properties` starts with the fixed system
//!   `id` property, followed by one entry per user attribute in tree order.
//! - The sibling envelope properties (`id`, `issuer`, `issuanceDate`,
//!   `expirationDate`, `@context`) are fixed.
//! - The document-level `required` list is always empty.
//!
//! Generation is deterministic: identical input yields identical output.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use credschema_core::{
    find_credential_subject, Attribute, AttributeConstraints, DataType, SchemaMetadata,
    SUBJECT_ID_ATTRIBUTE_ID,
};

use crate::error::SchemaError;

/// `$schema` URI of every generated document.
pub const JSON_SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Placeholder written to `$metadata.jsonLdContext` when the caller has no
/// published context URI yet.
pub const PLACEHOLDER_CONTEXT_URI: &str = "https://example.com/path/to/file/context.jsonld";

/// A generated credential schema.
///
/// Field order here is the key order of the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaDocument {
    #[serde(rename = "$metadata")]
    pub metadata: DocumentMetadata,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    /// The credential's schema type (e.g. `KYCAgeCredential`).
    #[serde(rename = "type")]
    pub schema_type: String,
    pub title: String,
    pub description: String,
    pub properties: DocumentProperties,
    pub required: Vec<String>,
}

/// The `$metadata` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub uris: Vec<String>,
    pub json_ld_context: String,
}

/// Top-level `properties`: the credential subject plus the fixed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProperties {
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubjectSchema,
    pub id: Value,
    pub issuer: Value,
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Value,
    #[serde(rename = "expirationDate")]
    pub expiration_date: Value,
    #[serde(rename = "@context")]
    pub context: Value,
}

/// Schema of the `credentialSubject` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubjectSchema {
    pub description: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl JsonSchemaDocument {
    /// Serialize to a `serde_json::Value`.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Generate a credential schema with the placeholder context URI.
pub fn generate_json_schema(
    metadata: &SchemaMetadata,
    attributes: &[Attribute],
) -> Result<JsonSchemaDocument, SchemaError> {
    generate_json_schema_with(metadata, attributes, PLACEHOLDER_CONTEXT_URI)
}

/// Generate a credential schema pointing `$metadata.jsonLdContext` at the
/// given URI.
pub fn generate_json_schema_with(
    metadata: &SchemaMetadata,
    attributes: &[Attribute],
    json_ld_context_uri: &str,
) -> Result<JsonSchemaDocument, SchemaError> {
    let root = find_credential_subject(attributes).ok_or(SchemaError::MissingCredentialSubject)?;

    let mut properties = Map::new();
    properties.insert("id".to_string(), subject_id_property());
    let mut required = Vec::new();
    collect_properties(root.children(), &mut properties, &mut required);

    Ok(JsonSchemaDocument {
        metadata: DocumentMetadata {
            uris: Vec::new(),
            json_ld_context: json_ld_context_uri.to_string(),
        },
        schema: JSON_SCHEMA_DRAFT.to_string(),
        version: metadata.version.clone(),
        schema_type: metadata.schema_type.clone(),
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        properties: DocumentProperties {
            credential_subject: CredentialSubjectSchema {
                description: root.description.clone(),
                title: root.title.clone(),
                kind: "object".to_string(),
                properties,
                required,
            },
            id: json!({"type": "string"}),
            issuer: json!({"type": ["string", "object"], "format": "uri"}),
            issuance_date: json!({"type": "string", "format": "date-time"}),
            expiration_date: json!({"type": "string", "format": "date-time"}),
            context: json!({"type": ["string", "array"]}),
        },
        required: Vec::new(),
    })
}

fn subject_id_property() -> Value {
    json!({
        "type": "string",
        "title": "Credential subject ID",
        "description": "Stores the DID of the subject that owns the credential",
        "format": "uri"
    })
}

fn collect_properties(
    children: &[Attribute],
    properties: &mut Map<String, Value>,
    required: &mut Vec<String>,
) {
    for child in children.iter().filter(|c| c.id != SUBJECT_ID_ATTRIBUTE_ID) {
        properties.insert(child.name.clone(), Value::Object(build_property(child)));
        if child.required {
            required.push(child.name.clone());
        }
    }
}

/// Format implied by the data type, if any.
fn implied_format(data_type: DataType) -> Option<&'static str> {
    match data_type {
        DataType::Uri => Some("uri"),
        DataType::DateTime => Some("date-time"),
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn build_property(attr: &Attribute) -> Map<String, Value> {
    let mut property = Map::new();
    property.insert("type".into(), json!(attr.data_type.as_str()));
    property.insert("title".into(), json!(attr.title));
    property.insert("description".into(), json!(attr.description));

    let format_override = attr.constraints.as_ref().and_then(|c| non_empty(&c.format));
    if format_override.is_none() {
        if let Some(format) = implied_format(attr.data_type) {
            property.insert("format".into(), json!(format));
        }
    }

    if attr.is_object() && !attr.children().is_empty() {
        let mut nested = Map::new();
        let mut nested_required = Vec::new();
        collect_properties(attr.children(), &mut nested, &mut nested_required);
        property.insert("properties".into(), Value::Object(nested));
        property.insert("required".into(), json!(nested_required));
        property.insert("type".into(), json!("object"));
    }

    if let Some(constraints) = &attr.constraints {
        copy_constraints(constraints, &mut property);
    }
    property
}

fn copy_constraints(c: &AttributeConstraints, property: &mut Map<String, Value>) {
    let numbers = [
        ("exclusiveMinimum", &c.exclusive_minimum),
        ("maximum", &c.maximum),
        ("minimum", &c.minimum),
        ("exclusiveMaximum", &c.exclusive_maximum),
    ];
    for (key, value) in numbers {
        if let Some(n) = value {
            property.insert(key.into(), Value::Number(n.clone()));
        }
    }
    if let Some(n) = c.min_length {
        property.insert("minLength".into(), json!(n));
    }
    if let Some(n) = c.max_length {
        property.insert("maxLength".into(), json!(n));
    }
    if let Some(pattern) = non_empty(&c.pattern) {
        property.insert("pattern".into(), json!(pattern));
    }
    if let Some(format) = non_empty(&c.format) {
        property.insert("format".into(), json!(format));
    }
    if let Some(n) = &c.multiple_of {
        property.insert("multipleOf".into(), Value::Number(n.clone()));
    }
    if let Some(default) = &c.default {
        property.insert("default".into(), default.to_json());
    }
    if !c.enum_values.is_empty() {
        let values = c.enum_values.iter().map(|v| v.to_json()).collect();
        property.insert("enum".into(), Value::Array(values));
    }
    if let Some(const_value) = &c.const_value {
        property.insert("const".into(), const_value.to_json());
    }
    if !c.examples.is_empty() {
        let values = c.examples.iter().map(|v| v.to_json()).collect();
        property.insert("examples".into(), Value::Array(values));
    }
    if let Some(comment) = non_empty(&c.comment) {
        property.insert("$comment".into(), json!(comment));
    }
}
