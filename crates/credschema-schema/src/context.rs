//! # JSON-LD Context Generator
//!
//! Projects the attribute tree into a JSON-LD context document. Each leaf
//! becomes an `iden3-vocab:<dot.path>` term typed with an XSD datatype;
//! each object with children becomes a scoped `@context`.
//!
//! The schema `@id` and the `iden3-vocab` namespace IRI are fresh
//! `urn:uuid` values on every call. Two calls with identical input
//! produce different documents.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use credschema_core::{
    find_credential_subject, Attribute, DataType, SchemaMetadata, SUBJECT_ID_ATTRIBUTE_ID,
};

use crate::error::SchemaError;

/// Prefix bound to the generated vocabulary namespace.
pub const VOCAB_PREFIX: &str = "iden3-vocab";

/// XML Schema datatypes namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// XSD datatype for a data type. Integers map to `xsd:string`.
pub fn xsd_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Number => "xsd:double",
        DataType::Boolean => "xsd:boolean",
        DataType::DateTime => "xsd:dateTime",
        DataType::Uri => "xsd:anyURI",
        DataType::Object => "xsd:object",
        DataType::String | DataType::Integer => "xsd:string",
    }
}

/// Generate the JSON-LD context document for a schema.
pub fn generate_json_ld_context(
    metadata: &SchemaMetadata,
    attributes: &[Attribute],
) -> Result<Value, SchemaError> {
    let root = find_credential_subject(attributes).ok_or(SchemaError::MissingCredentialSubject)?;

    let schema_id = format!("urn:uuid:{}", Uuid::new_v4());
    let vocab_iri = format!("urn:uuid:{}#", Uuid::new_v4());

    let mut vocab = Map::new();
    vocab.insert("@propagate".into(), json!(true));
    vocab.insert("@protected".into(), json!(true));
    vocab.insert(VOCAB_PREFIX.into(), json!(vocab_iri));
    vocab.insert("xsd".into(), json!(XSD_NAMESPACE));
    collect_terms(root.children(), "", &mut vocab);

    let mut entry = Map::new();
    entry.insert("@protected".into(), json!(true));
    entry.insert("@version".into(), json!(1.1));
    entry.insert("id".into(), json!("@id"));
    entry.insert("type".into(), json!("@type"));
    entry.insert(
        metadata.schema_type.clone(),
        json!({"@context": Value::Object(vocab), "@id": schema_id}),
    );

    Ok(json!({ "@context": [Value::Object(entry)] }))
}

fn collect_terms(children: &[Attribute], parent_path: &str, terms: &mut Map<String, Value>) {
    for child in children.iter().filter(|c| c.id != SUBJECT_ID_ATTRIBUTE_ID) {
        let path = if parent_path.is_empty() {
            child.name.clone()
        } else {
            format!("{parent_path}.{}", child.name)
        };
        let term_id = format!("{VOCAB_PREFIX}:{path}");

        let term = if child.is_object() && !child.children().is_empty() {
            let mut nested = Map::new();
            collect_terms(child.children(), &path, &mut nested);
            json!({"@context": Value::Object(nested), "@id": term_id})
        } else {
            json!({"@id": term_id, "@type": xsd_type(child.data_type)})
        };
        terms.insert(child.name.clone(), term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credschema_core::CREDENTIAL_SUBJECT_ID;

    fn sample_tree() -> Vec<Attribute> {
        let mut root = Attribute::credential_subject();
        root.push_child(Attribute::new("cs-age", "age", DataType::Integer, CREDENTIAL_SUBJECT_ID))
            .unwrap();
        let mut address = Attribute::new("cs-address", "address", DataType::Object, CREDENTIAL_SUBJECT_ID);
        address
            .push_child(Attribute::new("cs-address-city", "city", DataType::String, "cs-address"))
            .unwrap();
        address
            .push_child(Attribute::new("cs-address-since", "since", DataType::DateTime, "cs-address"))
            .unwrap();
        root.push_child(address).unwrap();
        vec![root]
    }

    fn vocab(doc: &Value, schema_type: &str) -> Value {
        doc["@context"][0][schema_type]["@context"].clone()
    }

    #[test]
    fn xsd_mapping() {
        assert_eq!(xsd_type(DataType::Number), "xsd:double");
        assert_eq!(xsd_type(DataType::Uri), "xsd:anyURI");
        assert_eq!(xsd_type(DataType::Integer), "xsd:string");
        assert_eq!(xsd_type(DataType::String), "xsd:string");
    }

    #[test]
    fn envelope_shape() {
        let meta = SchemaMetadata {
            schema_type: "KYCAgeCredential".into(),
            ..SchemaMetadata::default()
        };
        let doc = generate_json_ld_context(&meta, &sample_tree()).unwrap();
        let entry = &doc["@context"][0];
        assert_eq!(entry["@protected"], true);
        assert_eq!(entry["@version"], 1.1);
        assert_eq!(entry["id"], "@id");
        assert_eq!(entry["type"], "@type");

        let schema_id = entry["KYCAgeCredential"]["@id"].as_str().unwrap();
        assert!(schema_id.starts_with("urn:uuid:"));

        let vocab = vocab(&doc, "KYCAgeCredential");
        assert_eq!(vocab["@propagate"], true);
        assert_eq!(vocab["xsd"], XSD_NAMESPACE);
        let vocab_iri = vocab[VOCAB_PREFIX].as_str().unwrap();
        assert!(vocab_iri.starts_with("urn:uuid:") && vocab_iri.ends_with('#'));
    }

    #[test]
    fn leaf_and_nested_terms() {
        let doc = generate_json_ld_context(&SchemaMetadata::default(), &sample_tree()).unwrap();
        let vocab = vocab(&doc, "POH");
        assert_eq!(
            vocab["age"],
            json!({"@id": "iden3-vocab:age", "@type": "xsd:string"})
        );
        assert_eq!(vocab["address"]["@id"], "iden3-vocab:address");
        assert_eq!(
            vocab["address"]["@context"]["since"],
            json!({"@id": "iden3-vocab:address.since", "@type": "xsd:dateTime"})
        );
        assert!(vocab.get("id").is_none());
        assert!(vocab.get("credentialSubject").is_none());
    }

    #[test]
    fn identifiers_differ_between_calls() {
        let tree = sample_tree();
        let first = generate_json_ld_context(&SchemaMetadata::default(), &tree).unwrap();
        let second = generate_json_ld_context(&SchemaMetadata::default(), &tree).unwrap();
        assert_ne!(first["@context"][0]["POH"]["@id"], second["@context"][0]["POH"]["@id"]);
        assert_ne!(
            vocab(&first, "POH")[VOCAB_PREFIX],
            vocab(&second, "POH")[VOCAB_PREFIX]
        );
        assert_eq!(vocab(&first, "POH")["address"], vocab(&second, "POH")["address"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            generate_json_ld_context(&SchemaMetadata::default(), &[]),
            Err(SchemaError::MissingCredentialSubject)
        ));
    }
}
