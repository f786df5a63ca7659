//! End-to-end: author a schema in a session, generate both documents,
//! validate a subject, and import the result back into a fresh session.

use credschema_core::{
    AttributeConstraints, AttributeDraft, CredentialType, DataType, SchemaMetadata, SchemaSession,
};
use credschema_schema::{
    generate_json_ld_context, generate_json_schema, import_json_schema,
    validate_credential_subject, validate_non_merklized_attributes, SchemaError,
};
use serde_json::{json, Number};

fn kyc_session() -> SchemaSession {
    let mut session = SchemaSession::new();
    session
        .set_metadata(SchemaMetadata {
            title: "KYC Age".into(),
            schema_type: "KYCAgeCredential".into(),
            version: "1.0".into(),
            description: "Proof of age".into(),
            credential_type: CredentialType::Merklized,
        })
        .unwrap();

    let mut birthday = AttributeDraft::new("birthday", DataType::Integer);
    birthday.title = "Birthday".into();
    birthday.required = true;
    birthday.constraints = Some(AttributeConstraints {
        minimum: Some(Number::from(19000101)),
        ..AttributeConstraints::default()
    });
    session.add_attribute(birthday, None).unwrap();

    let address = session
        .add_attribute(AttributeDraft::new("address", DataType::Object), None)
        .unwrap();
    let mut country = AttributeDraft::new("country", DataType::String);
    country.required = true;
    session.add_attribute(country, Some(&address)).unwrap();
    session
        .add_attribute(AttributeDraft::new("since", DataType::DateTime), Some(&address))
        .unwrap();
    session
}

#[test]
fn generated_schema_validates_subjects() {
    let session = kyc_session();
    let doc = generate_json_schema(session.metadata(), session.attributes()).unwrap();
    let schema = doc.to_value().unwrap();

    assert_eq!(schema["type"], "KYCAgeCredential");
    let subject = &schema["properties"]["credentialSubject"];
    assert_eq!(subject["required"], json!(["birthday"]));
    assert_eq!(subject["properties"]["address"]["required"], json!(["country"]));

    let good = json!({
        "id": "did:iden3:polygon:amoy:x",
        "birthday": 19960424,
        "address": {"country": "CH", "since": "2020-01-01T00:00:00Z"}
    });
    validate_credential_subject(&schema, &good).unwrap();

    let bad = json!({"birthday": 1, "address": {"since": "2020-01-01T00:00:00Z"}});
    match validate_credential_subject(&schema, &bad) {
        Err(SchemaError::ValidationFailed { violations }) => {
            assert_eq!(violations.len(), 2, "violations: {violations}");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn context_mirrors_tree_with_fresh_identifiers() {
    let session = kyc_session();
    let first = generate_json_ld_context(session.metadata(), session.attributes()).unwrap();
    let second = generate_json_ld_context(session.metadata(), session.attributes()).unwrap();

    let vocab = &first["@context"][0]["KYCAgeCredential"]["@context"];
    assert_eq!(vocab["birthday"]["@type"], "xsd:string");
    assert_eq!(
        vocab["address"]["@context"]["since"]["@id"],
        "iden3-vocab:address.since"
    );
    assert_ne!(
        first["@context"][0]["KYCAgeCredential"]["@id"],
        second["@context"][0]["KYCAgeCredential"]["@id"]
    );
}

#[test]
fn imported_schema_loads_into_a_session() {
    let session = kyc_session();
    let doc = generate_json_schema(session.metadata(), session.attributes()).unwrap();
    let snapshot = import_json_schema(&doc.to_value().unwrap()).unwrap();
    let imported = SchemaSession::load(snapshot).unwrap();

    assert_eq!(imported.metadata().schema_type, "KYCAgeCredential");
    assert_eq!(imported.user_attribute_count(), 2);
    let address = imported.attribute("credentialSubject-address").unwrap();
    let names: Vec<&str> = address.children().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["country", "since"]);
    assert!(address.children().iter().all(|c| !c.required));
    assert_eq!(
        imported
            .attribute("credentialSubject-address-since")
            .unwrap()
            .constraints
            .as_ref()
            .and_then(|c| c.format.as_deref()),
        Some("date-time")
    );
}

#[test]
fn non_merklized_guard_matches_session_cap() {
    let mut session = SchemaSession::new();
    for name in ["a", "b", "c", "d"] {
        session
            .add_attribute(AttributeDraft::new(name, DataType::Integer), None)
            .unwrap();
    }
    assert!(validate_non_merklized_attributes(session.attributes()).is_ok());

    session
        .add_attribute(AttributeDraft::new("e", DataType::Integer), None)
        .unwrap();
    assert!(validate_non_merklized_attributes(session.attributes()).is_err());
}
