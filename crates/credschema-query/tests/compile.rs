//! Query compilation through a [`QuerySession`], from an imported schema's
//! attribute tree to the verifier-facing wire documents.

use credschema_core::{AttributeDraft, DataType, SchemaSession};
use credschema_query::{
    available_operators, build_query, describe_condition, map_circuit_id, CircuitId,
    ConditionItem, ConditionValue, Operator, ProofType, QueryBuilderState, QueryClock,
    QuerySession, QueryType, VerificationType, LINKED_MULTI_QUERY_CIRCUIT,
};
use serde_json::{json, Value};

struct Tick(u64);

impl QueryClock for Tick {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

fn value(v: Value) -> Option<ConditionValue> {
    Some(serde_json::from_value(v).unwrap())
}

fn kyc_session() -> QuerySession {
    let mut authoring = SchemaSession::new();
    authoring
        .add_attribute(AttributeDraft::new("name", DataType::String), None)
        .unwrap();
    authoring
        .add_attribute(AttributeDraft::new("age", DataType::Integer), None)
        .unwrap();
    authoring
        .add_attribute(AttributeDraft::new("verified", DataType::Boolean), None)
        .unwrap();

    let mut session = QuerySession::new();
    session.set_query_attributes(authoring.attributes().to_vec());
    session.set_json_ld_context_url("ipfs://QmKycContext");
    session.set_schema_type("KYCAgeCredential");
    session
}

fn subject_of(session: &QuerySession) -> Value {
    let query = session.build_query().expect("query should be ready");
    Value::Object(query.credential_subject.unwrap_or_default())
}

#[test]
fn operator_table_on_the_wire() {
    let cases = [
        (Operator::Eq, json!("Alice"), json!("Alice")),
        (Operator::Neq, json!("Bob"), json!({"$ne": "Bob"})),
        (Operator::In, json!(["A", "B"]), json!({"$in": ["A", "B"]})),
        (Operator::Nin, json!("C"), json!({"$nin": ["C"]})),
        (Operator::Lt, json!(10), json!({"$lt": 10})),
        (Operator::Gte, json!(18), json!({"$gte": 18})),
        (Operator::Between, json!([18, 65]), json!({"$between": [18, 65]})),
        (Operator::NonBetween, json!([0, 17]), json!({"$nonbetween": [0, 17]})),
        (Operator::Exists, json!(false), json!({"$exists": false})),
        (Operator::Exists, json!("false"), json!({"$exists": false})),
        (Operator::Exists, json!(true), json!({"$exists": true})),
    ];
    for (operator, operand, expected) in cases {
        let mut session = kyc_session();
        session
            .add_condition(ConditionItem::condition("name", operator, value(operand)))
            .unwrap();
        assert_eq!(subject_of(&session), json!({ "name": expected }), "{operator}");
    }
}

#[test]
fn exists_without_value_is_true() {
    let mut session = kyc_session();
    session
        .add_condition(ConditionItem::condition("verified", Operator::Exists, None))
        .unwrap();
    assert_eq!(subject_of(&session), json!({"verified": {"$exists": true}}));
}

#[test]
fn mixed_conditions_and_disclosure() {
    let mut session = kyc_session();
    session
        .add_condition(ConditionItem::condition("age", Operator::Between, value(json!([18, 65]))))
        .unwrap();
    session.add_condition(ConditionItem::disclosure("name")).unwrap();
    session.set_issuer_did("did:iden3:polygon:amoy:issuer");
    session.set_skip_revocation_check(true);

    let query = serde_json::to_value(session.build_query().unwrap()).unwrap();
    assert_eq!(
        query,
        json!({
            "context": "ipfs://QmKycContext",
            "type": "KYCAgeCredential",
            "allowedIssuers": ["did:iden3:polygon:amoy:issuer"],
            "skipClaimRevocationCheck": true,
            "credentialSubject": {
                "age": {"$between": [18, 65]},
                "name": {}
            }
        })
    );
}

#[test]
fn credential_issued_short_circuits() {
    let mut session = kyc_session();
    session
        .add_condition(ConditionItem::condition("age", Operator::Gt, value(json!(18))))
        .unwrap();
    session.set_query_type(QueryType::CredentialIssued);

    assert_eq!(subject_of(&session), json!({}));

    let objects = session.build_query_objects_with(&Tick(5));
    assert_eq!(objects.len(), 1);
    assert!(objects[0].query.credential_subject.is_none());
}

#[test]
fn empty_reference_is_not_ready() {
    let mut state = QueryBuilderState {
        schema_type: "KYCAgeCredential".into(),
        query_type: QueryType::CredentialIssued,
        ..QueryBuilderState::default()
    };
    assert!(build_query(&state).is_none());
    state.json_ld_context_url = "ipfs://QmKycContext".into();
    assert!(build_query(&state).is_some());
}

#[test]
fn linked_query_objects() {
    let mut session = kyc_session();
    session.set_proof_type(Some(ProofType::Mtp));
    session
        .add_condition(ConditionItem::condition("age", Operator::Gte, value(json!(18))))
        .unwrap();
    session.add_condition(ConditionItem::disclosure("name")).unwrap();

    let objects = session.build_query_objects_with(&Tick(1_000));
    let wire = serde_json::to_value(&objects).unwrap();
    assert_eq!(
        wire,
        json!([
            {
                "circuitId": LINKED_MULTI_QUERY_CIRCUIT,
                "id": 1000,
                "query": {
                    "context": "ipfs://QmKycContext",
                    "type": "KYCAgeCredential",
                    "allowedIssuers": ["*"],
                    "credentialSubject": {"age": {"$gte": 18}}
                }
            },
            {
                "circuitId": LINKED_MULTI_QUERY_CIRCUIT,
                "id": 1001,
                "query": {
                    "context": "ipfs://QmKycContext",
                    "type": "KYCAgeCredential",
                    "allowedIssuers": ["*"],
                    "credentialSubject": {"name": {}}
                },
                "groupId": 1000
            }
        ])
    );
}

#[test]
fn single_object_maps_circuit() {
    let mut session = kyc_session();
    session.set_proof_type(Some(ProofType::Mtp));
    session.set_circuit_id(Some(CircuitId::V3OnChain));
    session.add_condition(ConditionItem::disclosure("name")).unwrap();

    let objects = session.build_query_objects_with(&Tick(1));
    assert_eq!(objects[0].circuit_id, "credentialAtomicQueryMTPV3OnChain-beta.1");
    assert_eq!(
        map_circuit_id(Some(CircuitId::SigV2), Some(ProofType::Sig), false),
        "credentialAtomicQuerySigV2"
    );
}

#[test]
fn on_chain_request() {
    let mut session = kyc_session();
    session.add_condition(ConditionItem::disclosure("name")).unwrap();
    session.set_verification_type(VerificationType::OnChain);

    let request = serde_json::to_value(session.build_request(Some("did:example:verifier")).unwrap())
        .unwrap();
    assert_eq!(request["id"], "1");
    assert_eq!(
        request["type"],
        "https://iden3-communication.io/proofs/1.0/contract-based-request"
    );
    assert_eq!(request["body"]["verifier"], "did:example:verifier");
    assert_eq!(request["body"]["query"]["credentialSubject"], json!({"name": {}}));
}

#[test]
fn operators_and_descriptions_follow_attribute_type() {
    let session = kyc_session();
    let age = session.query_attribute("credentialSubject.age").unwrap();
    assert_eq!(available_operators(Some(age.data_type)).len(), 11);

    let name = session.query_attribute("name").unwrap();
    assert!(!available_operators(Some(name.data_type)).contains(&Operator::Gt));

    let condition = ConditionItem::condition("age", Operator::Lte, value(json!(65)));
    assert_eq!(
        describe_condition(&condition, session.query_attribute(&condition.attribute_path)),
        "age is less than or equal to 65"
    );
}
