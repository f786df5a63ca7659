//! # Query Subcommand
//!
//! Compiles a query-builder state file into one of three outputs:
//!
//! - `query`: the combined ZK query.
//! - `objects`: one query object per condition.
//! - `request`: the iden3comm verification request.
//!
//! Exits with `1` when the state is not ready to compile.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use credschema_query::{build_query, build_query_objects, build_request_with, QueryBuilderState};

use crate::config::CliConfig;
use crate::{read_json, render_json, write_json};

/// Output shape of `credschema query`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFormat {
    #[default]
    Query,
    Objects,
    Request,
}

/// Arguments for `credschema query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query-builder state file.
    pub state: PathBuf,

    #[arg(long, value_enum, default_value_t = QueryFormat::Query)]
    pub format: QueryFormat,

    /// Verifier DID for on-chain requests. Overrides the configured one.
    #[arg(long)]
    pub verifier_did: Option<String>,
}

/// Execute `credschema query`.
pub fn run_query(args: &QueryArgs, config: &CliConfig, output_dir: Option<&Path>) -> Result<u8> {
    let state: QueryBuilderState = read_json(&args.state)?;

    match args.format {
        QueryFormat::Query => emit(build_query(&state), "query", config, output_dir),
        QueryFormat::Objects => {
            let objects = build_query_objects(&state);
            emit((!objects.is_empty()).then_some(objects), "query-objects", config, output_dir)
        }
        QueryFormat::Request => {
            let verifier = args.verifier_did.as_deref().or(config.verifier_did.as_deref());
            let request = build_request_with(&state, verifier, &config.reason);
            emit(request, "request", config, output_dir)
        }
    }
}

fn emit<T: Serialize>(
    output: Option<T>,
    name: &str,
    config: &CliConfig,
    output_dir: Option<&Path>,
) -> Result<u8> {
    let Some(output) = output else {
        println!("NOT READY: set the schema reference and at least one usable condition");
        return Ok(1);
    };
    match output_dir {
        Some(dir) => {
            let path = dir.join(format!("{name}.json"));
            write_json(&path, &output, config)?;
            println!("OK: {}", path.display());
        }
        None => println!("{}", render_json(&output, config)?),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn state_file(dir: &Path, state: Value) -> PathBuf {
        let path = dir.join("state.json");
        std::fs::write(&path, state.to_string()).unwrap();
        path
    }

    fn ready_state() -> Value {
        json!({
            "jsonLdContextUrl": "ipfs://QmKyc",
            "schemaType": "KYCAgeCredential",
            "verificationType": "on-chain",
            "conditions": [
                {"id": "c1", "type": "condition", "attributePath": "age", "operator": "gte", "value": 18},
                {"id": "c2", "type": "selectiveDisclosure", "attributePath": "name"}
            ]
        })
    }

    #[test]
    fn writes_request_with_configured_verifier() {
        let dir = tempfile::tempdir().unwrap();
        let args = QueryArgs {
            state: state_file(dir.path(), ready_state()),
            format: QueryFormat::Request,
            verifier_did: None,
        };
        let config = CliConfig {
            verifier_did: Some("did:example:configured".into()),
            reason: "age check".into(),
            ..CliConfig::default()
        };

        assert_eq!(run_query(&args, &config, Some(dir.path())).unwrap(), 0);
        let request: Value = read_json(&dir.path().join("request.json")).unwrap();
        assert_eq!(request["body"]["verifier"], "did:example:configured");
        assert_eq!(request["body"]["reason"], "age check");
        assert_eq!(
            request["body"]["query"]["credentialSubject"],
            json!({"age": {"$gte": 18}, "name": {}})
        );
    }

    #[test]
    fn argument_verifier_wins() {
        let dir = tempfile::tempdir().unwrap();
        let args = QueryArgs {
            state: state_file(dir.path(), ready_state()),
            format: QueryFormat::Request,
            verifier_did: Some("did:example:flag".into()),
        };
        let config = CliConfig {
            verifier_did: Some("did:example:configured".into()),
            ..CliConfig::default()
        };
        run_query(&args, &config, Some(dir.path())).unwrap();
        let request: Value = read_json(&dir.path().join("request.json")).unwrap();
        assert_eq!(request["body"]["verifier"], "did:example:flag");
    }

    #[test]
    fn writes_linked_objects() {
        let dir = tempfile::tempdir().unwrap();
        let args = QueryArgs {
            state: state_file(dir.path(), ready_state()),
            format: QueryFormat::Objects,
            verifier_did: None,
        };
        assert_eq!(run_query(&args, &CliConfig::default(), Some(dir.path())).unwrap(), 0);
        let objects: Value = read_json(&dir.path().join("query-objects.json")).unwrap();
        assert_eq!(objects.as_array().map(Vec::len), Some(2));
        assert_eq!(objects[0]["circuitId"], "linkedMultiQuery10-beta.1");
        assert!(objects[0].get("groupId").is_none());
        assert!(objects[1].get("groupId").is_some());
    }

    #[test]
    fn not_ready_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let args = QueryArgs {
            state: state_file(dir.path(), json!({"schemaType": "KYCAgeCredential"})),
            format: QueryFormat::Query,
            verifier_did: None,
        };
        assert_eq!(run_query(&args, &CliConfig::default(), Some(dir.path())).unwrap(), 1);
        assert!(!dir.path().join("query.json").exists());
    }
}
