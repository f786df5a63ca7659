//! # Generate Subcommand
//!
//! Reads a session file (`{metadata, attributes}`) and produces the
//! credential's JSON Schema and JSON-LD context.
//!
//! With `--output-dir`, writes `<schemaType>.json` and `<schemaType>.jsonld`
//! there. Otherwise prints `{"schema": .., "context": ..}` to stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use credschema_core::{CredentialType, SchemaSession, SchemaSnapshot};
use credschema_schema::{
    generate_json_ld_context, generate_json_schema_with, validate_non_merklized_attributes,
    SchemaError,
};

use crate::config::CliConfig;
use crate::{read_json, render_json, write_json};

/// Arguments for `credschema generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Session file with `metadata` and `attributes`.
    pub session: PathBuf,

    /// Override the `$metadata.jsonLdContext` URI of the schema.
    #[arg(long)]
    pub context_uri: Option<String>,
}

/// Execute `credschema generate`.
pub fn run_generate(args: &GenerateArgs, config: &CliConfig, output_dir: Option<&Path>) -> Result<u8> {
    let snapshot: SchemaSnapshot = read_json(&args.session)?;
    let session = SchemaSession::load(snapshot)
        .with_context(|| format!("invalid session {}", args.session.display()))?;
    let metadata = session.metadata();
    metadata
        .validate()
        .with_context(|| format!("invalid metadata in {}", args.session.display()))?;

    if metadata.credential_type == CredentialType::NonMerklized {
        match validate_non_merklized_attributes(session.attributes()) {
            Err(e @ SchemaError::AttributeLimit { .. }) => {
                println!("FAIL: {}: {e}", args.session.display());
                return Ok(1);
            }
            other => other?,
        }
    }

    let context_uri = args.context_uri.as_deref().unwrap_or(&config.json_ld_context);
    let schema = generate_json_schema_with(metadata, session.attributes(), context_uri)?
        .to_value()
        .context("failed to serialize schema")?;
    let context = generate_json_ld_context(metadata, session.attributes())?;

    tracing::info!(
        schema_type = %metadata.schema_type,
        attributes = session.user_attribute_count(),
        "generated schema documents"
    );

    match output_dir {
        Some(dir) => {
            let schema_path = dir.join(format!("{}.json", metadata.schema_type));
            let context_path = dir.join(format!("{}.jsonld", metadata.schema_type));
            write_json(&schema_path, &schema, config)?;
            write_json(&context_path, &context, config)?;
            println!("OK: {}", schema_path.display());
            println!("OK: {}", context_path.display());
        }
        None => println!(
            "{}",
            render_json(&json!({"schema": schema, "context": context}), config)?
        ),
    }
    Ok(0)
}
