//! # Import Subcommand
//!
//! Reads an existing credential JSON Schema and prints the session it
//! imports to (`{metadata, attributes}`), ready for `credschema generate`.
//! With `--output-dir`, writes `<schemaType>.session.json` instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use credschema_core::rules::validate_schema_type;
use credschema_schema::import_json_schema;

use crate::config::CliConfig;
use crate::{read_json, render_json, write_json};

/// Arguments for `credschema import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Credential JSON Schema to import.
    pub schema: PathBuf,
}

/// Execute `credschema import`.
pub fn run_import(args: &ImportArgs, config: &CliConfig, output_dir: Option<&Path>) -> Result<u8> {
    let schema: Value = read_json(&args.schema)?;
    let snapshot = import_json_schema(&schema)
        .with_context(|| format!("cannot import {}", args.schema.display()))?;

    tracing::info!(
        schema_type = %snapshot.metadata.schema_type,
        "imported credential schema"
    );

    match output_dir {
        Some(dir) => {
            // The type names the output file.
            validate_schema_type(&snapshot.metadata.schema_type).with_context(|| {
                format!(
                    "cannot name a session file after schema type {:?}",
                    snapshot.metadata.schema_type
                )
            })?;
            let path = dir.join(format!("{}.session.json", snapshot.metadata.schema_type));
            write_json(&path, &snapshot, config)?;
            println!("OK: {}", path.display());
        }
        None => println!("{}", render_json(&snapshot, config)?),
    }
    Ok(0)
}
