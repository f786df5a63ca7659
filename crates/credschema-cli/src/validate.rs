//! # Validate Subcommand
//!
//! Checks a credential subject document against the `credentialSubject`
//! of a generated credential schema.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use credschema_schema::{validate_credential_subject, SchemaError};

use crate::read_json;

/// Arguments for `credschema validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Credential JSON Schema produced by `credschema generate`.
    #[arg(long)]
    pub schema: PathBuf,

    /// Credential subject document to check.
    pub subject: PathBuf,
}

/// Execute `credschema validate`.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema: Value = read_json(&args.schema)?;
    let subject: Value = read_json(&args.subject)?;

    match validate_credential_subject(&schema, &subject) {
        Ok(()) => {
            println!("OK: {}", args.subject.display());
            Ok(0)
        }
        Err(SchemaError::ValidationFailed { violations }) => {
            println!(
                "FAIL: {} ({} violation(s))",
                args.subject.display(),
                violations.len()
            );
            for violation in violations.violations() {
                println!("{violation}");
            }
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("cannot validate against {}", args.schema.display())),
    }
}
