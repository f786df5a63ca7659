//! # credschema-cli: Command-Line Front End
//!
//! Provides the `credschema` binary over the library crates. Every
//! subcommand reads JSON files and prints JSON (or writes it under
//! `--output-dir`).
//!
//! ## Subcommands
//!
//! - `credschema generate`: JSON Schema and JSON-LD context from a session file.
//! - `credschema import`: session file from an existing JSON Schema.
//! - `credschema query`: ZK query, query objects, or request from a state file.
//! - `credschema validate`: check a credential subject against a schema.
//!
//! ```bash
//! credschema generate kyc-session.json --output-dir dist/
//! credschema query state.json --format request --verifier-did did:iden3:...
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success. `1` when validation fails, when a query is not ready, or
//! on any error.

pub mod config;
pub mod generate;
pub mod import;
pub mod query;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::CliConfig;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Serialize to JSON text, pretty or compact per the config.
pub fn render_json<T: Serialize>(value: &T, config: &CliConfig) -> Result<String> {
    let text = if config.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("failed to serialize output")
}

/// Write JSON to a file, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T, config: &CliConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let mut text = render_json(value, config)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let config = CliConfig::default();
        write_json(&path, &json!({"a": [1, 2]}), &config).unwrap();

        let back: Value = read_json(&path).unwrap();
        assert_eq!(back, json!({"a": [1, 2]}));
        assert!(std::fs::read_to_string(&path).unwrap().contains("\n  \"a\""));
    }

    #[test]
    fn compact_rendering() {
        let config = CliConfig {
            pretty: false,
            ..CliConfig::default()
        };
        assert_eq!(render_json(&json!({"a": 1}), &config).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn read_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_json::<Value>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
