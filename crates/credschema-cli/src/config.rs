//! CLI configuration.
//!
//! Loaded from an optional YAML file (`--config`), then overridden by
//! environment variables:
//!
//! - `CREDSCHEMA_VERIFIER_DID`: verifier DID for on-chain requests.
//! - `CREDSCHEMA_PRETTY`: `true`/`false`, pretty-print JSON output.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use credschema_query::DEFAULT_REASON;
use credschema_schema::PLACEHOLDER_CONTEXT_URI;

pub const VERIFIER_DID_VAR: &str = "CREDSCHEMA_VERIFIER_DID";
pub const PRETTY_VAR: &str = "CREDSCHEMA_PRETTY";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct CliConfig {
    /// Default verifier DID attached to on-chain requests.
    pub verifier_did: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// `body.reason` of generated requests.
    pub reason: String,
    /// `$metadata.jsonLdContext` of generated schemas.
    pub json_ld_context: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verifier_did: None,
            pretty: true,
            reason: DEFAULT_REASON.to_string(),
            json_ld_context: PLACEHOLDER_CONTEXT_URI.to_string(),
        }
    }
}

impl CliConfig {
    /// Read the YAML file if given, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(did) = lookup(VERIFIER_DID_VAR).filter(|did| !did.is_empty()) {
            self.verifier_did = Some(did);
        }
        if let Some(raw) = lookup(PRETTY_VAR) {
            self.pretty = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                var: PRETTY_VAR,
                value: raw,
            })?;
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}
