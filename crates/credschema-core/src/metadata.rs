//! # Schema Metadata
//!
//! Document-level fields of a credential schema: title, schema type,
//! version, description, and the credential encoding strategy.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::rules::{validate_schema_type, validate_title};

/// Maximum number of user attributes directly under the root of a
/// non-merklized credential.
pub const NON_MERKLIZED_ATTRIBUTE_LIMIT: usize = 4;

/// How credential attributes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialType {
    /// Attributes stored in a Merkle tree; no attribute cap.
    #[default]
    Merklized,
    /// Attributes stored in claim slots; capped at
    /// [`NON_MERKLIZED_ATTRIBUTE_LIMIT`] root attributes.
    NonMerklized,
}

impl CredentialType {
    /// Root attribute cap, if any.
    pub fn attribute_limit(self) -> Option<usize> {
        match self {
            Self::Merklized => None,
            Self::NonMerklized => Some(NON_MERKLIZED_ATTRIBUTE_LIMIT),
        }
    }
}

/// Metadata for one schema-authoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    /// Human-readable schema title.
    pub title: String,
    /// Alphanumeric type name; becomes the JSON-LD vocabulary key.
    pub schema_type: String,
    /// Free-form version label.
    pub version: String,
    /// Schema description. May be empty.
    #[serde(default)]
    pub description: String,
    /// Encoding strategy; decides the root attribute cap.
    #[serde(default)]
    pub credential_type: CredentialType,
}

impl Default for SchemaMetadata {
    fn default() -> Self {
        Self {
            title: "First Schema".to_string(),
            schema_type: "POH".to_string(),
            version: "1.0".to_string(),
            description: "POH".to_string(),
            credential_type: CredentialType::Merklized,
        }
    }
}

impl SchemaMetadata {
    /// Check the authoring rules for every field.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_title("title", &self.title)?;
        validate_schema_type(&self.schema_type)?;
        if self.version.trim().is_empty() {
            return Err(ModelError::InvalidField {
                field: "version",
                reason: "version is required".to_string(),
            });
        }
        Ok(())
    }
}
