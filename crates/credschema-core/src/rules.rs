//! # Authoring Rules
//!
//! Field-level validation applied when attributes and metadata are edited
//! through a [`crate::SchemaSession`]. Imported schemas bypass these rules;
//! they are loaded as found.

use crate::error::ModelError;

/// Maximum length, in characters, of names, titles, and schema types.
pub const MAX_FIELD_LEN: usize = 256;

/// Attribute names: 1..=256 chars of `[A-Za-z0-9_-]`.
pub fn validate_attribute_name(name: &str) -> Result<(), ModelError> {
    let invalid = |reason: &str| ModelError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("name is required"));
    }
    if name.chars().count() > MAX_FIELD_LEN {
        return Err(invalid("name must be 256 characters or less"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "only alphanumeric characters, dash (-) and underscore (_)",
        ));
    }
    Ok(())
}

/// Titles: non-empty, at most 256 chars.
pub fn validate_title(field: &'static str, title: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::InvalidField {
            field,
            reason: "title is required".to_string(),
        });
    }
    if title.chars().count() > MAX_FIELD_LEN {
        return Err(ModelError::InvalidField {
            field,
            reason: "title must be 256 characters or less".to_string(),
        });
    }
    Ok(())
}

/// Schema types: 1..=256 ASCII alphanumeric chars.
pub fn validate_schema_type(schema_type: &str) -> Result<(), ModelError> {
    let reason = if schema_type.is_empty() {
        "schema type is required"
    } else if schema_type.chars().count() > MAX_FIELD_LEN {
        "schema type must be 256 characters or less"
    } else if !schema_type.chars().all(|c| c.is_ascii_alphanumeric()) {
        "only alphanumeric characters allowed"
    } else {
        return Ok(());
    };
    Err(ModelError::InvalidField {
        field: "schemaType",
        reason: reason.to_string(),
    })
}
