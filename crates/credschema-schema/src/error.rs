//! # Error Types
//!
//! Structural errors from generation, import, and credential-subject
//! validation. Every variant is recoverable; callers display the message
//! and carry on.

use thiserror::Error;

use crate::validate::ValidationViolations;

/// Error raised by the generator and the credential-subject validator.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The attribute list has no `credentialSubject` root.
    #[error("credentialSubject attribute is required")]
    MissingCredentialSubject,

    /// A non-merklized schema holds more root attributes than allowed.
    #[error("Non-merklized credentials support a maximum of {limit} attributes")]
    AttributeLimit {
        /// The cap.
        limit: usize,
        /// Root attributes found, system `id` excluded.
        count: usize,
    },

    /// The document is not a generated credential schema.
    #[error("not a credential schema: {reason}")]
    NotACredentialSchema {
        /// What was missing.
        reason: String,
    },

    /// The compiled validator could not be built.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Error reported by the `jsonschema` crate.
        reason: String,
    },

    /// The credential subject does not conform to the schema.
    #[error("credential subject failed validation:\n{violations}")]
    ValidationFailed {
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },
}

/// Error raised by the schema importer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The input is not a JSON object.
    #[error("Invalid schema format")]
    NotAnObject,

    /// No `properties.credentialSubject` object.
    #[error("Schema must contain a credentialSubject property")]
    MissingCredentialSubject,

    /// `credentialSubject.properties` exists but is not an object.
    #[error("credentialSubject.properties must be an object")]
    InvalidProperties,
}
