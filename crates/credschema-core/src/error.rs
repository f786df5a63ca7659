//! # Error Types
//!
//! Errors raised while editing or validating the attribute tree model.
//! All variants are recoverable: callers surface the message and keep the
//! session as it was before the rejected edit.

use thiserror::Error;

/// Error produced by the attribute tree model and the authoring session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A data type name outside the supported set.
    #[error("unknown data type '{0}'")]
    UnknownDataType(String),

    /// No attribute with the given id exists in the tree.
    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),

    /// The root or the subject `id` attribute cannot be edited or removed.
    #[error("attribute '{0}' is managed by the system and cannot be modified")]
    SystemAttribute(String),

    /// Children were requested under an attribute that is not an object.
    #[error("attribute '{0}' is not an object and cannot hold children")]
    NotAnObject(String),

    /// The attribute name breaks the naming rules.
    #[error("invalid attribute name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which rule was broken.
        reason: String,
    },

    /// Another sibling already uses this name.
    #[error("attribute name '{name}' already exists under '{parent_id}'")]
    DuplicateName {
        /// Id of the enclosing object attribute.
        parent_id: String,
        /// The duplicated name.
        name: String,
    },

    /// A title, schema type, or version field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Which rule was broken.
        reason: String,
    },

    /// A non-merklized schema would exceed its attribute cap.
    #[error("Non-merklized credentials support a maximum of {limit} attributes")]
    AttributeLimit {
        /// The cap that was hit.
        limit: usize,
    },

    /// The attribute list has no `credentialSubject` root.
    #[error("credentialSubject attribute is required")]
    MissingCredentialSubject,
}
