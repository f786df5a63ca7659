//! Errors from the query-authoring session and condition value parsing.
//!
//! The compiler itself never fails: a query that cannot be built yet is
//! reported as `None`.

use thiserror::Error;

/// Error produced by the query side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No condition with the given id.
    #[error("condition '{0}' not found")]
    ConditionNotFound(String),

    /// A condition with this id already exists in the session.
    #[error("condition '{0}' already exists")]
    DuplicateCondition(String),

    /// A circuit identifier outside the supported catalogue.
    #[error("unknown circuit '{0}'")]
    UnknownCircuit(String),

    /// A condition value is not a scalar or a flat array of scalars.
    #[error("unsupported condition value: {0}")]
    UnsupportedValue(String),
}
