//! # credschema-schema: Schema Generation and Import
//!
//! Turns an attribute tree into the two documents a credential issuer
//! publishes, and turns an existing schema back into an attribute tree.
//!
//! - [`generate_json_schema`] builds the Draft 2020-12 credential schema.
//! - [`generate_json_ld_context`] builds the matching JSON-LD context.
//! - [`validate_non_merklized_attributes`] guards the non-merklized cap.
//! - [`import_json_schema`] is the inverse of the generator.
//! - [`validate_credential_subject`] checks a subject document against a
//!   generated schema.
//!
//! ## Round-Trip Property
//!
//! For trees built only from generator-supported features,
//! `import_json_schema(generate_json_schema(..))` reproduces the tree
//! (names, data types, importable constraints, nesting) up to the system
//! `id` child and `required` flags, which the importer never sets.

pub mod context;
pub mod error;
pub mod generator;
pub mod importer;
pub mod limits;
pub mod validate;

pub use context::{generate_json_ld_context, xsd_type};
pub use error::{ImportError, SchemaError};
pub use generator::{
    generate_json_schema, generate_json_schema_with, JsonSchemaDocument, JSON_SCHEMA_DRAFT,
    PLACEHOLDER_CONTEXT_URI,
};
pub use importer::import_json_schema;
pub use limits::validate_non_merklized_attributes;
pub use validate::{validate_credential_subject, ValidationViolations, Violation};
