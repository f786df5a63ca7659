//! # Attribute Tree
//!
//! A credential's attributes form a tree rooted at `credentialSubject`.
//! Each node carries a machine name, a human title, a data type, optional
//! constraints, and (for objects only) an ordered list of children.
//!
//! ## Invariants
//!
//! - The root has id `credentialSubject` and data type `object`.
//! - The root always holds the system child `credentialSubject-id` (a `uri`
//!   attribute named `id`). It is excluded from user edits, from the
//!   non-merklized attribute count, and from generated user properties.
//! - `children` is `Some` iff `data_type == DataType::Object`. Use
//!   [`Attribute::set_data_type`] to change the type so this holds.
//! - Child order is display order and schema key order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::ModelError;
use crate::value::ScalarValue;

/// Id of the root attribute.
pub const CREDENTIAL_SUBJECT_ID: &str = "credentialSubject";

/// Id of the system `id` attribute under the root.
pub const SUBJECT_ID_ATTRIBUTE_ID: &str = "credentialSubject-id";

/// Data type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    /// Free text.
    #[default]
    String,
    /// Floating point number.
    Number,
    /// Whole number.
    Integer,
    /// `true` / `false`.
    Boolean,
    /// URI string (`format: uri`).
    Uri,
    /// RFC 3339 timestamp string (`format: date-time`).
    DateTime,
    /// Container for nested attributes.
    Object,
}

impl DataType {
    /// All data types in display order.
    pub fn all() -> &'static [DataType] {
        &[
            Self::String,
            Self::Number,
            Self::Integer,
            Self::Boolean,
            Self::Uri,
            Self::DateTime,
            Self::Object,
        ]
    }

    /// Wire name, as used in the `type` keyword of generated schemas.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Uri => "uri",
            Self::DateTime => "date-time",
            Self::Object => "object",
        }
    }

    /// Whether numeric range constraints apply.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|dt| dt.as_str() == s)
            .ok_or_else(|| ModelError::UnknownDataType(s.to_string()))
    }
}

/// Optional format, range, and enumeration constraints on an attribute.
///
/// Fields are only meaningful for some data types (`min_length` for
/// strings, `minimum` for numbers) but the bag itself does not enforce
/// that; the generator copies whatever is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeConstraints {
    /// `exclusiveMinimum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    /// `exclusiveMaximum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,
    /// `multipleOf`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// ECMA-262 regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Overrides the format implied by `uri` / `date-time` data types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ScalarValue>,
    /// Allowed values (`enum`).
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<ScalarValue>,
    /// The only allowed value (`const`).
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<ScalarValue>,
    /// `examples`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ScalarValue>,
    /// Emitted as `$comment` in generated schemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AttributeConstraints {
    /// Constraints carrying only a format override.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::default()
        }
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A node in a credential's attribute tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Stable unique identifier.
    pub id: String,
    /// Machine identifier, unique among siblings.
    pub name: String,
    /// Human label.
    pub title: String,
    /// Value type.
    pub data_type: DataType,
    /// Free-form description. May be empty.
    #[serde(default)]
    pub description: String,
    /// Whether the enclosing object lists this name in `required`.
    #[serde(default)]
    pub required: bool,
    /// JSON Schema constraints. `None` when nothing is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<AttributeConstraints>,
    /// Present iff `data_type` is `object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Attribute>>,
    /// Id of the owning object. Lookup only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Attribute {
    /// The default root: an empty `credentialSubject` holding only the system `id`.
    pub fn credential_subject() -> Self {
        Self {
            id: CREDENTIAL_SUBJECT_ID.to_string(),
            name: CREDENTIAL_SUBJECT_ID.to_string(),
            title: "Credential subject".to_string(),
            data_type: DataType::Object,
            description: "Stores the data of the credential".to_string(),
            required: true,
            constraints: None,
            children: Some(vec![Self::subject_id()]),
            parent_id: None,
        }
    }

    /// The system `id` attribute that identifies the credential holder.
    pub fn subject_id() -> Self {
        Self {
            id: SUBJECT_ID_ATTRIBUTE_ID.to_string(),
            name: "id".to_string(),
            title: "Credential subject ID".to_string(),
            data_type: DataType::Uri,
            description: "Stores the DID of the subject that owns the credential".to_string(),
            required: false,
            constraints: Some(AttributeConstraints::with_format("uri")),
            children: None,
            parent_id: Some(CREDENTIAL_SUBJECT_ID.to_string()),
        }
    }

    /// A leaf or empty-object attribute with no constraints.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        data_type: DataType,
        parent_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            title: name.clone(),
            name,
            data_type,
            description: String::new(),
            required: false,
            constraints: None,
            children: (data_type == DataType::Object).then(Vec::new),
            parent_id: Some(parent_id.into()),
        }
    }

    /// The `credentialSubject` root.
    pub fn is_root(&self) -> bool {
        self.id == CREDENTIAL_SUBJECT_ID
    }

    /// The root itself or its system `id` child.
    pub fn is_system(&self) -> bool {
        self.id == CREDENTIAL_SUBJECT_ID || self.id == SUBJECT_ID_ATTRIBUTE_ID
    }

    /// Whether the attribute can hold children.
    pub fn is_object(&self) -> bool {
        self.data_type == DataType::Object
    }

    /// Ordered children; empty for non-objects.
    pub fn children(&self) -> &[Attribute] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Children excluding the system `id` attribute.
    pub fn user_children(&self) -> impl Iterator<Item = &Attribute> {
        self.children()
            .iter()
            .filter(|child| child.id != SUBJECT_ID_ATTRIBUTE_ID)
    }

    /// Append a child. Fails if this attribute is not an object.
    pub fn push_child(&mut self, mut child: Attribute) -> Result<(), ModelError> {
        let children = self
            .children
            .as_mut()
            .ok_or_else(|| ModelError::NotAnObject(self.id.clone()))?;
        child.parent_id = Some(self.id.clone());
        children.push(child);
        Ok(())
    }

    /// Change the data type, keeping the children invariant.
    ///
    /// Leaving `object` discards the subtree. Entering `object` starts with
    /// an empty child list.
    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
        if data_type == DataType::Object {
            if self.children.is_none() {
                self.children = Some(Vec::new());
            }
        } else {
            self.children = None;
        }
    }

    /// Depth-first search for a descendant (or self) by id.
    pub fn find(&self, id: &str) -> Option<&Attribute> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`Attribute::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Attribute::subtree_len)
            .sum::<usize>()
    }
}

/// Locate the `credentialSubject` root among top-level attributes.
pub fn find_credential_subject(attributes: &[Attribute]) -> Option<&Attribute> {
    attributes.iter().find(|attr| attr.id == CREDENTIAL_SUBJECT_ID)
}
