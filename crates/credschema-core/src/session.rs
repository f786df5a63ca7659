//! # Schema-Authoring Session
//!
//! A [`SchemaSession`] holds the metadata and attribute tree being edited
//! in one authoring session. It is created when the session starts, replaced
//! wholesale on import, and reset when the user starts over.
//!
//! Every edit goes through a method that checks the authoring rules and the
//! tree invariants before mutating anything, so a rejected edit leaves the
//! session unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attribute::{
    Attribute, AttributeConstraints, DataType, CREDENTIAL_SUBJECT_ID, SUBJECT_ID_ATTRIBUTE_ID,
};
use crate::error::ModelError;
use crate::metadata::SchemaMetadata;
use crate::rules::{validate_attribute_name, validate_title};

/// Wizard step the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthoringStep {
    /// Step 1: schema metadata.
    #[default]
    Metadata,
    /// Step 2: attribute tree.
    Attributes,
}

/// Serializable form of a session: metadata plus top-level attributes.
///
/// This is also the shape produced by the schema importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Document-level fields.
    pub metadata: SchemaMetadata,
    /// Top-level attributes; the `credentialSubject` root among them.
    pub attributes: Vec<Attribute>,
}

/// A new attribute, before it is given an id and a place in the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDraft {
    /// Machine name, checked against the naming rules.
    pub name: String,
    /// Human label.
    pub title: String,
    /// Value type. `object` drafts start with no children.
    pub data_type: DataType,
    /// Free-form description.
    pub description: String,
    /// Listed in the parent's `required`.
    pub required: bool,
    /// JSON Schema constraints.
    pub constraints: Option<AttributeConstraints>,
}

impl AttributeDraft {
    /// Draft with the title defaulted to the name.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            data_type,
            ..Self::default()
        }
    }
}

/// Partial update for an existing attribute. `None` leaves a field as is.
///
/// An empty `constraints` bag clears the attribute's constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePatch {
    /// New machine name.
    pub name: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New data type. Leaving `object` drops the children.
    pub data_type: Option<DataType>,
    /// New description.
    pub description: Option<String>,
    /// New `required` flag.
    pub required: Option<bool>,
    /// New constraints; an empty bag clears them.
    pub constraints: Option<AttributeConstraints>,
}

/// Editable state of one schema-authoring session.
#[derive(Debug, Clone)]
pub struct SchemaSession {
    metadata: SchemaMetadata,
    root: Attribute,
    selected: Option<String>,
    step: AuthoringStep,
}

impl Default for SchemaSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaSession {
    /// Fresh session with default metadata and an empty `credentialSubject`.
    pub fn new() -> Self {
        Self {
            metadata: SchemaMetadata::default(),
            root: Attribute::credential_subject(),
            selected: None,
            step: AuthoringStep::Metadata,
        }
    }

    /// Replace the session contents with a snapshot (typically an import result).
    ///
    /// The snapshot must contain a `credentialSubject` object. The system `id`
    /// child is re-synthesized at the front if it is missing. Field rules are
    /// not applied: imported schemas are loaded as found.
    pub fn load(snapshot: SchemaSnapshot) -> Result<Self, ModelError> {
        let SchemaSnapshot {
            metadata,
            attributes,
        } = snapshot;
        let mut root = attributes
            .into_iter()
            .find(|attr| attr.id == CREDENTIAL_SUBJECT_ID)
            .ok_or(ModelError::MissingCredentialSubject)?;
        if !root.is_object() {
            return Err(ModelError::NotAnObject(root.id));
        }
        let children = root.children.get_or_insert_with(Vec::new);
        if !children.iter().any(|c| c.id == SUBJECT_ID_ATTRIBUTE_ID) {
            children.insert(0, Attribute::subject_id());
        }
        Ok(Self {
            metadata,
            root,
            selected: None,
            step: AuthoringStep::Metadata,
        })
    }

    /// Copy of the current metadata and tree.
    pub fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot {
            metadata: self.metadata.clone(),
            attributes: vec![self.root.clone()],
        }
    }

    /// Discard everything and start over.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current metadata.
    pub fn metadata(&self) -> &SchemaMetadata {
        &self.metadata
    }

    /// Top-level attributes: always exactly the root.
    pub fn attributes(&self) -> &[Attribute] {
        std::slice::from_ref(&self.root)
    }

    /// The `credentialSubject` root.
    pub fn credential_subject(&self) -> &Attribute {
        &self.root
    }

    /// Root attributes excluding the system `id`.
    pub fn user_attribute_count(&self) -> usize {
        self.root.user_children().count()
    }

    /// Wizard step currently shown.
    pub fn step(&self) -> AuthoringStep {
        self.step
    }

    /// Move the wizard to another step.
    pub fn set_step(&mut self, step: AuthoringStep) {
        self.step = step;
    }

    /// Replace the metadata after validating it.
    ///
    /// Switching to non-merklized is refused while the root holds more user
    /// attributes than the cap allows.
    pub fn set_metadata(&mut self, metadata: SchemaMetadata) -> Result<(), ModelError> {
        metadata.validate()?;
        if let Some(limit) = metadata.credential_type.attribute_limit() {
            if self.user_attribute_count() > limit {
                return Err(ModelError::AttributeLimit { limit });
            }
        }
        self.metadata = metadata;
        Ok(())
    }

    /// Look up any attribute by id.
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.root.find(id)
    }

    /// Children of the given attribute; empty if unknown or not an object.
    pub fn children_of(&self, parent_id: &str) -> &[Attribute] {
        self.root
            .find(parent_id)
            .map(Attribute::children)
            .unwrap_or(&[])
    }

    /// Add an attribute under `parent_id` (the root when `None`).
    ///
    /// Returns the generated id.
    pub fn add_attribute(
        &mut self,
        draft: AttributeDraft,
        parent_id: Option<&str>,
    ) -> Result<String, ModelError> {
        validate_attribute_name(&draft.name)?;
        validate_title("title", &draft.title)?;

        let parent_id = parent_id.unwrap_or(CREDENTIAL_SUBJECT_ID);
        if parent_id == CREDENTIAL_SUBJECT_ID {
            if let Some(limit) = self.metadata.credential_type.attribute_limit() {
                if self.user_attribute_count() >= limit {
                    return Err(ModelError::AttributeLimit { limit });
                }
            }
        }

        let parent = self
            .root
            .find_mut(parent_id)
            .ok_or_else(|| ModelError::AttributeNotFound(parent_id.to_string()))?;
        let siblings = parent
            .children
            .as_ref()
            .ok_or_else(|| ModelError::NotAnObject(parent_id.to_string()))?;
        if siblings.iter().any(|sibling| sibling.name == draft.name) {
            return Err(ModelError::DuplicateName {
                parent_id: parent_id.to_string(),
                name: draft.name,
            });
        }

        let id = format!("{parent_id}-{}", Uuid::new_v4().simple());
        let attribute = Attribute {
            id: id.clone(),
            name: draft.name,
            title: draft.title,
            data_type: draft.data_type,
            description: draft.description,
            required: draft.required,
            constraints: draft.constraints.filter(|c| !c.is_empty()),
            children: (draft.data_type == DataType::Object).then(Vec::new),
            parent_id: Some(parent_id.to_string()),
        };
        parent.push_child(attribute)?;
        Ok(id)
    }

    /// Apply a partial update to a user attribute.
    pub fn update_attribute(&mut self, id: &str, patch: AttributePatch) -> Result<(), ModelError> {
        let current = self
            .root
            .find(id)
            .ok_or_else(|| ModelError::AttributeNotFound(id.to_string()))?;
        if current.is_system() {
            return Err(ModelError::SystemAttribute(id.to_string()));
        }

        if let Some(name) = &patch.name {
            validate_attribute_name(name)?;
            let parent_id = current.parent_id.as_deref().unwrap_or(CREDENTIAL_SUBJECT_ID);
            let clash = self.root.find(parent_id).is_some_and(|parent| {
                parent
                    .children()
                    .iter()
                    .any(|sibling| sibling.id != id && &sibling.name == name)
            });
            if clash {
                return Err(ModelError::DuplicateName {
                    parent_id: parent_id.to_string(),
                    name: name.clone(),
                });
            }
        }
        if let Some(title) = &patch.title {
            validate_title("title", title)?;
        }

        let attribute = self
            .root
            .find_mut(id)
            .ok_or_else(|| ModelError::AttributeNotFound(id.to_string()))?;
        if let Some(name) = patch.name {
            attribute.name = name;
        }
        if let Some(title) = patch.title {
            attribute.title = title;
        }
        if let Some(description) = patch.description {
            attribute.description = description;
        }
        if let Some(required) = patch.required {
            attribute.required = required;
        }
        if let Some(data_type) = patch.data_type {
            attribute.set_data_type(data_type);
        }
        if let Some(constraints) = patch.constraints {
            attribute.constraints = (!constraints.is_empty()).then_some(constraints);
        }
        Ok(())
    }

    /// Remove a user attribute and its subtree. Returns the removed node.
    pub fn remove_attribute(&mut self, id: &str) -> Result<Attribute, ModelError> {
        if self.root.find(id).is_some_and(Attribute::is_system) {
            return Err(ModelError::SystemAttribute(id.to_string()));
        }
        let removed = remove_descendant(&mut self.root, id)
            .ok_or_else(|| ModelError::AttributeNotFound(id.to_string()))?;

        let selection_lost = self
            .selected
            .as_deref()
            .is_some_and(|selected| self.root.find(selected).is_none());
        if selection_lost {
            self.selected = None;
        }
        Ok(removed)
    }

    /// Select an attribute for editing, or clear the selection.
    pub fn select_attribute(&mut self, id: Option<&str>) -> Result<(), ModelError> {
        if let Some(id) = id {
            if self.root.find(id).is_none() {
                return Err(ModelError::AttributeNotFound(id.to_string()));
            }
        }
        self.selected = id.map(str::to_string);
        Ok(())
    }

    /// The attribute open in the editor, if any.
    pub fn selected_attribute(&self) -> Option<&Attribute> {
        self.selected.as_deref().and_then(|id| self.root.find(id))
    }
}

fn remove_descendant(node: &mut Attribute, id: &str) -> Option<Attribute> {
    let children = node.children.as_mut()?;
    if let Some(pos) = children.iter().position(|child| child.id == id) {
        return Some(children.remove(pos));
    }
    children
        .iter_mut()
        .find_map(|child| remove_descendant(child, id))
}
