//! Entity model
//!
//! A deliberately small view of the host application's entities: enough to
//! identify an entity, know its bundle, and introspect its fields. Groups,
//! users, media items, nodes and paragraphs are all represented by [`Entity`];
//! the entity type id tells them apart.

use crate::entity_type::GROUP_ENTITY_TYPE;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a persisted entity
///
/// Content entities usually carry integer ids, config entities string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
	/// Integer (serial) id
	Int(i64),
	/// Machine-name style id
	Str(String),
}

impl EntityId {
	/// Returns the integer value, if this is an integer id
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(id) => Some(*id),
			Self::Str(_) => None,
		}
	}

	/// Returns the string value, if this is a string id
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Int(_) => None,
			Self::Str(id) => Some(id),
		}
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(id) => write!(f, "{}", id),
			Self::Str(id) => f.write_str(id),
		}
	}
}

impl From<i64> for EntityId {
	fn from(id: i64) -> Self {
		Self::Int(id)
	}
}

impl From<&str> for EntityId {
	fn from(id: &str) -> Self {
		Self::Str(id.to_string())
	}
}

impl From<String> for EntityId {
	fn from(id: String) -> Self {
		Self::Str(id)
	}
}

/// Fully qualified reference to a persisted entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
	/// Entity type id (e.g. `media`)
	pub entity_type: String,
	/// Entity id within its type
	pub id: EntityId,
}

impl EntityKey {
	/// Creates a new key
	pub fn new(entity_type: impl Into<String>, id: impl Into<EntityId>) -> Self {
		Self {
			entity_type: entity_type.into(),
			id: id.into(),
		}
	}
}

impl fmt::Display for EntityKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.entity_type, self.id)
	}
}

/// Field types the grouping system cares about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
	/// Plain entity reference
	EntityReference,
	/// Revisioned reference to a composite (embedded) entity
	EntityReferenceRevisions,
	/// Formatted text
	Text,
	/// Long formatted text
	TextLong,
	/// Long formatted text with a summary
	TextWithSummary,
	/// Plain string
	String,
	/// Integer
	Integer,
	/// Boolean
	Boolean,
	/// Any other field type, by machine name
	Other(String),
}

impl FieldType {
	/// Machine name of the field type
	pub fn as_str(&self) -> &str {
		match self {
			Self::EntityReference => "entity_reference",
			Self::EntityReferenceRevisions => "entity_reference_revisions",
			Self::Text => "text",
			Self::TextLong => "text_long",
			Self::TextWithSummary => "text_with_summary",
			Self::String => "string",
			Self::Integer => "integer",
			Self::Boolean => "boolean",
			Self::Other(name) => name,
		}
	}

	/// Whether the field stores formatted text
	pub fn is_formatted_text(&self) -> bool {
		matches!(self, Self::Text | Self::TextLong | Self::TextWithSummary)
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Definition of a single field on an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
	/// Machine name
	pub name: String,
	/// Field type
	pub field_type: FieldType,
	/// Target entity type for reference fields
	pub target_type: Option<String>,
	/// Human readable label
	pub label: Option<String>,
}

impl FieldDefinition {
	/// Creates a definition of the given type
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			target_type: None,
			label: None,
		}
	}

	/// Entity reference field pointing at `target_type`
	pub fn entity_reference(name: impl Into<String>, target_type: impl Into<String>) -> Self {
		Self::new(name, FieldType::EntityReference).with_target_type(target_type)
	}

	/// Revisioned composite reference field pointing at `target_type`
	pub fn entity_reference_revisions(
		name: impl Into<String>,
		target_type: impl Into<String>,
	) -> Self {
		Self::new(name, FieldType::EntityReferenceRevisions).with_target_type(target_type)
	}

	/// Sets the target entity type
	#[must_use]
	pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
		self.target_type = Some(target_type.into());
		self
	}

	/// Sets the label
	#[must_use]
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Whether this field references entities of `entity_type`
	pub fn targets(&self, entity_type: &str) -> bool {
		self.target_type.as_deref() == Some(entity_type)
	}
}

/// One value of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldItem {
	/// Reference to another entity
	Reference {
		target_type: String,
		target_id: EntityId,
		target_revision_id: Option<i64>,
	},
	/// Formatted text
	Text {
		value: String,
		summary: Option<String>,
		format: Option<String>,
	},
	/// Any scalar or structured value
	Value { value: serde_json::Value },
}

impl FieldItem {
	/// Reference item
	pub fn reference(target_type: impl Into<String>, target_id: impl Into<EntityId>) -> Self {
		Self::Reference {
			target_type: target_type.into(),
			target_id: target_id.into(),
			target_revision_id: None,
		}
	}

	/// Formatted text item without summary
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text {
			value: value.into(),
			summary: None,
			format: None,
		}
	}

	/// Formatted text item with a summary
	pub fn text_with_summary(value: impl Into<String>, summary: impl Into<String>) -> Self {
		Self::Text {
			value: value.into(),
			summary: Some(summary.into()),
			format: None,
		}
	}

	/// Plain value item
	pub fn value(value: impl Into<serde_json::Value>) -> Self {
		Self::Value {
			value: value.into(),
		}
	}

	/// The referenced entity, for reference items
	pub fn target_key(&self) -> Option<EntityKey> {
		match self {
			Self::Reference {
				target_type,
				target_id,
				..
			} => Some(EntityKey::new(target_type.clone(), target_id.clone())),
			_ => None,
		}
	}
}

/// A field definition with its values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldItemList {
	/// Field definition
	pub definition: FieldDefinition,
	/// Values in delta order
	pub items: Vec<FieldItem>,
}

impl FieldItemList {
	/// Whether the field holds no values
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Iterates over the values
	pub fn iter(&self) -> impl Iterator<Item = &FieldItem> {
		self.items.iter()
	}
}

/// An entity of any type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	/// Entity type id
	pub entity_type: String,
	/// Bundle (sub-type); equals the entity type id for bundle-less types
	pub bundle: String,
	/// Id, `None` until persisted (integer-keyed types)
	pub id: Option<EntityId>,
	/// Stable external identifier
	pub uuid: Uuid,
	/// Human readable label
	pub label: String,
	/// Owner (creator) user id
	pub owner_id: Option<i64>,
	/// Whether fields can be introspected
	pub fieldable: bool,
	/// Persisted flag; string-keyed entities carry an id before they are saved
	#[serde(default)]
	pub persisted: bool,
	fields: IndexMap<String, FieldItemList>,
}

impl Entity {
	/// Creates a new unsaved, fieldable entity
	pub fn new(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
		Self {
			entity_type: entity_type.into(),
			bundle: bundle.into(),
			id: None,
			uuid: Uuid::new_v4(),
			label: String::new(),
			owner_id: None,
			fieldable: true,
			persisted: false,
			fields: IndexMap::new(),
		}
	}

	/// Creates a new unsaved config entity (string id, no fields)
	pub fn config(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
		let entity_type = entity_type.into();
		let mut entity = Self::new(entity_type.clone(), entity_type);
		entity.id = Some(EntityId::Str(id.into()));
		entity.fieldable = false;
		entity
	}

	/// Creates a new unsaved group of the given group type
	pub fn group(group_type: impl Into<String>, label: impl Into<String>) -> Self {
		Self::new(GROUP_ENTITY_TYPE, group_type).with_label(label)
	}

	/// Sets the id
	#[must_use]
	pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Sets the label
	#[must_use]
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Sets the owner
	#[must_use]
	pub fn with_owner(mut self, owner_id: i64) -> Self {
		self.owner_id = Some(owner_id);
		self
	}

	/// Marks the entity as persisted; storage backends call this on save
	#[must_use]
	pub fn saved(mut self) -> Self {
		self.persisted = true;
		self
	}

	/// Adds a field with its values
	#[must_use]
	pub fn with_field(mut self, definition: FieldDefinition, items: Vec<FieldItem>) -> Self {
		self.set_field(definition, items);
		self
	}

	/// Sets (or replaces) a field
	pub fn set_field(&mut self, definition: FieldDefinition, items: Vec<FieldItem>) {
		self.fields.insert(
			definition.name.clone(),
			FieldItemList { definition, items },
		);
	}

	/// Returns a field by name
	pub fn field(&self, name: &str) -> Option<&FieldItemList> {
		self.fields.get(name)
	}

	/// Iterates over fields in definition order
	pub fn fields(&self) -> impl Iterator<Item = &FieldItemList> {
		self.fields.values()
	}

	/// Whether any field has the given type
	pub fn has_field_of_type(&self, field_type: &FieldType) -> bool {
		self.fields
			.values()
			.any(|field| &field.definition.field_type == field_type)
	}

	/// Whether the entity has not been persisted yet
	pub fn is_new(&self) -> bool {
		!self.persisted
	}

	/// Key of the persisted entity
	pub fn key(&self) -> Option<EntityKey> {
		if self.is_new() {
			return None;
		}
		self.id
			.clone()
			.map(|id| EntityKey::new(self.entity_type.clone(), id))
	}

	/// Whether this entity is a group
	pub fn is_group(&self) -> bool {
		self.entity_type == GROUP_ENTITY_TYPE
	}

	/// Integer id of a persisted entity
	pub fn int_id(&self) -> Option<i64> {
		if self.is_new() {
			return None;
		}
		self.id.as_ref().and_then(EntityId::as_int)
	}

	/// Label, falling back to `{type}:{id}`
	pub fn display_label(&self) -> String {
		if !self.label.is_empty() {
			return self.label.clone();
		}
		match &self.id {
			Some(id) => format!("{}:{}", self.entity_type, id),
			None => self.entity_type.clone(),
		}
	}
}
