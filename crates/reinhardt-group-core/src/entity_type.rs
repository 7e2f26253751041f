//! Entity type definitions
//!
//! The grouping system never owns entity types; it only needs to know, for a
//! given entity type id, whether the type is fieldable and how its id key is
//! typed. [`EntityTypeRepository`] holds that knowledge.

use crate::error::{GroupError, GroupResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Entity type id of groups
pub const GROUP_ENTITY_TYPE: &str = "group";
/// Entity type id of users
pub const USER_ENTITY_TYPE: &str = "user";
/// Entity type id of media items
pub const MEDIA_ENTITY_TYPE: &str = "media";
/// Entity type id of nodes
pub const NODE_ENTITY_TYPE: &str = "node";
/// Entity type id of paragraphs (composite sub-entities)
pub const PARAGRAPH_ENTITY_TYPE: &str = "paragraph";

/// Storage type of an entity type's id key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKeyType {
	/// Serial integer
	Integer,
	/// Machine-name string
	String,
}

/// Definition of an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDefinition {
	/// Entity type id
	pub id: String,
	/// Human readable label
	pub label: String,
	/// Type of the id key field
	pub id_key_type: IdKeyType,
	/// Whether the type exposes field definitions
	pub fieldable: bool,
	/// Entity type this type provides bundles for, if any
	pub bundle_of: Option<String>,
}

impl EntityTypeDefinition {
	/// Fieldable content entity type with integer ids
	pub fn content(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			id_key_type: IdKeyType::Integer,
			fieldable: true,
			bundle_of: None,
		}
	}

	/// Fieldable content entity type with string ids
	pub fn string_content(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id_key_type: IdKeyType::String,
			..Self::content(id, label)
		}
	}

	/// Config entity type (string ids, not fieldable)
	pub fn config(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			id_key_type: IdKeyType::String,
			fieldable: false,
			bundle_of: None,
		}
	}

	/// Marks this type as providing bundles for `entity_type`
	#[must_use]
	pub fn bundle_of(mut self, entity_type: impl Into<String>) -> Self {
		self.bundle_of = Some(entity_type.into());
		self
	}

	/// Whether field definitions can be introspected and the id key is an integer field
	pub fn has_integer_id_field(&self) -> bool {
		self.fieldable && self.id_key_type == IdKeyType::Integer
	}
}

/// Registry of known entity types
#[derive(Debug, Default)]
pub struct EntityTypeRepository {
	definitions: RwLock<HashMap<String, Arc<EntityTypeDefinition>>>,
	generation: AtomicU64,
}

impl EntityTypeRepository {
	/// Creates an empty repository
	pub fn new() -> Self {
		Self::default()
	}

	/// Repository preloaded with the entity types the grouping system ships with
	///
	/// `group`, `user`, `media`, `node` and `paragraph` are integer-keyed content
	/// types; `group_type`, `media_type` and `node_type` are config types.
	pub fn with_defaults() -> Self {
		let repository = Self::new();
		repository.register(EntityTypeDefinition::content(GROUP_ENTITY_TYPE, "Group"));
		repository.register(EntityTypeDefinition::content(USER_ENTITY_TYPE, "User"));
		repository.register(EntityTypeDefinition::content(MEDIA_ENTITY_TYPE, "Media"));
		repository.register(EntityTypeDefinition::content(NODE_ENTITY_TYPE, "Content"));
		repository.register(EntityTypeDefinition::content(
			PARAGRAPH_ENTITY_TYPE,
			"Paragraph",
		));
		repository.register(
			EntityTypeDefinition::config("group_type", "Group type").bundle_of(GROUP_ENTITY_TYPE),
		);
		repository.register(
			EntityTypeDefinition::config("media_type", "Media type").bundle_of(MEDIA_ENTITY_TYPE),
		);
		repository.register(
			EntityTypeDefinition::config("node_type", "Content type").bundle_of(NODE_ENTITY_TYPE),
		);
		repository
	}

	/// Registers (or replaces) a definition
	pub fn register(&self, definition: EntityTypeDefinition) {
		let mut definitions = self.definitions.write();
		definitions.insert(definition.id.clone(), Arc::new(definition));
		self.generation.fetch_add(1, Ordering::AcqRel);
	}

	/// Counter bumped by every registration
	///
	/// Caches derived from definitions compare it to detect replaced types.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	/// Looks up a definition
	pub fn get(&self, entity_type: &str) -> Option<Arc<EntityTypeDefinition>> {
		self.definitions.read().get(entity_type).cloned()
	}

	/// Looks up a definition, failing for unknown types
	pub fn require(&self, entity_type: &str) -> GroupResult<Arc<EntityTypeDefinition>> {
		self.get(entity_type)
			.ok_or_else(|| GroupError::UnknownEntityType(entity_type.to_string()))
	}

	/// Whether the type is registered
	pub fn contains(&self, entity_type: &str) -> bool {
		self.definitions.read().contains_key(entity_type)
	}
}
