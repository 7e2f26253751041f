//! The group content relation record

use crate::entity::{EntityId, EntityKey};
use crate::reference::ReferenceField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target of a relation, stored in one of the two reference fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentReference {
	/// Physical field holding the target id
	pub field: ReferenceField,
	/// Target entity type
	pub entity_type: String,
	/// Raw target id
	pub target_id: EntityId,
}

impl ContentReference {
	/// Creates a reference
	pub fn new(field: ReferenceField, entity_type: impl Into<String>, target_id: EntityId) -> Self {
		Self {
			field,
			entity_type: entity_type.into(),
			target_id,
		}
	}

	/// Key of the referenced entity
	pub fn key(&self) -> EntityKey {
		EntityKey::new(self.entity_type.clone(), self.target_id.clone())
	}
}

/// Join record linking a group to a target entity through a content enabler
///
/// The group is fixed at construction; there is no way to move a relation to
/// another group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupContent {
	/// Id, `None` until saved
	pub id: Option<i64>,
	/// Stable external identifier
	pub uuid: Uuid,
	group_id: i64,
	/// Bundle of the owning group
	pub group_type: String,
	/// Relation bundle (content type config id)
	pub content_type_id: String,
	/// Content enabler plugin id
	pub plugin_id: String,
	/// The grouped entity
	pub target: ContentReference,
	/// Creator of the relation
	pub owner_id: Option<i64>,
	/// Computed label, refreshed on save
	pub label: String,
	/// Group role ids (memberships only)
	pub group_roles: Vec<String>,
	/// Creation time
	pub created: DateTime<Utc>,
	/// Last change time
	pub changed: DateTime<Utc>,
}

impl GroupContent {
	/// Creates a new unsaved relation
	pub fn new(
		group_id: i64,
		group_type: impl Into<String>,
		content_type_id: impl Into<String>,
		plugin_id: impl Into<String>,
		target: ContentReference,
	) -> Self {
		let now = Utc::now();
		Self {
			id: None,
			uuid: Uuid::new_v4(),
			group_id,
			group_type: group_type.into(),
			content_type_id: content_type_id.into(),
			plugin_id: plugin_id.into(),
			target,
			owner_id: None,
			label: String::new(),
			group_roles: Vec::new(),
			created: now,
			changed: now,
		}
	}

	/// Owning group id
	pub fn group_id(&self) -> i64 {
		self.group_id
	}

	/// Whether the relation has not been saved yet
	pub fn is_new(&self) -> bool {
		self.id.is_none()
	}

	/// Key of the grouped entity
	pub fn target_key(&self) -> EntityKey {
		self.target.key()
	}

	/// Name of the reference field holding the target
	pub fn entity_field_name(&self) -> &'static str {
		self.target.field.name()
	}

	/// Sets the creator
	#[must_use]
	pub fn with_owner(mut self, owner_id: Option<i64>) -> Self {
		self.owner_id = owner_id;
		self
	}

	/// Sets the group roles
	#[must_use]
	pub fn with_roles(mut self, roles: Vec<String>) -> Self {
		self.group_roles = roles;
		self
	}
}
