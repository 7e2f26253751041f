//! Error taxonomy of the grouping system

use thiserror::Error;

/// Errors raised by the grouping system
///
/// Every variant is a precondition failure of the calling operation. Cardinality
/// limits are never reported through this type; see
/// [`ConstraintViolationList`](crate::violation::ConstraintViolationList).
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupError {
	/// The group has not been persisted yet
	#[error("{0}")]
	UnsavedGroup(String),

	/// The entity has not been persisted yet
	#[error("{0}")]
	UnsavedEntity(String),

	/// The plugin is not installed on the group type or does not serve the entity type
	#[error("{0}")]
	InvalidPlugin(String),

	/// The plugin is restricted to a bundle the entity does not have
	#[error("The provided plugin {plugin_id} does not support the entity's bundle {bundle}")]
	BundleMismatch { plugin_id: String, bundle: String },

	/// No content enabler with that id is installed or defined
	#[error("Content enabler plugin not found: {0}")]
	PluginNotFound(String),

	/// The plugin is already installed on the group type
	#[error("Plugin {plugin_id} is already installed on group type {group_type}")]
	PluginAlreadyInstalled {
		group_type: String,
		plugin_id: String,
	},

	/// Group type is not registered
	#[error("Group type not found: {0}")]
	GroupTypeNotFound(String),

	/// Entity type is not registered with the entity type repository
	#[error("Unknown entity type: {0}")]
	UnknownEntityType(String),

	/// The entity passed as a group is not a group
	#[error("Entity {0} is not a group")]
	NotAGroup(String),

	/// A relation cannot be moved to another group once saved
	#[error("Group content {relation_id} belongs to group {group_id} and cannot be moved to group {new_group_id}")]
	GroupImmutable {
		relation_id: i64,
		group_id: i64,
		new_group_id: i64,
	},

	/// String-keyed entities must carry their id before being saved
	#[error("Entities of type {0} need an explicit string id before saving")]
	MissingStringId(String),

	/// Relation not found
	#[error("Group content not found: {0}")]
	RelationNotFound(i64),

	/// Failure reported by a storage collaborator
	#[error("Storage error: {0}")]
	Storage(String),
}

impl GroupError {
	/// Returns true for errors caused by inputs that were never persisted
	pub fn is_unsaved(&self) -> bool {
		matches!(self, Self::UnsavedGroup(_) | Self::UnsavedEntity(_))
	}
}

/// Result type for grouping operations
pub type GroupResult<T> = std::result::Result<T, GroupError>;
