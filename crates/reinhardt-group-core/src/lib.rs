//! # Reinhardt Group Core
//!
//! Shared model of the grouping system: entities and their fields, the
//! group content relation record, reference field selection, constraint
//! violations, alter hooks and the error taxonomy.
//!
//! ## Quick Start
//!
//! ```rust
//! use reinhardt_group_core::{EntityReferenceSchema, EntityTypeRepository};
//! use std::sync::Arc;
//!
//! let schema = EntityReferenceSchema::new(Arc::new(EntityTypeRepository::with_defaults()));
//! assert_eq!(schema.field_name_for("media"), "entity_id");
//! assert_eq!(schema.field_name_for("group_type"), "entity_id_str");
//! ```

pub mod entity;
pub mod entity_type;
pub mod error;
pub mod hooks;
pub mod reference;
pub mod relation;
pub mod violation;

pub use entity::{Entity, EntityId, EntityKey, FieldDefinition, FieldItem, FieldItemList, FieldType};
pub use entity_type::{
	EntityTypeDefinition, EntityTypeRepository, GROUP_ENTITY_TYPE, IdKeyType, MEDIA_ENTITY_TYPE,
	NODE_ENTITY_TYPE, PARAGRAPH_ENTITY_TYPE, USER_ENTITY_TYPE,
};
pub use error::{GroupError, GroupResult};
pub use hooks::{AlterHook, GroupHooks, HookVotes, InclusionContext};
pub use reference::{
	ColumnSchema, ColumnType, EntityReferenceSchema, ReferenceField, ReferenceFieldDefinition,
	STRING_TARGET_ID_LENGTH,
};
pub use relation::{ContentReference, GroupContent};
pub use violation::{ConstraintViolation, ConstraintViolationList, ViolationCode};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::entity::{Entity, EntityId, EntityKey, FieldDefinition, FieldItem, FieldType};
	pub use crate::entity_type::{EntityTypeDefinition, EntityTypeRepository};
	pub use crate::error::{GroupError, GroupResult};
	pub use crate::hooks::{GroupHooks, HookVotes, InclusionContext};
	pub use crate::reference::{EntityReferenceSchema, ReferenceField};
	pub use crate::relation::{ContentReference, GroupContent};
	pub use crate::violation::{ConstraintViolation, ConstraintViolationList, ViolationCode};
}
