//! # Reinhardt Group
//!
//! Generic grouping for Rust applications: arbitrary entities (users, content,
//! media, other groups) are attached to a group through content enabler
//! plugins, each with its own cardinality limits.
//!
//! ## Feature Flags
//!
//! - `media` (default) - Media discovery and automatic media attachment
//! - `minimal` - Relation model, enablers and storage only
//! - `full` - All features enabled
//!
//! ## Crates
//!
//! - [`core`] - Entities, the group content relation, reference fields,
//!   constraint violations and alter hooks
//! - [`enabler`] - Content enabler plugins and their per group type installation
//! - [`storage`] - Relation store, cardinality validation and group lifecycle
//! - [`media`] - Media finders and the media attacher
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use reinhardt_group::prelude::*;
//! use std::sync::Arc;
//!
//! let entity_types = Arc::new(EntityTypeRepository::with_defaults());
//! let registry = Arc::new(ContentEnablerRegistry::new(Arc::new(
//!     ContentEnablerManager::with_defaults(BundleInfo::new().with_bundle("node", "article", "Article")),
//! )));
//! registry.register_group_type(GroupType::new("club", "Club"));
//! registry.install("club", "group_node:article", None)?;
//!
//! let entities = Arc::new(InMemoryEntityStorage::new(Arc::clone(&entity_types)));
//! let store = Arc::new(GroupContentStore::new(
//!     Arc::new(InMemoryRelationBackend::new()),
//!     entities.clone(),
//!     registry,
//!     Arc::new(EntityReferenceSchema::new(entity_types)),
//! ));
//! let manager = GroupManager::new(store);
//!
//! let owner = entities.save(Entity::new("user", "user").with_label("Ada")).await?;
//! let club = manager.create_group(Entity::group("club", "Rustaceans"), Some(&owner)).await?;
//! let article = entities.save(Entity::new("node", "article").with_label("Hello")).await?;
//! let outcome = manager.add_content(&club, &article, "group_node:article").await?;
//! assert!(outcome.is_saved());
//! ```

pub use reinhardt_group_core as core;
pub use reinhardt_group_enabler as enabler;
#[cfg(feature = "media")]
pub use reinhardt_group_media as media;
pub use reinhardt_group_storage as storage;

pub use reinhardt_group_core::{
	ConstraintViolation, ConstraintViolationList, Entity, EntityId, EntityKey,
	EntityReferenceSchema, EntityTypeRepository, GroupContent, GroupError, GroupHooks,
	GroupResult, ViolationCode,
};
pub use reinhardt_group_enabler::{
	BundleInfo, ContentEnabler, ContentEnablerManager, ContentEnablerRegistry,
	EnablerConfiguration, GroupType, PluginInstance,
};
#[cfg(feature = "media")]
pub use reinhardt_group_media::{
	GroupMediaActions, GroupMediaAttacher, GroupMediaSettings, MediaFinder, MediaFinderRegistry,
};
pub use reinhardt_group_storage::{
	CardinalityValidator, EntityStorage, GroupContentStore, GroupManager, RelationBackend,
	SaveOutcome,
};

/// Prelude module for convenient imports
pub mod prelude {
	pub use reinhardt_group_core::prelude::*;
	pub use reinhardt_group_enabler::{
		BundleInfo, ContentEnabler, ContentEnablerManager, ContentEnablerRegistry,
		EnablerConfiguration, GroupType,
	};
	pub use reinhardt_group_storage::{
		EntityStorage, GroupContentStore, GroupManager, InMemoryEntityStorage,
		InMemoryRelationBackend, RelationBackend, RelationQuery, SaveOutcome,
	};

	#[cfg(feature = "media")]
	pub use reinhardt_group_media::{
		FinderContext, GroupMediaActions, GroupMediaAttacher, GroupMediaSettings, MediaFinder,
		MediaFinderRegistry,
	};

	pub use async_trait::async_trait;
}
