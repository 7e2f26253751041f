//! # Reinhardt Group Storage
//!
//! Storage and lookup of group content relations.
//!
//! ## Features
//!
//! - **Collaborators**: [`EntityStorage`] and [`RelationBackend`] traits with
//!   in-memory implementations
//! - **Store**: [`GroupContentStore`] with lookups by group, by entity, by
//!   plugin and by arbitrary [`RelationQuery`]
//! - **Validation**: [`CardinalityValidator`] enforcing group and entity
//!   cardinality limits
//! - **Cache tags**: [`invalidation_tags`] and the [`CacheTagSink`] contract
//! - **Lifecycle**: [`GroupManager`] for group creation, membership and
//!   cascading deletion

pub mod backend;
pub mod cache_tags;
pub mod entities;
pub mod manager;
pub mod store;
pub mod validator;

pub use backend::{InMemoryRelationBackend, RelationBackend, RelationQuery};
pub use cache_tags::{CacheTagSink, NullCacheTagSink, RecordingCacheTagSink, invalidation_tags};
pub use entities::{EntityStorage, InMemoryEntityStorage, PropertyFilter};
pub use manager::GroupManager;
pub use store::{GroupContentStore, SaveOutcome};
pub use validator::CardinalityValidator;
