//! Test fixtures for reinhardt-group-storage
//!
//! Builds a complete in-memory grouping environment with two group types and a
//! few test enablers, including enablers serving string-keyed entities.

#![allow(dead_code)]

use reinhardt_group_core::{Entity, EntityReferenceSchema, EntityTypeDefinition, EntityTypeRepository};
use reinhardt_group_enabler::{
	BundleInfo, ContentEnablerManager, ContentEnablerRegistry, EnablerConfiguration,
	EnablerDefinition, EntityAsContentEnabler, GroupType,
};
use reinhardt_group_storage::{
	EntityStorage, GroupContentStore, GroupManager, InMemoryEntityStorage, InMemoryRelationBackend,
	RecordingCacheTagSink,
};
use rstest::fixture;
use std::sync::Arc;

pub const STRING_CONTENT_TYPE: &str = "entity_test_string";
pub const STRING_CONTENT_PLUGIN: &str = "entity_test_as_content";
pub const CONFIG_CONTENT_PLUGIN: &str = "group_type_as_content";

pub struct TestEnv {
	pub entities: Arc<InMemoryEntityStorage>,
	pub registry: Arc<ContentEnablerRegistry>,
	pub store: Arc<GroupContentStore>,
	pub manager: GroupManager,
	pub cache_tags: Arc<RecordingCacheTagSink>,
}

impl TestEnv {
	pub async fn user(&self, name: &str) -> Entity {
		self.entities
			.save(Entity::new("user", "user").with_label(name))
			.await
			.unwrap()
	}

	pub async fn group(&self, group_type: &str, label: &str, creator: &Entity) -> Entity {
		self.manager
			.create_group(Entity::group(group_type, label), Some(creator))
			.await
			.unwrap()
	}

	pub async fn node(&self, bundle: &str, title: &str) -> Entity {
		self.entities
			.save(Entity::new("node", bundle).with_label(title))
			.await
			.unwrap()
	}

	pub async fn media(&self, bundle: &str, name: &str) -> Entity {
		self.entities
			.save(Entity::new("media", bundle).with_label(name))
			.await
			.unwrap()
	}

	pub fn configure(&self, group_type: &str, plugin_id: &str, configuration: EnablerConfiguration) {
		self.registry
			.update_configuration(group_type, plugin_id, configuration)
			.unwrap();
	}
}

#[fixture]
pub fn env() -> TestEnv {
	let entity_types = EntityTypeRepository::with_defaults();
	entity_types.register(EntityTypeDefinition::string_content(
		STRING_CONTENT_TYPE,
		"Test entity with string id",
	));
	let entity_types = Arc::new(entity_types);

	let manager = ContentEnablerManager::with_defaults(
		BundleInfo::new()
			.with_bundle("media", "image", "Image")
			.with_bundle("media", "document", "Document")
			.with_bundle("node", "article", "Article")
			.with_bundle("node", "page", "Basic page"),
	);
	manager.register(Arc::new(EntityAsContentEnabler::new(EnablerDefinition::new(
		STRING_CONTENT_PLUGIN,
		"Test entity as content",
		STRING_CONTENT_TYPE,
	))));
	manager.register(Arc::new(EntityAsContentEnabler::new(EnablerDefinition::new(
		CONFIG_CONTENT_PLUGIN,
		"Group type as content",
		"group_type",
	))));

	let registry = Arc::new(ContentEnablerRegistry::new(Arc::new(manager)));
	registry.register_group_type(GroupType::new("default", "Default").with_creator_roles(["default-admin"]));
	registry.register_group_type(GroupType::new("other", "Other"));
	for plugin_id in [
		"group_node:article",
		"group_media:image",
		STRING_CONTENT_PLUGIN,
		CONFIG_CONTENT_PLUGIN,
	] {
		registry.install("default", plugin_id, None).unwrap();
	}
	registry.install("other", "group_node:article", None).unwrap();

	let entities = Arc::new(InMemoryEntityStorage::new(Arc::clone(&entity_types)));
	let cache_tags = Arc::new(RecordingCacheTagSink::new());
	let store = Arc::new(
		GroupContentStore::new(
			Arc::new(InMemoryRelationBackend::new()),
			entities.clone(),
			Arc::clone(&registry),
			Arc::new(EntityReferenceSchema::new(entity_types)),
		)
		.with_cache_tag_sink(cache_tags.clone()),
	);

	TestEnv {
		entities,
		registry,
		manager: GroupManager::new(Arc::clone(&store)),
		store,
		cache_tags,
	}
}
