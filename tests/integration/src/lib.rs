//! Integration test utilities for Reinhardt Group
//!
//! [`GroupSite`] wires every crate of the workspace together over in-memory
//! storage, the way an application would at startup.

use reinhardt_group::core::{EntityTypeDefinition, FieldDefinition, FieldItem, FieldType};
use reinhardt_group::enabler::{EnablerDefinition, EntityAsContentEnabler};
use reinhardt_group::media::FinderContext;
use reinhardt_group::prelude::*;
use std::sync::Arc;

/// String-keyed content type used to exercise `entity_id_str` references
pub const STRING_CONTENT_TYPE: &str = "entity_test_string";
/// Enabler serving [`STRING_CONTENT_TYPE`]
pub const STRING_CONTENT_PLUGIN: &str = "entity_test_as_content";

/// A fully wired in-memory grouping site
///
/// Group types:
/// - `club`: articles, image media (tracking on) and string-keyed test content
/// - `team`: articles and image media (tracking on)
pub struct GroupSite {
	pub entity_types: Arc<EntityTypeRepository>,
	pub entities: Arc<InMemoryEntityStorage>,
	pub registry: Arc<ContentEnablerRegistry>,
	pub schema: Arc<EntityReferenceSchema>,
	pub store: Arc<GroupContentStore>,
	pub manager: GroupManager,
	pub hooks: Arc<GroupHooks>,
	pub finders: Arc<MediaFinderRegistry>,
}

impl GroupSite {
	pub fn new() -> Self {
		let entity_types = EntityTypeRepository::with_defaults();
		entity_types.register(EntityTypeDefinition::string_content(
			STRING_CONTENT_TYPE,
			"Test entity with string id",
		));
		let entity_types = Arc::new(entity_types);

		let manager = ContentEnablerManager::with_defaults(
			BundleInfo::new()
				.with_bundle("media", "image", "Image")
				.with_bundle("node", "article", "Article"),
		);
		manager.register(Arc::new(EntityAsContentEnabler::new(EnablerDefinition::new(
			STRING_CONTENT_PLUGIN,
			"Test entity as content",
			STRING_CONTENT_TYPE,
		))));

		let registry = Arc::new(ContentEnablerRegistry::new(Arc::new(manager)));
		registry.register_group_type(GroupType::new("club", "Club").with_creator_roles(["club-admin"]));
		registry.register_group_type(GroupType::new("team", "Team"));
		let tracked = EnablerConfiguration::default().with_tracking(true);
		for group_type in ["club", "team"] {
			registry
				.install(group_type, "group_node:article", None)
				.expect("Failed to install group_node:article");
			registry
				.install(group_type, "group_media:image", Some(tracked.clone()))
				.expect("Failed to install group_media:image");
		}
		registry
			.install("club", STRING_CONTENT_PLUGIN, None)
			.expect("Failed to install string content plugin");

		let schema = Arc::new(EntityReferenceSchema::new(Arc::clone(&entity_types)));
		let entities = Arc::new(InMemoryEntityStorage::new(Arc::clone(&entity_types)));
		let store = Arc::new(GroupContentStore::new(
			Arc::new(InMemoryRelationBackend::new()),
			entities.clone(),
			Arc::clone(&registry),
			Arc::clone(&schema),
		));
		let hooks = Arc::new(GroupHooks::new());
		let finders = Arc::new(MediaFinderRegistry::with_defaults(FinderContext::new(
			entities.clone(),
			Arc::clone(&hooks),
		)));

		Self {
			entity_types,
			entities,
			registry,
			schema,
			manager: GroupManager::new(Arc::clone(&store)),
			store,
			hooks,
			finders,
		}
	}

	/// Attacher with the given global settings
	pub fn attacher(&self, settings: GroupMediaSettings) -> GroupMediaAttacher {
		GroupMediaAttacher::new(
			Arc::clone(&self.store),
			Arc::clone(&self.finders),
			Arc::clone(&self.hooks),
			settings,
		)
	}

	pub fn configure(&self, group_type: &str, plugin_id: &str, configuration: EnablerConfiguration) {
		self.registry
			.update_configuration(group_type, plugin_id, configuration)
			.expect("Failed to update plugin configuration");
	}

	pub async fn save(&self, entity: Entity) -> Entity {
		self.entities
			.save(entity)
			.await
			.expect("Failed to save entity")
	}

	pub async fn user(&self, name: &str) -> Entity {
		self.save(Entity::new("user", "user").with_label(name)).await
	}

	pub async fn group(&self, group_type: &str, label: &str, creator: &Entity) -> Entity {
		self.manager
			.create_group(Entity::group(group_type, label), Some(creator))
			.await
			.expect("Failed to create group")
	}

	pub async fn image(&self, name: &str) -> Entity {
		self.save(Entity::new("media", "image").with_label(name)).await
	}

	/// Saves an article referencing `media` through `field_media`
	pub async fn article(&self, title: &str, media: &[&Entity]) -> Entity {
		let references = media
			.iter()
			.filter_map(|item| item.id.clone())
			.map(|id| FieldItem::reference("media", id))
			.collect();
		self.save(
			Entity::new("node", "article")
				.with_label(title)
				.with_field(FieldDefinition::entity_reference("field_media", "media"), references)
				.with_field(FieldDefinition::new("body", FieldType::TextLong), Vec::new()),
		)
		.await
	}

	/// Number of image media relations for `media` in `group`
	pub async fn image_count(&self, group: &Entity, media: &Entity) -> usize {
		let Some(id) = media.id.as_ref() else {
			return 0;
		};
		self.store
			.get_content_by_entity_id(group, "group_media:image", id)
			.await
			.expect("Failed to load group media relations")
			.len()
	}
}

impl Default for GroupSite {
	fn default() -> Self {
		Self::new()
	}
}
