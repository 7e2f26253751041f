//! Test fixtures for reinhardt-group-media
//!
//! Group types:
//! - `default`: nodes (article), image media with tracking, document media
//!   without tracking
//! - `other`: nodes (article), image media with tracking
//! - `plain`: nodes (article) only
//!
//! The `audio` media bundle exists but no group type installs it.

#![allow(dead_code)]

use reinhardt_group_core::{
	Entity, EntityReferenceSchema, EntityTypeRepository, FieldDefinition, FieldItem, FieldType,
	GroupHooks,
};
use reinhardt_group_enabler::{
	BundleInfo, ContentEnablerManager, ContentEnablerRegistry, EnablerConfiguration, GroupType,
};
use reinhardt_group_media::{
	FinderContext, GroupMediaActions, GroupMediaAttacher, GroupMediaSettings, MediaFinderRegistry,
};
use reinhardt_group_storage::{
	EntityStorage, GroupContentStore, GroupManager, InMemoryEntityStorage, InMemoryRelationBackend,
};
use rstest::fixture;
use std::sync::Arc;

pub struct MediaEnv {
	pub entities: Arc<InMemoryEntityStorage>,
	pub registry: Arc<ContentEnablerRegistry>,
	pub store: Arc<GroupContentStore>,
	pub manager: GroupManager,
	pub hooks: Arc<GroupHooks>,
	pub finders: Arc<MediaFinderRegistry>,
}

impl MediaEnv {
	pub fn attacher(&self, settings: GroupMediaSettings) -> GroupMediaAttacher {
		GroupMediaAttacher::new(
			Arc::clone(&self.store),
			Arc::clone(&self.finders),
			Arc::clone(&self.hooks),
			settings,
		)
	}

	pub fn tracking_attacher(&self) -> GroupMediaAttacher {
		self.attacher(GroupMediaSettings::new().with_tracking(true))
	}

	pub fn actions(&self) -> GroupMediaActions {
		GroupMediaActions::new(Arc::new(self.tracking_attacher()))
	}

	pub async fn user(&self, name: &str) -> Entity {
		self.entities
			.save(Entity::new("user", "user").with_label(name))
			.await
			.unwrap()
	}

	pub async fn group(&self, group_type: &str, label: &str) -> Entity {
		let creator = self.user(&format!("{} owner", label)).await;
		self.manager
			.create_group(Entity::group(group_type, label), Some(&creator))
			.await
			.unwrap()
	}

	pub async fn media(&self, bundle: &str, name: &str) -> Entity {
		self.entities
			.save(Entity::new("media", bundle).with_label(name))
			.await
			.unwrap()
	}

	/// Saves an article referencing `media` through `field_media`
	pub async fn node_with_media(&self, title: &str, media: &[&Entity]) -> Entity {
		self.entities
			.save(
				Entity::new("node", "article")
					.with_label(title)
					.with_field(media_field(), references(media)),
			)
			.await
			.unwrap()
	}

	/// Saves an article embedding `media` in its body
	pub async fn node_with_embeds(&self, title: &str, media: &[&Entity]) -> Entity {
		let body = media
			.iter()
			.map(|item| {
				format!(
					r#"<drupal-media data-entity-type="media" data-entity-uuid="{}"></drupal-media>"#,
					item.uuid
				)
			})
			.collect::<String>();
		self.entities
			.save(
				Entity::new("node", "article")
					.with_label(title)
					.with_field(
						FieldDefinition::new("body", FieldType::TextLong),
						vec![FieldItem::text(body)],
					),
			)
			.await
			.unwrap()
	}

	pub async fn add_to_group(&self, group: &Entity, node: &Entity) {
		let outcome = self
			.manager
			.add_content(group, node, "group_node:article")
			.await
			.unwrap();
		assert!(outcome.is_saved());
	}

	pub fn configure(&self, group_type: &str, plugin_id: &str, configuration: EnablerConfiguration) {
		self.registry
			.update_configuration(group_type, plugin_id, configuration)
			.unwrap();
	}

	/// Number of `group_media` relations for `media` in `group`
	pub async fn media_count(&self, group: &Entity, media: &Entity) -> usize {
		let plugin_id = format!("group_media:{}", media.bundle);
		self.store
			.get_content_by_entity_id(group, &plugin_id, media.id.as_ref().unwrap())
			.await
			.unwrap()
			.len()
	}
}

pub fn media_field() -> FieldDefinition {
	FieldDefinition::entity_reference("field_media", "media")
}

pub fn references(media: &[&Entity]) -> Vec<FieldItem> {
	media
		.iter()
		.map(|item| FieldItem::reference("media", item.id.clone().unwrap()))
		.collect()
}

pub fn tracked() -> EnablerConfiguration {
	EnablerConfiguration::default().with_tracking(true)
}

#[fixture]
pub fn env() -> MediaEnv {
	let entity_types = Arc::new(EntityTypeRepository::with_defaults());
	let manager = ContentEnablerManager::with_defaults(
		BundleInfo::new()
			.with_bundle("media", "image", "Image")
			.with_bundle("media", "document", "Document")
			.with_bundle("media", "audio", "Audio")
			.with_bundle("node", "article", "Article"),
	);

	let registry = Arc::new(ContentEnablerRegistry::new(Arc::new(manager)));
	registry.register_group_type(GroupType::new("default", "Default"));
	registry.register_group_type(GroupType::new("other", "Other"));
	registry.register_group_type(GroupType::new("plain", "Plain"));
	registry.install("default", "group_node:article", None).unwrap();
	registry
		.install("default", "group_media:image", Some(tracked()))
		.unwrap();
	registry.install("default", "group_media:document", None).unwrap();
	registry.install("other", "group_node:article", None).unwrap();
	registry
		.install("other", "group_media:image", Some(tracked()))
		.unwrap();
	registry.install("plain", "group_node:article", None).unwrap();

	let entities = Arc::new(InMemoryEntityStorage::new(Arc::clone(&entity_types)));
	let store = Arc::new(GroupContentStore::new(
		Arc::new(InMemoryRelationBackend::new()),
		entities.clone(),
		Arc::clone(&registry),
		Arc::new(EntityReferenceSchema::new(entity_types)),
	));
	let hooks = Arc::new(GroupHooks::new());
	let finders = Arc::new(MediaFinderRegistry::with_defaults(FinderContext::new(
		entities.clone(),
		Arc::clone(&hooks),
	)));

	MediaEnv {
		entities,
		registry,
		manager: GroupManager::new(Arc::clone(&store)),
		store,
		hooks,
		finders,
	}
}
