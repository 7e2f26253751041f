//! Group content store
//!
//! [`GroupContentStore`] creates, persists and looks up relation records. It is
//! the only writer of relation state.
//!
//! Writes go through a single async write gate. A validated save holds the gate
//! across validation and the write, so two concurrent saves for the same
//! (group, plugin, entity) triple cannot both pass the cardinality check.

use crate::backend::{RelationBackend, RelationQuery};
use crate::cache_tags::{CacheTagSink, NullCacheTagSink, invalidation_tags};
use crate::entities::EntityStorage;
use crate::validator::CardinalityValidator;
use chrono::Utc;
use reinhardt_group_core::{
	ConstraintViolationList, ContentReference, Entity, EntityId, EntityReferenceSchema,
	GROUP_ENTITY_TYPE, GroupContent, GroupError, GroupResult,
};
use reinhardt_group_enabler::{ContentEnablerRegistry, PluginInstance};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of a validated save
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
	/// The relation passed validation and was persisted
	Saved(GroupContent),
	/// The relation violates a constraint and was not persisted
	Invalid(ConstraintViolationList),
}

impl SaveOutcome {
	/// Whether the relation was persisted
	pub fn is_saved(&self) -> bool {
		matches!(self, Self::Saved(_))
	}

	/// The persisted relation
	pub fn relation(&self) -> Option<&GroupContent> {
		match self {
			Self::Saved(relation) => Some(relation),
			Self::Invalid(_) => None,
		}
	}

	/// The violations that blocked the save
	pub fn violations(&self) -> Option<&ConstraintViolationList> {
		match self {
			Self::Saved(_) => None,
			Self::Invalid(violations) => Some(violations),
		}
	}
}

/// Store of group content relations
pub struct GroupContentStore {
	backend: Arc<dyn RelationBackend>,
	entities: Arc<dyn EntityStorage>,
	registry: Arc<ContentEnablerRegistry>,
	schema: Arc<EntityReferenceSchema>,
	cache_tags: Arc<dyn CacheTagSink>,
	write_gate: Mutex<()>,
}

impl GroupContentStore {
	/// Creates a store that drops cache invalidation requests
	pub fn new(
		backend: Arc<dyn RelationBackend>,
		entities: Arc<dyn EntityStorage>,
		registry: Arc<ContentEnablerRegistry>,
		schema: Arc<EntityReferenceSchema>,
	) -> Self {
		Self {
			backend,
			entities,
			registry,
			schema,
			cache_tags: Arc::new(NullCacheTagSink),
			write_gate: Mutex::new(()),
		}
	}

	/// Sends cache invalidation requests to `sink`
	#[must_use]
	pub fn with_cache_tag_sink(mut self, sink: Arc<dyn CacheTagSink>) -> Self {
		self.cache_tags = sink;
		self
	}

	/// Entity storage collaborator
	pub fn entities(&self) -> &Arc<dyn EntityStorage> {
		&self.entities
	}

	/// Plugin registry
	pub fn registry(&self) -> &Arc<ContentEnablerRegistry> {
		&self.registry
	}

	/// Reference field resolver
	pub fn schema(&self) -> &Arc<EntityReferenceSchema> {
		&self.schema
	}

	/// Cardinality validator reading from this store
	pub fn validator(&self) -> CardinalityValidator<'_> {
		CardinalityValidator::new(self)
	}

	/// Builds an unsaved relation adding `entity` to `group` through `plugin_id`
	pub fn create_for_entity_in_group(
		&self,
		entity: &Entity,
		group: &Entity,
		plugin_id: &str,
	) -> GroupResult<GroupContent> {
		let group_id = Self::saved_group_id(group, "Cannot add an entity to an unsaved group.")?;
		let (target_id, instance) = self.resolve_target(entity, &group.bundle, plugin_id)?;

		let target = ContentReference::new(
			self.schema.field_for(&entity.entity_type),
			entity.entity_type.clone(),
			target_id,
		);
		Ok(GroupContent::new(
			group_id,
			group.bundle.clone(),
			instance.content_type_id(),
			plugin_id,
			target,
		))
	}

	/// Loads a relation by id
	pub async fn load(&self, id: i64) -> GroupResult<Option<GroupContent>> {
		self.backend.load(id).await
	}

	/// Loads the entity a relation points at
	pub async fn load_target(&self, relation: &GroupContent) -> GroupResult<Option<Entity>> {
		self.entities.load_key(&relation.target_key()).await
	}

	/// Loads the group a relation belongs to
	pub async fn load_group(&self, relation: &GroupContent) -> GroupResult<Option<Entity>> {
		self.entities
			.load(GROUP_ENTITY_TYPE, &EntityId::Int(relation.group_id()))
			.await
	}

	/// Relations of `group`, optionally restricted to one plugin
	pub async fn load_by_group(
		&self,
		group: &Entity,
		plugin_id: Option<&str>,
	) -> GroupResult<Vec<GroupContent>> {
		let group_id = Self::saved_group_id(
			group,
			"Cannot load GroupContent entities for an unsaved group.",
		)?;
		let mut query = RelationQuery::new().group(group_id);
		if let Some(plugin_id) = plugin_id {
			query = query.plugin(plugin_id);
		}
		self.backend.query(&query).await
	}

	/// Relations targeting `entity`, across all groups and plugins
	pub async fn load_by_entity(&self, entity: &Entity) -> GroupResult<Vec<GroupContent>> {
		let key = entity.key().ok_or_else(|| {
			GroupError::UnsavedEntity(
				"Cannot load GroupContent entities for an unsaved entity.".to_string(),
			)
		})?;
		self.backend.query(&RelationQuery::new().target(&key)).await
	}

	/// Relations backed by `plugin_id`, across all group types
	pub async fn load_by_content_plugin_id(&self, plugin_id: &str) -> GroupResult<Vec<GroupContent>> {
		let content_type_ids = self.registry.content_type_ids_for(plugin_id);
		self.backend
			.query(&RelationQuery::new().content_types(content_type_ids))
			.await
	}

	/// Relations in `group` through `plugin_id` whose raw target id is `target_id`
	pub async fn get_content_by_entity_id(
		&self,
		group: &Entity,
		plugin_id: &str,
		target_id: &EntityId,
	) -> GroupResult<Vec<GroupContent>> {
		let group_id = Self::saved_group_id(
			group,
			"Cannot load GroupContent entities for an unsaved group.",
		)?;
		self.backend
			.query(
				&RelationQuery::new()
					.group(group_id)
					.plugin(plugin_id)
					.target_id(target_id.clone()),
			)
			.await
	}

	/// Relations matching an arbitrary property query
	pub async fn load_by_properties(&self, query: &RelationQuery) -> GroupResult<Vec<GroupContent>> {
		self.backend.query(query).await
	}

	/// Persists a relation without validation
	pub async fn save(&self, relation: GroupContent) -> GroupResult<GroupContent> {
		let _gate = self.write_gate.lock().await;
		self.write(relation).await
	}

	/// Validates cardinality and persists the relation when it passes
	pub async fn save_validated(&self, relation: GroupContent) -> GroupResult<SaveOutcome> {
		let _gate = self.write_gate.lock().await;
		let violations = self.validator().validate(&relation).await?;
		if !violations.is_empty() {
			tracing::debug!(
				group_id = relation.group_id(),
				plugin_id = %relation.plugin_id,
				target = %relation.target_key(),
				violations = violations.len(),
				"Group content rejected by cardinality validation"
			);
			return Ok(SaveOutcome::Invalid(violations));
		}
		Ok(SaveOutcome::Saved(self.write(relation).await?))
	}

	/// Deletes a relation; returns whether it existed
	pub async fn delete(&self, relation: &GroupContent) -> GroupResult<bool> {
		let Some(id) = relation.id else {
			return Ok(false);
		};
		let _gate = self.write_gate.lock().await;
		self.remove(id, relation).await
	}

	/// Deletes every relation of `group`
	pub async fn delete_by_group(&self, group: &Entity) -> GroupResult<usize> {
		let relations = self.load_by_group(group, None).await?;
		self.remove_all(relations).await
	}

	/// Deletes every relation targeting `entity`
	pub async fn delete_by_entity(&self, entity: &Entity) -> GroupResult<usize> {
		let relations = self.load_by_entity(entity).await?;
		self.remove_all(relations).await
	}

	/// Deletes every relation of the relation bundle `content_type_id`
	pub async fn delete_by_content_type(&self, content_type_id: &str) -> GroupResult<usize> {
		let relations = self
			.backend
			.query(&RelationQuery::new().content_type(content_type_id))
			.await?;
		self.remove_all(relations).await
	}

	/// Installation backing `relation`
	pub fn plugin_for(&self, relation: &GroupContent) -> GroupResult<Arc<PluginInstance>> {
		self.registry
			.content_type(&relation.content_type_id)
			.ok_or_else(|| GroupError::PluginNotFound(relation.plugin_id.clone()))
	}

	/// Checks that `entity` can join a group of type `group_type` through `plugin_id`
	///
	/// Returns the target id and the serving installation. Nothing about the
	/// group itself is checked, so this can run before the group is saved.
	pub(crate) fn resolve_target(
		&self,
		entity: &Entity,
		group_type: &str,
		plugin_id: &str,
	) -> GroupResult<(EntityId, Arc<PluginInstance>)> {
		let target_id = match (&entity.id, entity.is_new()) {
			(Some(id), false) => id.clone(),
			_ => {
				return Err(GroupError::UnsavedEntity(
					"Cannot add an unsaved entity to a group.".to_string(),
				));
			}
		};

		let instance = self
			.registry
			.installed_plugins(group_type)
			.get(plugin_id)
			.cloned()
			.filter(|instance| instance.entity_type_id() == entity.entity_type)
			.ok_or_else(|| {
				GroupError::InvalidPlugin(
					"Invalid plugin provided for adding the entity to the group.".to_string(),
				)
			})?;
		if let Some(bundle) = instance.entity_bundle()
			&& bundle != entity.bundle
		{
			return Err(GroupError::BundleMismatch {
				plugin_id: plugin_id.to_string(),
				bundle: entity.bundle.clone(),
			});
		}
		Ok((target_id, instance))
	}

	fn saved_group_id(group: &Entity, message: &str) -> GroupResult<i64> {
		if group.entity_type != GROUP_ENTITY_TYPE {
			return Err(GroupError::NotAGroup(group.display_label()));
		}
		group
			.int_id()
			.ok_or_else(|| GroupError::UnsavedGroup(message.to_string()))
	}

	async fn write(&self, mut relation: GroupContent) -> GroupResult<GroupContent> {
		let instance = self.plugin_for(&relation)?;
		relation.label = match self.load_target(&relation).await? {
			Some(target) => instance.content_label(&relation, &target),
			None => relation.target_key().to_string(),
		};
		let now = Utc::now();
		relation.changed = now;

		let saved = match relation.id {
			Some(id) => {
				let existing = self
					.backend
					.load(id)
					.await?
					.ok_or(GroupError::RelationNotFound(id))?;
				if existing.group_id() != relation.group_id() {
					return Err(GroupError::GroupImmutable {
						relation_id: id,
						group_id: existing.group_id(),
						new_group_id: relation.group_id(),
					});
				}
				relation.created = existing.created;
				self.backend.update(relation).await?
			}
			None => {
				relation.created = now;
				self.backend.insert(relation).await?
			}
		};

		tracing::debug!(
			relation_id = saved.id,
			group_id = saved.group_id(),
			plugin_id = %saved.plugin_id,
			target = %saved.target_key(),
			"Saved group content"
		);
		self.invalidate(&saved).await;
		Ok(saved)
	}

	async fn remove(&self, id: i64, relation: &GroupContent) -> GroupResult<bool> {
		let removed = self.backend.delete(id).await?;
		if removed {
			tracing::debug!(
				relation_id = id,
				group_id = relation.group_id(),
				plugin_id = %relation.plugin_id,
				"Deleted group content"
			);
			self.invalidate(relation).await;
		}
		Ok(removed)
	}

	async fn remove_all(&self, relations: Vec<GroupContent>) -> GroupResult<usize> {
		let _gate = self.write_gate.lock().await;
		let mut removed = 0;
		for relation in &relations {
			if let Some(id) = relation.id
				&& self.remove(id, relation).await?
			{
				removed += 1;
			}
		}
		Ok(removed)
	}

	async fn invalidate(&self, relation: &GroupContent) {
		let tags = invalidation_tags(relation);
		tracing::trace!(tags = ?tags, "Invalidating group content cache tags");
		let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
		self.cache_tags.invalidate_tags(&tags).await;
	}
}
