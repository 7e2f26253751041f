//! Automatic media attachment
//!
//! When content changes, [`GroupMediaAttacher::attach`] finds the groups the
//! content belongs to, discovers the media it references and adds each media
//! item to each of those groups through the `group_media:{bundle}` plugin.
//!
//! Every refusal along the way (excluded bundle, hook veto, plugin missing or
//! not tracking, cardinality reached) is logged at debug level and skipped.
//! Nothing is cached between calls.

use crate::finder::MediaFinderRegistry;
use crate::settings::GroupMediaSettings;
use reinhardt_group_core::{Entity, GroupContent, GroupHooks, GroupResult};
use reinhardt_group_enabler::{InstalledPlugins, group_media_plugin_id};
use reinhardt_group_storage::{GroupContentStore, SaveOutcome};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Which gates an assignment run applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AssignPolicy {
	/// Consult the attach hook
	pub check_hooks: bool,
	/// Honour excluded bundles and per-plugin tracking flags
	pub automatic: bool,
}

/// Attaches discovered media to the groups of their host content
pub struct GroupMediaAttacher {
	store: Arc<GroupContentStore>,
	finders: Arc<MediaFinderRegistry>,
	hooks: Arc<GroupHooks>,
	settings: GroupMediaSettings,
}

impl GroupMediaAttacher {
	pub fn new(
		store: Arc<GroupContentStore>,
		finders: Arc<MediaFinderRegistry>,
		hooks: Arc<GroupHooks>,
		settings: GroupMediaSettings,
	) -> Self {
		Self {
			store,
			finders,
			hooks,
			settings,
		}
	}

	pub fn store(&self) -> &Arc<GroupContentStore> {
		&self.store
	}

	pub fn finders(&self) -> &Arc<MediaFinderRegistry> {
		&self.finders
	}

	pub fn settings(&self) -> &GroupMediaSettings {
		&self.settings
	}

	/// Attaches the media referenced by `entity` to the groups it belongs to
	///
	/// Returns the relations created. Disabled tracking, no candidate group
	/// and no discovered media all yield an empty result.
	pub async fn attach(&self, entity: &Entity) -> GroupResult<Vec<GroupContent>> {
		if !self.settings.tracking_enabled {
			return Ok(Vec::new());
		}
		let groups = self.get_content_groups(entity).await?;
		if groups.is_empty() {
			return Ok(Vec::new());
		}
		let items = self.get_media_from_entity(entity).await?;
		if items.is_empty() {
			return Ok(Vec::new());
		}
		self.assign(&items, &groups, AUTOMATIC).await
	}

	/// Attaches the media referenced by the target of a freshly saved
	/// relation to the relation's group
	pub async fn attach_relation(&self, relation: &GroupContent) -> GroupResult<Vec<GroupContent>> {
		if !self.settings.tracking_enabled {
			return Ok(Vec::new());
		}
		let Some(target) = self.store.load_target(relation).await? else {
			return Ok(Vec::new());
		};
		let groups = self.get_relation_groups(relation, &target).await?;
		if groups.is_empty() {
			return Ok(Vec::new());
		}
		let items = self.get_media_from_relation(relation).await?;
		if items.is_empty() {
			return Ok(Vec::new());
		}
		self.assign(&items, &groups, AUTOMATIC).await
	}

	/// Candidate groups for `entity`
	///
	/// A group is its own sole candidate; other entities yield the groups
	/// they were added to. The content groups hook may edit the list.
	pub async fn get_content_groups(&self, entity: &Entity) -> GroupResult<Vec<Entity>> {
		let mut groups = Vec::new();
		if entity.is_group() {
			groups.push(entity.clone());
		} else if entity.fieldable && !entity.is_new() {
			let mut seen = HashSet::new();
			for relation in self.store.load_by_entity(entity).await? {
				if !seen.insert(relation.group_id()) {
					continue;
				}
				if let Some(group) = self.store.load_group(&relation).await? {
					groups.push(group);
				}
			}
		}
		self.hooks.alter_content_groups(&mut groups, entity);
		Ok(groups)
	}

	/// Candidate groups for a relation: its own group, edited by the content
	/// groups hook with the relation target as subject
	pub async fn get_relation_groups(
		&self,
		relation: &GroupContent,
		target: &Entity,
	) -> GroupResult<Vec<Entity>> {
		let mut groups: Vec<Entity> = self.store.load_group(relation).await?.into_iter().collect();
		self.hooks.alter_content_groups(&mut groups, target);
		Ok(groups)
	}

	/// Media discovered in `entity` by every applicable finder
	pub async fn get_media_from_entity(&self, entity: &Entity) -> GroupResult<Vec<Entity>> {
		self.finders.process(entity).await
	}

	/// Media discovered in the target of `relation`
	pub async fn get_media_from_relation(&self, relation: &GroupContent) -> GroupResult<Vec<Entity>> {
		match self.store.load_target(relation).await? {
			Some(target) => self.get_media_from_entity(&target).await,
			None => Ok(Vec::new()),
		}
	}

	/// Adds every media item to every group where allowed
	///
	/// `check` controls whether the attach hook is consulted. Returns the
	/// relations created.
	pub async fn assign_media_to_groups(
		&self,
		items: &[Entity],
		groups: &[Entity],
		check: bool,
	) -> GroupResult<Vec<GroupContent>> {
		self.assign(
			items,
			groups,
			AssignPolicy {
				check_hooks: check,
				automatic: true,
			},
		)
		.await
	}

	pub(crate) async fn assign(
		&self,
		items: &[Entity],
		groups: &[Entity],
		policy: AssignPolicy,
	) -> GroupResult<Vec<GroupContent>> {
		let registry = self.store.registry();
		let installed_anywhere = registry.installed_instance_ids();
		let mut plugins_by_group_type: HashMap<String, Arc<InstalledPlugins>> = HashMap::new();
		let mut created = Vec::new();

		for item in items {
			let instance_id = group_media_plugin_id(&item.bundle);
			if !installed_anywhere.contains(&instance_id) {
				skip(item, None, "media bundle is not enabled in any group type");
				continue;
			}
			if policy.automatic && self.settings.is_bundle_excluded(&item.bundle) {
				skip(item, None, "media bundle is excluded from tracking");
				continue;
			}

			if item.key().is_none() {
				skip(item, None, "media is not saved");
				continue;
			}

			let mut existing = self.store.load_by_entity(item).await?;

			for group in groups {
				if policy.check_hooks && !self.hooks.should_attach(item, group) {
					skip(item, Some(group), "attach hook vetoed");
					continue;
				}

				let plugins = plugins_by_group_type
					.entry(group.bundle.clone())
					.or_insert_with(|| registry.installed_plugins(&group.bundle));
				let Some(instance) = plugins.get(&instance_id).cloned() else {
					skip(item, Some(group), "group type does not install the plugin");
					continue;
				};
				if policy.automatic && !instance.is_tracking_enabled() {
					skip(item, Some(group), "plugin tracking is disabled");
					continue;
				}
				let Some(group_id) = group.int_id() else {
					skip(item, Some(group), "group is not saved");
					continue;
				};

				let group_cardinality = instance.group_cardinality() as usize;
				if group_cardinality > 0 {
					let other_groups: BTreeSet<i64> = existing
						.iter()
						.filter(|relation| relation.content_type_id == instance.content_type_id())
						.map(GroupContent::group_id)
						.filter(|other| *other != group_id)
						.collect();
					if other_groups.len() >= group_cardinality {
						skip(item, Some(group), "group cardinality reached");
						continue;
					}
				}

				let entity_cardinality = instance.entity_cardinality() as usize;
				if entity_cardinality > 0 {
					let same_group = existing
						.iter()
						.filter(|relation| {
							relation.group_id() == group_id && relation.plugin_id == instance_id
						})
						.count();
					if same_group >= entity_cardinality {
						skip(item, Some(group), "entity cardinality reached");
						continue;
					}
				}

				let relation = match self.store.create_for_entity_in_group(item, group, &instance_id) {
					Ok(relation) => relation.with_owner(item.owner_id),
					Err(error) => {
						skip(item, Some(group), &error.to_string());
						continue;
					}
				};
				match self.store.save_validated(relation).await? {
					SaveOutcome::Saved(relation) => {
						tracing::debug!(
							media_id = ?item.id,
							media_label = %item.label,
							group_id,
							plugin_id = %instance_id,
							"Media assigned to group"
						);
						existing.push(relation.clone());
						created.push(relation);
					}
					SaveOutcome::Invalid(_) => {
						skip(item, Some(group), "rejected by cardinality validation");
					}
				}
			}
		}

		Ok(created)
	}
}

const AUTOMATIC: AssignPolicy = AssignPolicy {
	check_hooks: true,
	automatic: true,
};

fn skip(media: &Entity, group: Option<&Entity>, reason: &str) {
	tracing::debug!(
		media_id = ?media.id,
		media_label = %media.label,
		group_id = ?group.and_then(Entity::int_id),
		reason,
		"Media not assigned to group"
	);
}
