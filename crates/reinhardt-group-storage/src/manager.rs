//! Group lifecycle
//!
//! [`GroupManager`] wraps the store with the operations a group exposes:
//! creation with the creator's membership, adding content and members, and
//! cascading deletion.

use crate::store::{GroupContentStore, SaveOutcome};
use reinhardt_group_core::{
	Entity, EntityId, GroupContent, GroupError, GroupResult, USER_ENTITY_TYPE,
};
use reinhardt_group_enabler::GROUP_MEMBERSHIP_PLUGIN_ID;
use std::sync::Arc;

/// Group level operations over a [`GroupContentStore`]
#[derive(Clone)]
pub struct GroupManager {
	store: Arc<GroupContentStore>,
}

impl GroupManager {
	/// Creates a manager over `store`
	pub fn new(store: Arc<GroupContentStore>) -> Self {
		Self { store }
	}

	/// The underlying store
	pub fn store(&self) -> &Arc<GroupContentStore> {
		&self.store
	}

	/// Persists a new group
	///
	/// When the group type grants creator membership, the creator (or, when
	/// `creator` is `None`, the group owner) becomes a member with the group
	/// type's creator roles.
	pub async fn create_group(&self, group: Entity, creator: Option<&Entity>) -> GroupResult<Entity> {
		if !group.is_group() {
			return Err(GroupError::NotAGroup(group.display_label()));
		}
		let group_type = self.store.registry().group_type(&group.bundle)?;

		let owner = match creator {
			Some(creator) => Some(creator.clone()),
			None => match group.owner_id {
				Some(owner_id) => {
					self.store
						.entities()
						.load(USER_ENTITY_TYPE, &EntityId::Int(owner_id))
						.await?
				}
				None => None,
			},
		};

		let mut group = group;
		if group.owner_id.is_none() {
			group.owner_id = owner.as_ref().and_then(Entity::int_id);
		}

		// Membership preconditions are checked before anything is persisted
		let membership_owner = owner.filter(|_| group_type.creator_membership);
		if let Some(owner) = &membership_owner {
			self.store
				.resolve_target(owner, &group.bundle, GROUP_MEMBERSHIP_PLUGIN_ID)?;
		}
		let group = self.store.entities().save(group).await?;
		tracing::debug!(group_id = ?group.id, group_type = %group.bundle, "Created group");

		if let Some(owner) = membership_owner
			&& let Err(error) = self
				.add_creator_membership(&group, &owner, &group_type.creator_roles)
				.await
		{
			if let Some(key) = group.key() {
				self.store.entities().delete(&key).await?;
			}
			tracing::warn!(group_id = ?group.id, %error, "Rolled back group without creator membership");
			return Err(error);
		}

		Ok(group)
	}

	async fn add_creator_membership(
		&self,
		group: &Entity,
		owner: &Entity,
		roles: &[String],
	) -> GroupResult<GroupContent> {
		let relation = self
			.store
			.create_for_entity_in_group(owner, group, GROUP_MEMBERSHIP_PLUGIN_ID)?
			.with_owner(owner.int_id())
			.with_roles(roles.to_vec());
		self.store.save(relation).await
	}

	/// Adds `entity` to `group` through `plugin_id`, subject to cardinality limits
	pub async fn add_content(
		&self,
		group: &Entity,
		entity: &Entity,
		plugin_id: &str,
	) -> GroupResult<SaveOutcome> {
		let relation = self
			.store
			.create_for_entity_in_group(entity, group, plugin_id)?
			.with_owner(entity.owner_id);
		self.store.save_validated(relation).await
	}

	/// Adds `user` to `group` as a member with `roles`
	pub async fn add_member(
		&self,
		group: &Entity,
		user: &Entity,
		roles: Vec<String>,
	) -> GroupResult<SaveOutcome> {
		let relation = self
			.store
			.create_for_entity_in_group(user, group, GROUP_MEMBERSHIP_PLUGIN_ID)?
			.with_owner(user.int_id())
			.with_roles(roles);
		self.store.save_validated(relation).await
	}

	/// Relations of `group`, optionally restricted to one plugin
	pub async fn get_content(
		&self,
		group: &Entity,
		plugin_id: Option<&str>,
	) -> GroupResult<Vec<GroupContent>> {
		self.store.load_by_group(group, plugin_id).await
	}

	/// Entities added to `group`, optionally restricted to one plugin
	pub async fn get_content_entities(
		&self,
		group: &Entity,
		plugin_id: Option<&str>,
	) -> GroupResult<Vec<Entity>> {
		let mut entities = Vec::new();
		for relation in self.get_content(group, plugin_id).await? {
			if let Some(entity) = self.store.load_target(&relation).await? {
				entities.push(entity);
			}
		}
		Ok(entities)
	}

	/// Membership of `user` in `group`
	pub async fn get_member(&self, group: &Entity, user: &Entity) -> GroupResult<Option<GroupContent>> {
		let Some(user_id) = user.key().map(|key| key.id) else {
			return Ok(None);
		};
		Ok(self
			.store
			.get_content_by_entity_id(group, GROUP_MEMBERSHIP_PLUGIN_ID, &user_id)
			.await?
			.into_iter()
			.next())
	}

	/// Removes a relation
	pub async fn remove_content(&self, relation: &GroupContent) -> GroupResult<bool> {
		self.store.delete(relation).await
	}

	/// Deletes a group with its relations, and its relations as subgroup content
	pub async fn delete_group(&self, group: &Entity) -> GroupResult<usize> {
		let mut removed = self.store.delete_by_group(group).await?;
		removed += self.store.delete_by_entity(group).await?;
		if let Some(key) = group.key() {
			self.store.entities().delete(&key).await?;
		}
		tracing::debug!(group_id = ?group.id, relations = removed, "Deleted group");
		Ok(removed)
	}

	/// Deletes an entity along with every relation targeting it
	pub async fn delete_entity(&self, entity: &Entity) -> GroupResult<usize> {
		if entity.is_group() {
			return self.delete_group(entity).await;
		}
		let removed = self.store.delete_by_entity(entity).await?;
		if let Some(key) = entity.key() {
			self.store.entities().delete(&key).await?;
		}
		Ok(removed)
	}

	/// Uninstalls a plugin from a group type, deleting its relations first
	pub async fn uninstall_plugin(&self, group_type: &str, plugin_id: &str) -> GroupResult<usize> {
		let instance = self.store.registry().get(group_type, plugin_id)?;
		if instance.enabler().is_enforced() {
			return Err(GroupError::InvalidPlugin(format!(
				"{} is enforced and cannot be uninstalled",
				plugin_id
			)));
		}
		let removed = self
			.store
			.delete_by_content_type(instance.content_type_id())
			.await?;
		self.store.registry().uninstall(group_type, plugin_id)?;
		Ok(removed)
	}
}
