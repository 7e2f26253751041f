//! Explicit media actions
//!
//! Bulk operations an editor runs on selected media: add them to a group, or
//! remove them from one. Adding honours the attach hook and cardinality limits
//! but not the tracking switches, which only govern automatic attachment.

use crate::attacher::{AssignPolicy, GroupMediaAttacher};
use reinhardt_group_core::{Entity, GroupContent, GroupError, GroupResult};
use reinhardt_group_enabler::group_media_plugin_id;
use reinhardt_group_storage::RelationQuery;
use std::sync::Arc;

pub struct GroupMediaActions {
	attacher: Arc<GroupMediaAttacher>,
}

impl GroupMediaActions {
	pub fn new(attacher: Arc<GroupMediaAttacher>) -> Self {
		Self { attacher }
	}

	/// Adds `media` to `group`; returns the relation when one was created
	pub async fn assign_media_to_group(
		&self,
		media: &Entity,
		group: &Entity,
	) -> GroupResult<Option<GroupContent>> {
		let created = self
			.attacher
			.assign(
				std::slice::from_ref(media),
				std::slice::from_ref(group),
				AssignPolicy {
					check_hooks: true,
					automatic: false,
				},
			)
			.await?;
		Ok(created.into_iter().next())
	}

	/// Removes every `group_media` relation of `media` in `group`; returns
	/// the number removed
	pub async fn remove_media_from_group(&self, media: &Entity, group: &Entity) -> GroupResult<usize> {
		let store = self.attacher.store();
		let content_type_ids = store
			.registry()
			.content_type_ids_for(&group_media_plugin_id(&media.bundle));
		if content_type_ids.is_empty() {
			return Ok(0);
		}
		let Some(group_id) = group.int_id() else {
			return Err(GroupError::UnsavedGroup(
				"Cannot remove media from an unsaved group.".to_string(),
			));
		};
		let Some(key) = media.key() else {
			return Ok(0);
		};

		let relations = store
			.load_by_properties(
				&RelationQuery::new()
					.content_types(content_type_ids)
					.group(group_id)
					.target(&key),
			)
			.await?;
		let mut removed = 0;
		for relation in &relations {
			if store.delete(relation).await? {
				removed += 1;
			}
		}
		tracing::debug!(
			media_id = ?media.id,
			group_id,
			removed,
			"Removed media from group"
		);
		Ok(removed)
	}
}
