//! Cache tag computation for relations
//!
//! Lists of relations can be scoped by group, by target entity, by plugin, or
//! by a plugin combined with one of the other two. Saving or deleting a relation
//! invalidates every list it can appear in, plus the relation itself.

use async_trait::async_trait;
use parking_lot::Mutex;
use reinhardt_group_core::GroupContent;
use std::collections::BTreeSet;

/// Tags to invalidate when `relation` changes
///
/// # Examples
///
/// ```
/// use reinhardt_group_core::{ContentReference, EntityId, GroupContent, ReferenceField};
/// use reinhardt_group_storage::invalidation_tags;
///
/// let mut relation = GroupContent::new(
///     3,
///     "club",
///     "club-group_media-image",
///     "group_media:image",
///     ContentReference::new(ReferenceField::Numeric, "media", EntityId::Int(8)),
/// );
/// relation.id = Some(21);
///
/// let tags = invalidation_tags(&relation);
/// assert!(tags.contains("group_content:21"));
/// assert!(tags.contains("group_content_list:plugin:group_media:image:group:3"));
/// assert_eq!(tags.len(), 6);
/// ```
pub fn invalidation_tags(relation: &GroupContent) -> BTreeSet<String> {
	let group_id = relation.group_id();
	let entity_id = &relation.target.target_id;
	let plugin_id = &relation.plugin_id;

	let mut tags = BTreeSet::from([
		format!("group_content_list:group:{}", group_id),
		format!("group_content_list:entity:{}", entity_id),
		format!("group_content_list:plugin:{}", plugin_id),
		format!("group_content_list:plugin:{}:group:{}", plugin_id, group_id),
		format!("group_content_list:plugin:{}:entity:{}", plugin_id, entity_id),
	]);
	if let Some(id) = relation.id {
		tags.insert(format!("group_content:{}", id));
	}
	tags
}

/// Receiver of cache invalidation requests
#[async_trait]
pub trait CacheTagSink: Send + Sync {
	/// Invalidates every entry carrying any of `tags`
	async fn invalidate_tags(&self, tags: &[&str]);
}

/// Sink that drops every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheTagSink;

#[async_trait]
impl CacheTagSink for NullCacheTagSink {
	async fn invalidate_tags(&self, _tags: &[&str]) {}
}

/// Sink that records requested tags, in request order
#[derive(Debug, Default)]
pub struct RecordingCacheTagSink {
	invalidated: Mutex<Vec<String>>,
}

impl RecordingCacheTagSink {
	/// Creates an empty recorder
	pub fn new() -> Self {
		Self::default()
	}

	/// Tags recorded so far
	pub fn invalidated(&self) -> Vec<String> {
		self.invalidated.lock().clone()
	}

	/// Drains the recorded tags
	pub fn take(&self) -> Vec<String> {
		std::mem::take(&mut *self.invalidated.lock())
	}
}

#[async_trait]
impl CacheTagSink for RecordingCacheTagSink {
	async fn invalidate_tags(&self, tags: &[&str]) {
		self.invalidated
			.lock()
			.extend(tags.iter().map(|tag| tag.to_string()));
	}
}
