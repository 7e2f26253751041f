//! Relation backend
//!
//! [`RelationBackend`] persists [`GroupContent`] records and answers
//! [`RelationQuery`] lookups. The in-memory backend keeps secondary indexes by
//! group and by target entity so the common lookups never scan the table.

use async_trait::async_trait;
use parking_lot::RwLock;
use reinhardt_group_core::{EntityId, EntityKey, GroupContent, GroupError, GroupResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Property query over relations
///
/// Every set filter is an IN filter; filters are AND-combined. An empty set
/// matches nothing, an absent filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationQuery {
	/// Group ids
	pub group_ids: Option<BTreeSet<i64>>,
	/// Relation bundles
	pub content_type_ids: Option<BTreeSet<String>>,
	/// Plugin ids
	pub plugin_ids: Option<BTreeSet<String>>,
	/// Target entity type
	pub target_type: Option<String>,
	/// Raw target ids
	pub target_ids: Option<BTreeSet<EntityId>>,
}

impl RelationQuery {
	/// Query matching every relation
	pub fn new() -> Self {
		Self::default()
	}

	/// Restricts to one group
	#[must_use]
	pub fn group(self, group_id: i64) -> Self {
		self.groups([group_id])
	}

	/// Restricts to several groups
	#[must_use]
	pub fn groups(mut self, group_ids: impl IntoIterator<Item = i64>) -> Self {
		self.group_ids = Some(group_ids.into_iter().collect());
		self
	}

	/// Restricts to one relation bundle
	#[must_use]
	pub fn content_type(self, content_type_id: impl Into<String>) -> Self {
		self.content_types([content_type_id.into()])
	}

	/// Restricts to several relation bundles
	#[must_use]
	pub fn content_types<I, S>(mut self, content_type_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.content_type_ids = Some(content_type_ids.into_iter().map(Into::into).collect());
		self
	}

	/// Restricts to one plugin
	#[must_use]
	pub fn plugin(mut self, plugin_id: impl Into<String>) -> Self {
		self.plugin_ids = Some(BTreeSet::from([plugin_id.into()]));
		self
	}

	/// Restricts to one target entity
	#[must_use]
	pub fn target(self, key: &EntityKey) -> Self {
		self.target_type(key.entity_type.clone())
			.target_id(key.id.clone())
	}

	/// Restricts to one target entity type
	#[must_use]
	pub fn target_type(mut self, entity_type: impl Into<String>) -> Self {
		self.target_type = Some(entity_type.into());
		self
	}

	/// Restricts to one raw target id
	#[must_use]
	pub fn target_id(mut self, id: impl Into<EntityId>) -> Self {
		self.target_ids = Some(BTreeSet::from([id.into()]));
		self
	}

	/// Whether `relation` satisfies every filter
	pub fn matches(&self, relation: &GroupContent) -> bool {
		fn allows<T: Ord>(filter: &Option<BTreeSet<T>>, value: &T) -> bool {
			filter.as_ref().is_none_or(|set| set.contains(value))
		}

		allows(&self.group_ids, &relation.group_id())
			&& allows(&self.content_type_ids, &relation.content_type_id)
			&& allows(&self.plugin_ids, &relation.plugin_id)
			&& allows(&self.target_ids, &relation.target.target_id)
			&& self
				.target_type
				.as_ref()
				.is_none_or(|entity_type| entity_type == &relation.target.entity_type)
	}
}

/// Persistence of relation records
#[async_trait]
pub trait RelationBackend: Send + Sync {
	/// Inserts a new relation, assigning its id
	async fn insert(&self, relation: GroupContent) -> GroupResult<GroupContent>;

	/// Replaces a persisted relation
	async fn update(&self, relation: GroupContent) -> GroupResult<GroupContent>;

	/// Deletes a relation; returns whether it existed
	async fn delete(&self, id: i64) -> GroupResult<bool>;

	/// Loads a relation by id
	async fn load(&self, id: i64) -> GroupResult<Option<GroupContent>>;

	/// Relations matching `query`, ordered by id
	async fn query(&self, query: &RelationQuery) -> GroupResult<Vec<GroupContent>>;
}

#[derive(Default)]
struct RelationTable {
	rows: BTreeMap<i64, GroupContent>,
	by_group: HashMap<i64, BTreeSet<i64>>,
	by_target: HashMap<EntityKey, BTreeSet<i64>>,
	next_id: i64,
}

impl RelationTable {
	fn index(&mut self, id: i64, relation: &GroupContent) {
		self.by_group
			.entry(relation.group_id())
			.or_default()
			.insert(id);
		self.by_target
			.entry(relation.target_key())
			.or_default()
			.insert(id);
	}

	fn unindex(&mut self, id: i64, relation: &GroupContent) {
		if let Some(ids) = self.by_group.get_mut(&relation.group_id()) {
			ids.remove(&id);
			if ids.is_empty() {
				self.by_group.remove(&relation.group_id());
			}
		}
		let key = relation.target_key();
		if let Some(ids) = self.by_target.get_mut(&key) {
			ids.remove(&id);
			if ids.is_empty() {
				self.by_target.remove(&key);
			}
		}
	}

	fn candidates(&self, query: &RelationQuery) -> Option<BTreeSet<i64>> {
		if let (Some(entity_type), Some(target_ids)) = (&query.target_type, &query.target_ids) {
			return Some(
				target_ids
					.iter()
					.filter_map(|id| {
						self.by_target
							.get(&EntityKey::new(entity_type.clone(), id.clone()))
					})
					.flatten()
					.copied()
					.collect(),
			);
		}
		query.group_ids.as_ref().map(|group_ids| {
			group_ids
				.iter()
				.filter_map(|group_id| self.by_group.get(group_id))
				.flatten()
				.copied()
				.collect()
		})
	}
}

/// In-memory [`RelationBackend`] with group and target indexes
#[derive(Default)]
pub struct InMemoryRelationBackend {
	table: RwLock<RelationTable>,
}

impl InMemoryRelationBackend {
	/// Creates an empty backend
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored relations
	pub fn len(&self) -> usize {
		self.table.read().rows.len()
	}

	/// Whether no relation is stored
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl RelationBackend for InMemoryRelationBackend {
	async fn insert(&self, mut relation: GroupContent) -> GroupResult<GroupContent> {
		let mut table = self.table.write();
		table.next_id += 1;
		let id = table.next_id;
		relation.id = Some(id);
		table.index(id, &relation);
		table.rows.insert(id, relation.clone());
		Ok(relation)
	}

	async fn update(&self, relation: GroupContent) -> GroupResult<GroupContent> {
		let id = relation
			.id
			.ok_or_else(|| GroupError::Storage("Cannot update an unsaved relation".to_string()))?;
		let mut table = self.table.write();
		let previous = table
			.rows
			.remove(&id)
			.ok_or(GroupError::RelationNotFound(id))?;
		table.unindex(id, &previous);
		table.index(id, &relation);
		table.rows.insert(id, relation.clone());
		Ok(relation)
	}

	async fn delete(&self, id: i64) -> GroupResult<bool> {
		let mut table = self.table.write();
		let Some(previous) = table.rows.remove(&id) else {
			return Ok(false);
		};
		table.unindex(id, &previous);
		Ok(true)
	}

	async fn load(&self, id: i64) -> GroupResult<Option<GroupContent>> {
		Ok(self.table.read().rows.get(&id).cloned())
	}

	async fn query(&self, query: &RelationQuery) -> GroupResult<Vec<GroupContent>> {
		let table = self.table.read();
		let relations = match table.candidates(query) {
			Some(ids) => ids
				.iter()
				.filter_map(|id| table.rows.get(id))
				.filter(|relation| query.matches(relation))
				.cloned()
				.collect(),
			None => table
				.rows
				.values()
				.filter(|relation| query.matches(relation))
				.cloned()
				.collect(),
		};
		Ok(relations)
	}
}
