//! Entity storage collaborator
//!
//! The grouping system does not own entities; it reads and writes them through
//! [`EntityStorage`]. [`InMemoryEntityStorage`] is a complete implementation
//! suitable for tests and embedded use.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use reinhardt_group_core::{
	Entity, EntityId, EntityKey, EntityTypeRepository, GroupError, GroupResult, IdKeyType,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Equality-only property filter, AND-combined
///
/// Keys name top-level properties of the serialized entity (`bundle`, `label`,
/// `owner_id`, ...).
pub type PropertyFilter = IndexMap<String, serde_json::Value>;

/// CRUD access to entities of any type
#[async_trait]
pub trait EntityStorage: Send + Sync {
	/// Loads one entity
	async fn load(&self, entity_type: &str, id: &EntityId) -> GroupResult<Option<Entity>>;

	/// Loads several entities of one type, skipping missing ids
	async fn load_multiple(&self, entity_type: &str, ids: &[EntityId]) -> GroupResult<Vec<Entity>> {
		let mut entities = Vec::with_capacity(ids.len());
		for id in ids {
			if let Some(entity) = self.load(entity_type, id).await? {
				entities.push(entity);
			}
		}
		Ok(entities)
	}

	/// Loads an entity by its uuid
	async fn load_by_uuid(&self, entity_type: &str, uuid: &Uuid) -> GroupResult<Option<Entity>>;

	/// Loads entities of one type matching every property
	async fn load_by_properties(
		&self,
		entity_type: &str,
		properties: &PropertyFilter,
	) -> GroupResult<Vec<Entity>>;

	/// Persists an entity, assigning an id when needed
	async fn save(&self, entity: Entity) -> GroupResult<Entity>;

	/// Deletes an entity; returns whether it existed
	async fn delete(&self, key: &EntityKey) -> GroupResult<bool>;

	/// Loads the entity behind `key`
	async fn load_key(&self, key: &EntityKey) -> GroupResult<Option<Entity>> {
		self.load(&key.entity_type, &key.id).await
	}
}

#[derive(Default)]
struct EntityTables {
	rows: HashMap<String, IndexMap<EntityId, Entity>>,
	next_ids: HashMap<String, i64>,
}

/// In-memory [`EntityStorage`]
///
/// Integer-keyed types get serial ids on first save; string-keyed types must
/// carry their id before saving.
pub struct InMemoryEntityStorage {
	entity_types: Arc<EntityTypeRepository>,
	tables: RwLock<EntityTables>,
}

impl InMemoryEntityStorage {
	/// Creates an empty storage
	pub fn new(entity_types: Arc<EntityTypeRepository>) -> Self {
		Self {
			entity_types,
			tables: RwLock::new(EntityTables::default()),
		}
	}

	/// Number of stored entities of `entity_type`
	pub fn count(&self, entity_type: &str) -> usize {
		self.tables
			.read()
			.rows
			.get(entity_type)
			.map_or(0, IndexMap::len)
	}

	fn matches(entity: &Entity, properties: &PropertyFilter) -> bool {
		let Ok(serde_json::Value::Object(serialized)) = serde_json::to_value(entity) else {
			return false;
		};
		properties
			.iter()
			.all(|(name, expected)| serialized.get(name) == Some(expected))
	}
}

#[async_trait]
impl EntityStorage for InMemoryEntityStorage {
	async fn load(&self, entity_type: &str, id: &EntityId) -> GroupResult<Option<Entity>> {
		Ok(self
			.tables
			.read()
			.rows
			.get(entity_type)
			.and_then(|rows| rows.get(id))
			.cloned())
	}

	async fn load_by_uuid(&self, entity_type: &str, uuid: &Uuid) -> GroupResult<Option<Entity>> {
		Ok(self
			.tables
			.read()
			.rows
			.get(entity_type)
			.and_then(|rows| rows.values().find(|entity| &entity.uuid == uuid))
			.cloned())
	}

	async fn load_by_properties(
		&self,
		entity_type: &str,
		properties: &PropertyFilter,
	) -> GroupResult<Vec<Entity>> {
		Ok(self
			.tables
			.read()
			.rows
			.get(entity_type)
			.map(|rows| {
				rows.values()
					.filter(|entity| Self::matches(entity, properties))
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}

	async fn save(&self, mut entity: Entity) -> GroupResult<Entity> {
		let definition = self.entity_types.require(&entity.entity_type)?;
		let mut tables = self.tables.write();

		let id = match (&entity.id, definition.id_key_type) {
			(Some(EntityId::Int(id)), _) => {
				let next = tables.next_ids.entry(entity.entity_type.clone()).or_insert(1);
				*next = (*next).max(id + 1);
				EntityId::Int(*id)
			}
			(Some(id), _) => id.clone(),
			(None, IdKeyType::Integer) => {
				let next = tables.next_ids.entry(entity.entity_type.clone()).or_insert(1);
				let id = *next;
				*next += 1;
				EntityId::Int(id)
			}
			(None, IdKeyType::String) => {
				return Err(GroupError::MissingStringId(entity.entity_type.clone()));
			}
		};

		entity.id = Some(id.clone());
		entity.persisted = true;
		tables
			.rows
			.entry(entity.entity_type.clone())
			.or_default()
			.insert(id, entity.clone());
		Ok(entity)
	}

	async fn delete(&self, key: &EntityKey) -> GroupResult<bool> {
		Ok(self
			.tables
			.write()
			.rows
			.get_mut(&key.entity_type)
			.is_some_and(|rows| rows.shift_remove(&key.id).is_some()))
	}
}
