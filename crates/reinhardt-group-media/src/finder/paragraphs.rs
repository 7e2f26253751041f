//! Media referenced from nested paragraphs
//!
//! Paragraphs are composite sub-entities reached through revisioned reference
//! fields. Every paragraph reachable from the host is collected depth-first,
//! including paragraphs that only hold further paragraphs, and the media
//! reference fields of each are scanned. Each traversal keeps its own visited
//! set, so cycles terminate and no paragraph is scanned twice per call.

use super::media_reference::referenced_media;
use super::{FinderContext, MediaFinder};
use async_trait::async_trait;
use reinhardt_group_core::{Entity, EntityKey, FieldType, GroupResult, PARAGRAPH_ENTITY_TYPE};
use std::collections::HashSet;

pub struct ParagraphsMediaReferenceFinder {
	field_types: Vec<FieldType>,
}

impl ParagraphsMediaReferenceFinder {
	pub fn new() -> Self {
		Self {
			field_types: vec![FieldType::EntityReferenceRevisions],
		}
	}

	/// Paragraphs reachable from `entity`, parents before their children
	pub async fn paragraphs(&self, entity: &Entity, context: &FinderContext) -> GroupResult<Vec<Entity>> {
		let mut visited: HashSet<EntityKey> = entity.key().into_iter().collect();
		let mut paragraphs = Vec::new();
		let mut pending = self.child_keys(entity);
		pending.reverse();

		while let Some(key) = pending.pop() {
			if !visited.insert(key.clone()) {
				continue;
			}
			let Some(paragraph) = context.entities.load_key(&key).await? else {
				continue;
			};
			let mut children = self.child_keys(&paragraph);
			children.reverse();
			pending.extend(children);
			paragraphs.push(paragraph);
		}

		Ok(paragraphs)
	}

	fn child_keys(&self, entity: &Entity) -> Vec<EntityKey> {
		entity
			.fields()
			.filter(|field| {
				!field.is_empty()
					&& self.field_types.contains(&field.definition.field_type)
					&& field.definition.targets(PARAGRAPH_ENTITY_TYPE)
			})
			.flat_map(|field| field.iter().filter_map(|item| item.target_key()))
			.collect()
	}
}

impl Default for ParagraphsMediaReferenceFinder {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl MediaFinder for ParagraphsMediaReferenceFinder {
	fn id(&self) -> &str {
		"paragraphs_media_reference"
	}

	fn label(&self) -> &str {
		"Media in paragraphs"
	}

	fn field_types(&self) -> &[FieldType] {
		&self.field_types
	}

	async fn process(&self, entity: &Entity, context: &FinderContext) -> GroupResult<Vec<Entity>> {
		let mut items = Vec::new();
		for paragraph in self.paragraphs(entity, context).await? {
			items.extend(referenced_media(&paragraph, &[FieldType::EntityReference], context).await?);
		}
		Ok(items)
	}
}
