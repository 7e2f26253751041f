//! Media referenced directly through entity reference fields

use super::{FinderContext, MediaFinder};
use async_trait::async_trait;
use reinhardt_group_core::{Entity, FieldType, GroupResult, MEDIA_ENTITY_TYPE};

/// Collects media targeted by the entity reference fields of an entity
pub struct MediaReferenceFinder {
	field_types: Vec<FieldType>,
}

impl MediaReferenceFinder {
	pub fn new() -> Self {
		Self {
			field_types: vec![FieldType::EntityReference],
		}
	}
}

impl Default for MediaReferenceFinder {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl MediaFinder for MediaReferenceFinder {
	fn id(&self) -> &str {
		"media_reference"
	}

	fn label(&self) -> &str {
		"Media in entity reference field"
	}

	fn field_types(&self) -> &[FieldType] {
		&self.field_types
	}

	async fn process(&self, entity: &Entity, context: &FinderContext) -> GroupResult<Vec<Entity>> {
		referenced_media(entity, &self.field_types, context).await
	}
}

/// Media loaded from every non-empty field of `entity` whose type is in
/// `field_types` and whose target type is media; dangling references are
/// skipped
pub(crate) async fn referenced_media(
	entity: &Entity,
	field_types: &[FieldType],
	context: &FinderContext,
) -> GroupResult<Vec<Entity>> {
	let mut items = Vec::new();
	for field in entity.fields() {
		if field.is_empty()
			|| !field_types.contains(&field.definition.field_type)
			|| !field.definition.targets(MEDIA_ENTITY_TYPE)
		{
			continue;
		}
		for item in field.iter() {
			let Some(key) = item.target_key() else {
				continue;
			};
			if let Some(media) = context.entities.load_key(&key).await? {
				items.push(media);
			}
		}
	}
	Ok(items)
}
