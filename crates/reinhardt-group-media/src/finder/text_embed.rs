//! Media embedded in formatted text
//!
//! Embeds are elements carrying `data-entity-type="media"` and a
//! `data-entity-uuid` attribute, e.g.
//!
//! ```html
//! <drupal-media data-entity-type="media" data-entity-uuid="..."></drupal-media>
//! ```
//!
//! Embeds that no longer resolve to a media entity are ignored, and each
//! resolved media is subject to the inclusion hook.

use super::{FinderContext, MediaFinder};
use async_trait::async_trait;
use reinhardt_group_core::{
	Entity, EntityKey, FieldItem, FieldType, GroupResult, InclusionContext, MEDIA_ENTITY_TYPE,
};
use scraper::{Html, Selector};
use std::collections::HashSet;
use uuid::Uuid;

/// Element used by generic entity embeds
pub const ENTITY_EMBED_ELEMENT: &str = "drupal-entity";
/// Element used by media embeds
pub const MEDIA_EMBED_ELEMENT: &str = "drupal-media";

/// Finds media embedded with a given element in text fields
pub struct TextEmbedFinder {
	id: String,
	label: String,
	element: String,
	selector: Option<Selector>,
	field_types: Vec<FieldType>,
}

impl TextEmbedFinder {
	pub fn new(id: impl Into<String>, label: impl Into<String>, element: impl Into<String>) -> Self {
		let element = element.into();
		let selector =
			Selector::parse(&format!(r#"{}[data-entity-type="media"][data-entity-uuid]"#, element))
				.ok();
		if selector.is_none() {
			tracing::warn!(element = %element, "Invalid embed element; finder will find nothing");
		}
		Self {
			id: id.into(),
			label: label.into(),
			element,
			selector,
			field_types: vec![FieldType::Text, FieldType::TextLong, FieldType::TextWithSummary],
		}
	}

	/// `<drupal-entity>` embeds
	pub fn entity_embed() -> Self {
		Self::new(
			"groupmedia_entity_embed",
			"Groupmedia: Entity Embed",
			ENTITY_EMBED_ELEMENT,
		)
	}

	/// `<drupal-media>` embeds
	pub fn media_embed() -> Self {
		Self::new(
			"groupmedia_media_embed",
			"Groupmedia: Media WYSIWYG Embed (Core)",
			MEDIA_EMBED_ELEMENT,
		)
	}

	pub fn element(&self) -> &str {
		&self.element
	}

	/// Uuids of the media embedded in `text`, in document order
	pub fn parse_uuids(&self, text: &str) -> Vec<String> {
		let Some(selector) = &self.selector else {
			return Vec::new();
		};
		let fragment = Html::parse_fragment(text);
		fragment
			.select(selector)
			.filter_map(|element| element.value().attr("data-entity-uuid"))
			.map(String::from)
			.collect()
	}

	/// Text scanned for one item; summaries count only for text-with-summary fields
	fn item_text(field_type: &FieldType, item: &FieldItem) -> Option<String> {
		let FieldItem::Text { value, summary, .. } = item else {
			return None;
		};
		if value.is_empty() {
			return None;
		}
		let mut text = value.clone();
		if *field_type == FieldType::TextWithSummary
			&& let Some(summary) = summary
		{
			text.push_str(summary);
		}
		Some(text)
	}
}

#[async_trait]
impl MediaFinder for TextEmbedFinder {
	fn id(&self) -> &str {
		&self.id
	}

	fn label(&self) -> &str {
		&self.label
	}

	fn field_types(&self) -> &[FieldType] {
		&self.field_types
	}

	async fn process(&self, entity: &Entity, context: &FinderContext) -> GroupResult<Vec<Entity>> {
		let mut items = Vec::new();
		let mut seen: HashSet<EntityKey> = HashSet::new();

		for field in entity.fields() {
			let field_type = &field.definition.field_type;
			if field.is_empty() || !self.field_types.contains(field_type) {
				continue;
			}
			for item in field.iter() {
				let Some(text) = Self::item_text(field_type, item) else {
					continue;
				};
				for raw_uuid in self.parse_uuids(&text) {
					let Ok(uuid) = Uuid::parse_str(&raw_uuid) else {
						tracing::debug!(uuid = %raw_uuid, field = %field.definition.name, "Ignoring malformed embed uuid");
						continue;
					};
					let Some(media) = context.entities.load_by_uuid(MEDIA_ENTITY_TYPE, &uuid).await?
					else {
						continue;
					};
					let inclusion = InclusionContext {
						entity,
						field_name: &field.definition.name,
					};
					if !context.hooks.should_include(&media, &inclusion) {
						continue;
					}
					if let Some(key) = media.key()
						&& seen.insert(key)
					{
						items.push(media);
					}
				}
			}
		}

		Ok(items)
	}
}
