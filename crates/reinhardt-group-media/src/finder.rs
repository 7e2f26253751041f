//! Media discovery
//!
//! A [`MediaFinder`] extracts the media entities an entity refers to. The
//! [`MediaFinderRegistry`] runs every applicable finder in registration order
//! and concatenates their results. Results are not deduplicated across finders.

pub mod media_reference;
pub mod paragraphs;
pub mod text_embed;

pub use media_reference::MediaReferenceFinder;
pub use paragraphs::ParagraphsMediaReferenceFinder;
pub use text_embed::TextEmbedFinder;

use async_trait::async_trait;
use parking_lot::RwLock;
use reinhardt_group_core::{Entity, FieldType, GroupHooks, GroupResult};
use reinhardt_group_storage::EntityStorage;
use std::sync::Arc;

/// Collaborators available to finders
#[derive(Clone)]
pub struct FinderContext {
	/// Storage used to resolve references
	pub entities: Arc<dyn EntityStorage>,
	/// Hooks consulted for inclusion votes
	pub hooks: Arc<GroupHooks>,
}

impl FinderContext {
	pub fn new(entities: Arc<dyn EntityStorage>, hooks: Arc<GroupHooks>) -> Self {
		Self { entities, hooks }
	}
}

/// A media discovery strategy
#[async_trait]
pub trait MediaFinder: Send + Sync {
	/// Unique finder id
	fn id(&self) -> &str;

	/// Human readable label
	fn label(&self) -> &str;

	/// Field types the finder scans
	fn field_types(&self) -> &[FieldType];

	/// Whether the finder can inspect `entity`
	fn applies(&self, entity: &Entity) -> bool {
		entity.fieldable
	}

	/// Media referenced by `entity`
	async fn process(&self, entity: &Entity, context: &FinderContext) -> GroupResult<Vec<Entity>>;
}

/// Ordered set of finders
pub struct MediaFinderRegistry {
	finders: RwLock<Vec<Arc<dyn MediaFinder>>>,
	context: FinderContext,
}

impl MediaFinderRegistry {
	/// Creates an empty registry
	pub fn new(context: FinderContext) -> Self {
		Self {
			finders: RwLock::new(Vec::new()),
			context,
		}
	}

	/// Registry with the built-in finders: direct references, paragraph
	/// references, entity embeds and media embeds
	pub fn with_defaults(context: FinderContext) -> Self {
		let registry = Self::new(context);
		registry.register(Arc::new(MediaReferenceFinder::new()));
		registry.register(Arc::new(ParagraphsMediaReferenceFinder::new()));
		registry.register(Arc::new(TextEmbedFinder::entity_embed()));
		registry.register(Arc::new(TextEmbedFinder::media_embed()));
		registry
	}

	/// Adds a finder; a finder with the same id is replaced in place
	pub fn register(&self, finder: Arc<dyn MediaFinder>) {
		let mut finders = self.finders.write();
		match finders.iter().position(|existing| existing.id() == finder.id()) {
			Some(index) => finders[index] = finder,
			None => finders.push(finder),
		}
	}

	/// Removes a finder; returns whether it was registered
	pub fn unregister(&self, id: &str) -> bool {
		let mut finders = self.finders.write();
		let before = finders.len();
		finders.retain(|finder| finder.id() != id);
		finders.len() != before
	}

	/// Finder ids in execution order
	pub fn ids(&self) -> Vec<String> {
		self.finders
			.read()
			.iter()
			.map(|finder| finder.id().to_string())
			.collect()
	}

	pub fn get(&self, id: &str) -> Option<Arc<dyn MediaFinder>> {
		self.finders
			.read()
			.iter()
			.find(|finder| finder.id() == id)
			.cloned()
	}

	pub fn len(&self) -> usize {
		self.finders.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.finders.read().is_empty()
	}

	pub fn context(&self) -> &FinderContext {
		&self.context
	}

	/// Runs every applicable finder against `entity`
	pub async fn process(&self, entity: &Entity) -> GroupResult<Vec<Entity>> {
		let finders: Vec<_> = self.finders.read().clone();
		let mut items = Vec::new();
		for finder in finders {
			if !finder.applies(entity) {
				continue;
			}
			let found = finder.process(entity, &self.context).await?;
			tracing::trace!(
				finder = finder.id(),
				entity = %entity.display_label(),
				found = found.len(),
				"Media finder processed entity"
			);
			items.extend(found);
		}
		Ok(items)
	}
}
