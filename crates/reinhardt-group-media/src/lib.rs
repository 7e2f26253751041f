//! # Reinhardt Group Media
//!
//! Keeps media in the groups of the content that uses it.
//!
//! ## Features
//!
//! - **Discovery**: [`MediaFinder`] strategies for direct references, nested
//!   paragraphs and embeds in formatted text, run by [`MediaFinderRegistry`]
//! - **Attachment**: [`GroupMediaAttacher`] adds discovered media to the host
//!   content's groups within plugin cardinality limits
//! - **Actions**: [`GroupMediaActions`] to add or remove media explicitly
//! - **Settings**: [`GroupMediaSettings`] loaded from TOML and the environment

pub mod actions;
pub mod attacher;
pub mod finder;
pub mod settings;

pub use actions::GroupMediaActions;
pub use attacher::GroupMediaAttacher;
pub use finder::{
	FinderContext, MediaFinder, MediaFinderRegistry, MediaReferenceFinder,
	ParagraphsMediaReferenceFinder, TextEmbedFinder,
};
pub use settings::{DEFAULT_ENV_PREFIX, GroupMediaSettings, SettingsError};
