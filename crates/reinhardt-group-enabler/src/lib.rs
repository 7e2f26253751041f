//! # Reinhardt Group Enabler
//!
//! Content enabler plugins describe what can be added to a group. This crate
//! holds the [`ContentEnabler`] capability trait and its built-in variants, the
//! [`ContentEnablerManager`] registration table, and the
//! [`ContentEnablerRegistry`] that tracks which enablers each group type
//! installs.
//!
//! ## Quick Start
//!
//! ```rust
//! use reinhardt_group_enabler::{
//!     BundleInfo, ContentEnablerManager, ContentEnablerRegistry, GroupType,
//! };
//! use std::sync::Arc;
//!
//! let manager = ContentEnablerManager::with_defaults(
//!     BundleInfo::new().with_bundle("media", "image", "Image"),
//! );
//! let registry = ContentEnablerRegistry::new(Arc::new(manager));
//! registry.register_group_type(GroupType::new("club", "Club"));
//! registry.install("club", "group_media:image", None).unwrap();
//!
//! assert!(registry.has("club", "group_membership"));
//! assert!(registry.has("club", "group_media:image"));
//! ```

pub mod bundles;
pub mod configuration;
pub mod manager;
pub mod plugins;
pub mod registry;

pub use bundles::{BundleInfo, GroupType};
pub use configuration::EnablerConfiguration;
pub use manager::ContentEnablerManager;
pub use plugins::entity::SUBGROUP_BASE_ID;
pub use plugins::media::{GROUP_MEDIA_BASE_ID, group_media_plugin_id};
pub use plugins::membership::GROUP_MEMBERSHIP_PLUGIN_ID;
pub use plugins::node::GROUP_NODE_BASE_ID;
pub use plugins::{
	ContentEnabler, EnablerDefinition, EnablerDeriver, EntityAsContentEnabler, GroupMediaDeriver,
	GroupMediaEnabler, GroupMembershipEnabler, GroupNodeDeriver, GroupNodeEnabler,
	SubgroupDeriver,
};
pub use registry::{ContentEnablerRegistry, InstalledPlugins, PluginInstance, content_type_id};
