//! Group media enabler, derived per media type

use super::{ContentEnabler, EnablerDefinition, EnablerDeriver};
use crate::bundles::BundleInfo;
use crate::configuration::EnablerConfiguration;
use reinhardt_group_core::MEDIA_ENTITY_TYPE;
use std::sync::Arc;

/// Base plugin id of the media enablers
pub const GROUP_MEDIA_BASE_ID: &str = "group_media";

/// Plugin id of the media enabler for `bundle`
pub fn group_media_plugin_id(bundle: &str) -> String {
	EnablerDefinition::derivative_id(GROUP_MEDIA_BASE_ID, bundle)
}

/// Adds media items of one media type to groups
#[derive(Debug, Clone)]
pub struct GroupMediaEnabler {
	definition: EnablerDefinition,
}

impl GroupMediaEnabler {
	/// Creates the enabler for the media type `bundle`
	pub fn new(bundle: &str, bundle_label: &str) -> Self {
		Self {
			definition: EnablerDefinition::new(
				group_media_plugin_id(bundle),
				format!("Group media ({})", bundle_label),
				MEDIA_ENTITY_TYPE,
			)
			.with_description(format!(
				"Adds {} content to groups both publicly and privately.",
				bundle_label
			))
			.with_bundle(bundle)
			.with_reference("Title", "The title of the media to add to the group"),
		}
	}
}

impl ContentEnabler for GroupMediaEnabler {
	fn definition(&self) -> &EnablerDefinition {
		&self.definition
	}

	fn default_configuration(&self) -> EnablerConfiguration {
		EnablerConfiguration::default()
			.with_entity_cardinality(1)
			.with_tracking(false)
	}

	fn lock_configuration(&self, configuration: &mut EnablerConfiguration) {
		configuration.entity_cardinality = 1;
	}
}

/// Derives one [`GroupMediaEnabler`] per media type
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupMediaDeriver;

impl EnablerDeriver for GroupMediaDeriver {
	fn base_id(&self) -> &str {
		GROUP_MEDIA_BASE_ID
	}

	fn derivatives(&self, bundles: &BundleInfo) -> Vec<Arc<dyn ContentEnabler>> {
		bundles
			.bundles(MEDIA_ENTITY_TYPE)
			.map(|(bundle, label)| {
				Arc::new(GroupMediaEnabler::new(bundle, label)) as Arc<dyn ContentEnabler>
			})
			.collect()
	}
}
