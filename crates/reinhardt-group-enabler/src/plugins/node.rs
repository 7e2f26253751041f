//! Group node enabler, derived per node type

use super::{ContentEnabler, EnablerDefinition, EnablerDeriver};
use crate::bundles::BundleInfo;
use reinhardt_group_core::NODE_ENTITY_TYPE;
use std::sync::Arc;

/// Base plugin id of the node enablers
pub const GROUP_NODE_BASE_ID: &str = "group_node";

/// Adds nodes of one node type to groups
#[derive(Debug, Clone)]
pub struct GroupNodeEnabler {
	definition: EnablerDefinition,
}

impl GroupNodeEnabler {
	/// Creates the enabler for the node type `bundle`
	pub fn new(bundle: &str, bundle_label: &str) -> Self {
		Self {
			definition: EnablerDefinition::new(
				EnablerDefinition::derivative_id(GROUP_NODE_BASE_ID, bundle),
				format!("Group node ({})", bundle_label),
				NODE_ENTITY_TYPE,
			)
			.with_description(format!(
				"Adds {} content to groups both publicly and privately.",
				bundle_label
			))
			.with_bundle(bundle)
			.with_reference("Title", "The title of the node to add to the group"),
		}
	}
}

impl ContentEnabler for GroupNodeEnabler {
	fn definition(&self) -> &EnablerDefinition {
		&self.definition
	}
}

/// Derives one [`GroupNodeEnabler`] per node type
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupNodeDeriver;

impl EnablerDeriver for GroupNodeDeriver {
	fn base_id(&self) -> &str {
		GROUP_NODE_BASE_ID
	}

	fn derivatives(&self, bundles: &BundleInfo) -> Vec<Arc<dyn ContentEnabler>> {
		bundles
			.bundles(NODE_ENTITY_TYPE)
			.map(|(bundle, label)| {
				Arc::new(GroupNodeEnabler::new(bundle, label)) as Arc<dyn ContentEnabler>
			})
			.collect()
	}
}
