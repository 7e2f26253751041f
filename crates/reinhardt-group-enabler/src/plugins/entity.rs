//! Generic entity-as-content enabler
//!
//! Serves any entity type, including string-keyed content and config entities.
//! Subgroups are the built-in use: `subgroup:{group_type}` adds groups of one
//! group type as content of another group.

use super::{ContentEnabler, EnablerDefinition, EnablerDeriver};
use crate::bundles::BundleInfo;
use reinhardt_group_core::GROUP_ENTITY_TYPE;
use std::sync::Arc;

/// Base plugin id of the subgroup enablers
pub const SUBGROUP_BASE_ID: &str = "subgroup";

/// Adds arbitrary entities to groups
#[derive(Debug, Clone)]
pub struct EntityAsContentEnabler {
	definition: EnablerDefinition,
}

impl EntityAsContentEnabler {
	/// Creates an enabler from a definition
	pub fn new(definition: EnablerDefinition) -> Self {
		Self { definition }
	}

	/// Enabler adding groups of `group_type` as subgroups
	pub fn subgroup(group_type: &str, group_type_label: &str) -> Self {
		Self::new(
			EnablerDefinition::new(
				EnablerDefinition::derivative_id(SUBGROUP_BASE_ID, group_type),
				format!("Subgroup ({})", group_type_label),
				GROUP_ENTITY_TYPE,
			)
			.with_bundle(group_type)
			.with_reference("Group name", "The name of the group to add as a subgroup"),
		)
	}
}

impl ContentEnabler for EntityAsContentEnabler {
	fn definition(&self) -> &EnablerDefinition {
		&self.definition
	}
}

/// Derives one subgroup enabler per group type
#[derive(Debug, Clone, Copy, Default)]
pub struct SubgroupDeriver;

impl EnablerDeriver for SubgroupDeriver {
	fn base_id(&self) -> &str {
		SUBGROUP_BASE_ID
	}

	fn derivatives(&self, bundles: &BundleInfo) -> Vec<Arc<dyn ContentEnabler>> {
		bundles
			.bundles(GROUP_ENTITY_TYPE)
			.map(|(group_type, label)| {
				Arc::new(EntityAsContentEnabler::subgroup(group_type, label)) as Arc<dyn ContentEnabler>
			})
			.collect()
	}
}
