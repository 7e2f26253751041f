//! Group membership enabler

use super::{ContentEnabler, EnablerDefinition};
use crate::configuration::EnablerConfiguration;
use reinhardt_group_core::USER_ENTITY_TYPE;

/// Plugin id of the membership enabler
pub const GROUP_MEMBERSHIP_PLUGIN_ID: &str = "group_membership";

/// Adds users to groups as members
///
/// Installed on every group type. A user can be a member of a group only once,
/// so the entity cardinality is pinned to 1.
#[derive(Debug, Clone)]
pub struct GroupMembershipEnabler {
	definition: EnablerDefinition,
}

impl GroupMembershipEnabler {
	/// Creates the enabler
	pub fn new() -> Self {
		Self {
			definition: EnablerDefinition::new(
				GROUP_MEMBERSHIP_PLUGIN_ID,
				"Group membership",
				USER_ENTITY_TYPE,
			)
			.with_description("Adds users to groups as members.")
			.with_reference("Username", "The user you want to make a member of the group.")
			.enforced(),
		}
	}
}

impl Default for GroupMembershipEnabler {
	fn default() -> Self {
		Self::new()
	}
}

impl ContentEnabler for GroupMembershipEnabler {
	fn definition(&self) -> &EnablerDefinition {
		&self.definition
	}

	fn default_configuration(&self) -> EnablerConfiguration {
		EnablerConfiguration::default().with_entity_cardinality(1)
	}

	fn lock_configuration(&self, configuration: &mut EnablerConfiguration) {
		configuration.entity_cardinality = 1;
	}
}
