//! Per installation plugin configuration

use serde::{Deserialize, Serialize};

/// Configuration stored with each plugin installation
///
/// Cardinalities use `0` for "unlimited".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnablerConfiguration {
	/// Maximum number of distinct groups an entity may join through the plugin
	pub group_cardinality: u32,
	/// Maximum number of times an entity may appear in one group through the plugin
	pub entity_cardinality: u32,
	/// Whether discovered media is attached automatically (media plugins only)
	pub tracking_enabled: bool,
	/// Whether the entity is created before the relation in a two step wizard
	pub use_creation_wizard: bool,
	/// Help text shown when adding content
	pub info_text: String,
}

impl EnablerConfiguration {
	/// Sets the group cardinality
	#[must_use]
	pub fn with_group_cardinality(mut self, limit: u32) -> Self {
		self.group_cardinality = limit;
		self
	}

	/// Sets the entity cardinality
	#[must_use]
	pub fn with_entity_cardinality(mut self, limit: u32) -> Self {
		self.entity_cardinality = limit;
		self
	}

	/// Sets the tracking flag
	#[must_use]
	pub fn with_tracking(mut self, enabled: bool) -> Self {
		self.tracking_enabled = enabled;
		self
	}

	/// Whether both limits are unlimited
	pub fn is_unlimited(&self) -> bool {
		self.group_cardinality == 0 && self.entity_cardinality == 0
	}
}
