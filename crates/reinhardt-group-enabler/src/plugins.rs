//! Content enabler plugins
//!
//! A content enabler describes which entity type (and optionally which bundle)
//! can be added to groups, how the reference field is labelled, and which
//! configuration an installation starts from. Variants live in submodules.

pub mod entity;
pub mod media;
pub mod membership;
pub mod node;

pub use entity::{EntityAsContentEnabler, SubgroupDeriver};
pub use media::{GroupMediaDeriver, GroupMediaEnabler};
pub use membership::GroupMembershipEnabler;
pub use node::{GroupNodeDeriver, GroupNodeEnabler};

use crate::bundles::BundleInfo;
use crate::configuration::EnablerConfiguration;
use indexmap::IndexMap;
use reinhardt_group_core::{
	Entity, EntityReferenceSchema, GroupContent, ReferenceFieldDefinition,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static description of a content enabler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnablerDefinition {
	/// Full plugin id, `{base}` or `{base}:{derivative}`
	pub id: String,
	/// Human readable label
	pub label: String,
	/// Description
	pub description: String,
	/// Entity type the plugin serves
	pub entity_type_id: String,
	/// Bundle restriction
	pub entity_bundle: Option<String>,
	/// Installed on every group type, cannot be uninstalled
	pub enforced: bool,
	/// Reference field label override
	pub reference_label: Option<String>,
	/// Reference field description override
	pub reference_description: Option<String>,
}

impl EnablerDefinition {
	/// Creates a definition serving `entity_type_id`
	pub fn new(
		id: impl Into<String>,
		label: impl Into<String>,
		entity_type_id: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			description: String::new(),
			entity_type_id: entity_type_id.into(),
			entity_bundle: None,
			enforced: false,
			reference_label: None,
			reference_description: None,
		}
	}

	/// Id of a derivative of `base_id`
	pub fn derivative_id(base_id: &str, derivative: &str) -> String {
		format!("{}:{}", base_id, derivative)
	}

	/// Base plugin id (the part before `:`)
	pub fn base_id(&self) -> &str {
		self.id.split_once(':').map_or(self.id.as_str(), |(base, _)| base)
	}

	/// Derivative id (the part after `:`)
	pub fn derivative(&self) -> Option<&str> {
		self.id.split_once(':').map(|(_, derivative)| derivative)
	}

	/// Sets the description
	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Restricts the plugin to a bundle
	#[must_use]
	pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
		self.entity_bundle = Some(bundle.into());
		self
	}

	/// Marks the plugin as enforced
	#[must_use]
	pub fn enforced(mut self) -> Self {
		self.enforced = true;
		self
	}

	/// Sets the reference field label and description
	#[must_use]
	pub fn with_reference(
		mut self,
		label: impl Into<String>,
		description: impl Into<String>,
	) -> Self {
		self.reference_label = Some(label.into());
		self.reference_description = Some(description.into());
		self
	}
}

/// Capability interface shared by all content enabler variants
pub trait ContentEnabler: Send + Sync {
	/// Static definition
	fn definition(&self) -> &EnablerDefinition;

	/// Configuration a new installation starts from
	fn default_configuration(&self) -> EnablerConfiguration {
		EnablerConfiguration::default()
	}

	/// Forces values the plugin depends on, whatever the installation asked for
	fn lock_configuration(&self, _configuration: &mut EnablerConfiguration) {}

	/// Label of a relation created through this plugin
	fn content_label(&self, _relation: &GroupContent, target: &Entity) -> String {
		target.display_label()
	}

	/// Plugin id
	fn plugin_id(&self) -> &str {
		&self.definition().id
	}

	/// Entity type served
	fn entity_type_id(&self) -> &str {
		&self.definition().entity_type_id
	}

	/// Bundle restriction
	fn entity_bundle(&self) -> Option<&str> {
		self.definition().entity_bundle.as_deref()
	}

	/// Whether the plugin is installed on every group type
	fn is_enforced(&self) -> bool {
		self.definition().enforced
	}

	/// Whether the plugin accepts `entity` as content
	fn accepts(&self, entity: &Entity) -> bool {
		entity.entity_type == self.entity_type_id()
			&& self
				.entity_bundle()
				.is_none_or(|bundle| bundle == entity.bundle)
	}

	/// Settings of the reference field
	fn entity_reference_settings(&self) -> IndexMap<String, serde_json::Value> {
		let mut settings = IndexMap::new();
		settings.insert(
			"target_type".to_string(),
			serde_json::Value::String(self.entity_type_id().to_string()),
		);
		if let Some(bundle) = self.entity_bundle() {
			settings.insert(
				"handler_settings".to_string(),
				serde_json::json!({ "target_bundles": [bundle] }),
			);
		}
		settings
	}

	/// Reference field definition of a relation bundle backed by this plugin
	fn reference_field_definition(&self, schema: &EntityReferenceSchema) -> ReferenceFieldDefinition {
		let definition = self.definition();
		let mut field = schema.bundle_field_definition(self.entity_type_id());
		if let Some(label) = &definition.reference_label {
			field = field.with_label(label.clone());
		}
		if let Some(description) = &definition.reference_description {
			field = field.with_description(description.clone());
		}
		for (name, value) in self.entity_reference_settings() {
			field = field.with_setting(name, value);
		}
		field
	}
}

/// Produces one enabler per bundle of some entity type
pub trait EnablerDeriver: Send + Sync {
	/// Base plugin id of the derivatives
	fn base_id(&self) -> &str;

	/// Derivatives for the currently known bundles
	fn derivatives(&self, bundles: &BundleInfo) -> Vec<Arc<dyn ContentEnabler>>;
}
