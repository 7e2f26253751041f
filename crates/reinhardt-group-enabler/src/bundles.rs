//! Bundle and group type information

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Known bundles, per entity type, with their labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleInfo {
	bundles: IndexMap<String, IndexMap<String, String>>,
}

impl BundleInfo {
	/// Creates an empty bundle table
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or relabels) a bundle
	pub fn add(
		&mut self,
		entity_type: impl Into<String>,
		bundle: impl Into<String>,
		label: impl Into<String>,
	) {
		self.bundles
			.entry(entity_type.into())
			.or_default()
			.insert(bundle.into(), label.into());
	}

	/// Adds a bundle, builder style
	#[must_use]
	pub fn with_bundle(
		mut self,
		entity_type: impl Into<String>,
		bundle: impl Into<String>,
		label: impl Into<String>,
	) -> Self {
		self.add(entity_type, bundle, label);
		self
	}

	/// Removes a bundle
	pub fn remove(&mut self, entity_type: &str, bundle: &str) -> bool {
		self.bundles
			.get_mut(entity_type)
			.is_some_and(|bundles| bundles.shift_remove(bundle).is_some())
	}

	/// Bundles of `entity_type` as `(id, label)` pairs, in insertion order
	pub fn bundles<'a>(&'a self, entity_type: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
		self.bundles
			.get(entity_type)
			.into_iter()
			.flat_map(|bundles| bundles.iter().map(|(id, label)| (id.as_str(), label.as_str())))
	}
}

/// A group type (the bundle of a group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupType {
	/// Machine name
	pub id: String,
	/// Human readable label
	pub label: String,
	/// Whether the creator becomes a member when a group is created
	pub creator_membership: bool,
	/// Roles granted to the creator membership
	pub creator_roles: Vec<String>,
}

impl GroupType {
	/// Creates a group type granting creator membership
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			creator_membership: true,
			creator_roles: Vec::new(),
		}
	}

	/// Disables creator membership
	#[must_use]
	pub fn without_creator_membership(mut self) -> Self {
		self.creator_membership = false;
		self
	}

	/// Sets the creator roles
	#[must_use]
	pub fn with_creator_roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.creator_roles = roles.into_iter().map(Into::into).collect();
		self
	}
}
