//! Constraint violations
//!
//! Violations are values, not errors: a validator returns them, the caller
//! decides whether to persist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which constraint was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
	/// The entity is in too many groups through this plugin
	GroupCardinality,
	/// The entity is in this group too many times through this plugin
	EntityCardinality,
}

/// A single violation, attached to a property path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
	/// Violated constraint
	pub code: ViolationCode,
	/// Property path, e.g. `entity_id.0`
	pub property_path: String,
	/// User facing message
	pub message: String,
}

impl fmt::Display for ConstraintViolation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.property_path, self.message)
	}
}

/// Ordered collection of violations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolationList {
	violations: Vec<ConstraintViolation>,
}

impl ConstraintViolationList {
	/// Creates an empty list
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a violation
	pub fn add(&mut self, violation: ConstraintViolation) {
		self.violations.push(violation);
	}

	/// Whether no violation was recorded
	pub fn is_empty(&self) -> bool {
		self.violations.is_empty()
	}

	/// Number of violations
	pub fn len(&self) -> usize {
		self.violations.len()
	}

	/// Iterates over violations
	pub fn iter(&self) -> impl Iterator<Item = &ConstraintViolation> {
		self.violations.iter()
	}

	/// Whether a violation with `code` was recorded
	pub fn contains(&self, code: ViolationCode) -> bool {
		self.violations.iter().any(|violation| violation.code == code)
	}
}

impl IntoIterator for ConstraintViolationList {
	type Item = ConstraintViolation;
	type IntoIter = std::vec::IntoIter<ConstraintViolation>;

	fn into_iter(self) -> Self::IntoIter {
		self.violations.into_iter()
	}
}
