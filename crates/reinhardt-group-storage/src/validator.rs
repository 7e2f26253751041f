//! Cardinality validation
//!
//! Two independent limits apply to every relation, both configured per plugin
//! installation (`0` means unlimited):
//!
//! - group cardinality: the number of distinct groups the target entity may
//!   join through the relation bundle
//! - entity cardinality: the number of times the target entity may appear in
//!   one group through the plugin
//!
//! Violations are reported on the reference field (`entity_id.0` or
//! `entity_id_str.0`).

use crate::backend::RelationQuery;
use crate::store::GroupContentStore;
use reinhardt_group_core::{
	ConstraintViolation, ConstraintViolationList, Entity, GroupContent, GroupResult,
	ViolationCode,
};
use std::collections::BTreeSet;

/// Validates relation candidates against the live store
pub struct CardinalityValidator<'a> {
	store: &'a GroupContentStore,
}

impl<'a> CardinalityValidator<'a> {
	/// Creates a validator reading from `store`
	pub fn new(store: &'a GroupContentStore) -> Self {
		Self { store }
	}

	/// Violations of `relation`; empty when it may be persisted
	///
	/// Candidates whose plugin, group or target cannot be resolved are not
	/// validated.
	pub async fn validate(&self, relation: &GroupContent) -> GroupResult<ConstraintViolationList> {
		let mut violations = ConstraintViolationList::new();

		let Some(instance) = self.store.registry().content_type(&relation.content_type_id) else {
			return Ok(violations);
		};
		let Some(group) = self.store.load_group(relation).await? else {
			return Ok(violations);
		};
		let Some(target) = self.store.load_target(relation).await? else {
			return Ok(violations);
		};

		let group_cardinality = instance.group_cardinality();
		let entity_cardinality = instance.entity_cardinality();
		if group_cardinality == 0 && entity_cardinality == 0 {
			return Ok(violations);
		}

		let field_label = instance
			.reference_field_definition(self.store.schema())
			.label;
		let property_path = relation.target.field.violation_path();

		if group_cardinality > 0 {
			let group_count = self.other_group_count(relation).await?;
			if group_count >= group_cardinality as usize {
				violations.add(ConstraintViolation {
					code: ViolationCode::GroupCardinality,
					property_path: property_path.clone(),
					message: format!(
						"{}: {} has reached the maximum amount of groups it can be added to",
						field_label,
						target.display_label()
					),
				});
			}
		}

		if entity_cardinality > 0 {
			let entity_count = self.same_group_count(relation, &group).await?;
			if entity_count >= entity_cardinality as usize {
				violations.add(ConstraintViolation {
					code: ViolationCode::EntityCardinality,
					property_path,
					message: format!(
						"{}: {} has reached the maximum amount of times it can be added to {}",
						field_label,
						target.display_label(),
						group.display_label()
					),
				});
			}
		}

		Ok(violations)
	}

	/// Distinct groups, other than the relation's own, holding the same
	/// (relation bundle, target) pair
	async fn other_group_count(&self, relation: &GroupContent) -> GroupResult<usize> {
		let existing = self
			.store
			.load_by_properties(
				&RelationQuery::new()
					.content_type(relation.content_type_id.clone())
					.target_type(relation.target.entity_type.clone())
					.target_id(relation.target.target_id.clone()),
			)
			.await?;
		let groups: BTreeSet<i64> = existing
			.iter()
			.map(GroupContent::group_id)
			.filter(|group_id| *group_id != relation.group_id())
			.collect();
		Ok(groups.len())
	}

	/// Relations in the relation's group for the same plugin and target,
	/// excluding the relation's own persisted instance
	async fn same_group_count(&self, relation: &GroupContent, group: &Entity) -> GroupResult<usize> {
		let existing = self
			.store
			.get_content_by_entity_id(group, &relation.plugin_id, &relation.target.target_id)
			.await?;
		Ok(existing
			.iter()
			.filter(|other| other.target.entity_type == relation.target.entity_type)
			.filter(|other| relation.id.is_none() || other.id != relation.id)
			.count())
	}
}
