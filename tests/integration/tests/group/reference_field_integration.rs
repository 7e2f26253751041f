//! Reference field selection across integer and string keyed entity types

use proptest::prelude::*;
use reinhardt_group::core::{EntityTypeDefinition, ReferenceField};
use reinhardt_group::prelude::*;
use reinhardt_group_integration_tests::{GroupSite, STRING_CONTENT_PLUGIN, STRING_CONTENT_TYPE};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn site() -> GroupSite {
	GroupSite::new()
}

/// Test that relations to string keyed entities use the string reference field
#[rstest]
#[tokio::test]
async fn test_string_keyed_relation(site: GroupSite) {
	// Arrange
	let creator = site.user("Ada").await;
	let group = site.group("club", "Club", &creator).await;
	let entity = site
		.save(Entity::new(STRING_CONTENT_TYPE, STRING_CONTENT_TYPE).with_id("alpha"))
		.await;

	// Act
	let outcome = site
		.manager
		.add_content(&group, &entity, STRING_CONTENT_PLUGIN)
		.await
		.unwrap();

	// Assert
	let relation = outcome.relation().unwrap();
	assert_eq!(relation.target.field, ReferenceField::String);
	assert_eq!(relation.entity_field_name(), "entity_id_str");
	let found = site
		.store
		.get_content_by_entity_id(&group, STRING_CONTENT_PLUGIN, &EntityId::Str("alpha".into()))
		.await
		.unwrap();
	assert_eq!(found.len(), 1);
}

/// Test that group members use the numeric reference field
#[rstest]
#[tokio::test]
async fn test_integer_keyed_relation(site: GroupSite) {
	// Arrange
	let creator = site.user("Ada").await;

	// Act
	let group = site.group("club", "Club", &creator).await;

	// Assert
	let membership = site.manager.get_member(&group, &creator).await.unwrap().unwrap();
	assert_eq!(membership.target.field, ReferenceField::Numeric);
	assert_eq!(site.schema.field_name_for("user"), "entity_id");
}

proptest! {
	/// Field selection depends only on the id key type of the entity type
	#[test]
	fn prop_field_name_follows_id_key(
		name in "[a-z][a-z_]{0,15}",
		integer in any::<bool>(),
	) {
		let repository = EntityTypeRepository::new();
		repository.register(if integer {
			EntityTypeDefinition::content(name.clone(), "Generated")
		} else {
			EntityTypeDefinition::string_content(name.clone(), "Generated")
		});
		let schema = EntityReferenceSchema::new(Arc::new(repository));

		let expected = if integer { "entity_id" } else { "entity_id_str" };
		prop_assert_eq!(schema.field_name_for(&name), expected);
		prop_assert_eq!(schema.field_name_for(&name), schema.field_name_for(&name));
	}
}
