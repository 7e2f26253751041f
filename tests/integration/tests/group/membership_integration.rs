//! Group creation, membership and unsaved input handling across crates

use reinhardt_group::prelude::*;
use reinhardt_group_integration_tests::GroupSite;
use rstest::{fixture, rstest};

#[fixture]
fn site() -> GroupSite {
	GroupSite::new()
}

/// Test that a new group holds exactly the creator's membership
#[rstest]
#[case("club", vec!["club-admin".to_string()])]
#[case("team", Vec::new())]
#[tokio::test]
async fn test_creator_membership(site: GroupSite, #[case] group_type: &str, #[case] roles: Vec<String>) {
	// Arrange
	let creator = site.user("Ada").await;

	// Act
	let group = site.group(group_type, "Rustaceans", &creator).await;

	// Assert
	let relations = site.store.load_by_group(&group, None).await.unwrap();
	assert_eq!(relations.len(), 1);
	assert_eq!(relations[0].plugin_id, "group_membership");
	assert_eq!(relations[0].target_key(), creator.key().unwrap());
	assert_eq!(relations[0].group_roles, roles);
	let member = site.manager.get_member(&group, &creator).await.unwrap();
	assert!(member.is_some());
}

/// Test that unsaved groups and entities are rejected without side effects
#[rstest]
#[tokio::test]
async fn test_unsaved_inputs_rejected(site: GroupSite) {
	// Arrange
	let creator = site.user("Ada").await;
	let group = site.group("club", "Saved", &creator).await;
	let article = site.article("Saved article", &[]).await;
	let unsaved_group = Entity::group("club", "Draft");
	let unsaved_article = Entity::new("node", "article").with_label("Draft article");

	// Act
	let no_group =
		site.store
			.create_for_entity_in_group(&article, &unsaved_group, "group_node:article");
	let no_entity =
		site.store
			.create_for_entity_in_group(&unsaved_article, &group, "group_node:article");
	let load_group = site.store.load_by_group(&unsaved_group, None).await;
	let load_entity = site.store.load_by_entity(&unsaved_article).await;

	// Assert
	assert!(matches!(no_group, Err(GroupError::UnsavedGroup(_))));
	assert!(matches!(no_entity, Err(GroupError::UnsavedEntity(_))));
	assert!(matches!(load_group, Err(GroupError::UnsavedGroup(_))));
	assert!(matches!(load_entity, Err(GroupError::UnsavedEntity(_))));
	assert_eq!(site.store.load_by_group(&group, None).await.unwrap().len(), 1);
}

/// Test that deleting a group removes its relations and keeps its content
#[rstest]
#[tokio::test]
async fn test_delete_group_cascades(site: GroupSite) {
	// Arrange
	let creator = site.user("Ada").await;
	let group = site.group("club", "Doomed", &creator).await;
	let article = site.article("Survivor", &[]).await;
	site.manager
		.add_content(&group, &article, "group_node:article")
		.await
		.unwrap();

	// Act
	let removed = site.manager.delete_group(&group).await.unwrap();

	// Assert
	assert_eq!(removed, 2);
	assert!(site.store.load_by_entity(&article).await.unwrap().is_empty());
	assert!(site.store.load_by_entity(&creator).await.unwrap().is_empty());
	let key = article.key().unwrap();
	assert!(site.entities.load_key(&key).await.unwrap().is_some());
}
