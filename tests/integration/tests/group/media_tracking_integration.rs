//! End-to-end media tracking scenarios

use reinhardt_group::prelude::*;
use reinhardt_group_integration_tests::GroupSite;
use rstest::{fixture, rstest};

#[fixture]
fn site() -> GroupSite {
	GroupSite::new()
}

/// Test that media follows its article into each group exactly once
#[rstest]
#[tokio::test]
async fn test_media_follows_content_into_groups(site: GroupSite) {
	// Arrange
	let attacher = site.attacher(GroupMediaSettings::new().with_tracking(true));
	let creator = site.user("Ada").await;
	let first = site.group("club", "First", &creator).await;
	let second = site.group("club", "Second", &creator).await;
	let media = site.image("Logo").await;
	let article = site.article("Article", &[&media]).await;

	// Act
	let relation = site
		.manager
		.add_content(&first, &article, "group_node:article")
		.await
		.unwrap();
	attacher
		.attach_relation(relation.relation().unwrap())
		.await
		.unwrap();
	let in_first_only = (
		site.image_count(&first, &media).await,
		site.image_count(&second, &media).await,
	);
	let relation = site
		.manager
		.add_content(&second, &article, "group_node:article")
		.await
		.unwrap();
	attacher
		.attach_relation(relation.relation().unwrap())
		.await
		.unwrap();
	attacher.attach(&article).await.unwrap();

	// Assert
	assert_eq!(in_first_only, (1, 0));
	assert_eq!(site.image_count(&first, &media).await, 1);
	assert_eq!(site.image_count(&second, &media).await, 1);
}

/// Test that saving the host again does not add the media a second time
#[rstest]
#[tokio::test]
async fn test_resave_keeps_single_relation(site: GroupSite) {
	// Arrange
	let attacher = site.attacher(GroupMediaSettings::new().with_tracking(true));
	let creator = site.user("Ada").await;
	let group = site.group("club", "Club", &creator).await;
	let media = site.image("Logo").await;
	let article = site.article("Article", &[&media]).await;
	site.manager
		.add_content(&group, &article, "group_node:article")
		.await
		.unwrap();
	attacher.attach(&article).await.unwrap();
	let resaved = site.save(article.clone().with_label("Article, edited")).await;

	// Act
	let created = attacher.attach(&resaved).await.unwrap();

	// Assert
	assert!(created.is_empty());
	assert_eq!(site.image_count(&group, &media).await, 1);
}

/// Test that disabling tracking stops new media from being attached
#[rstest]
#[tokio::test]
async fn test_tracking_disabled(site: GroupSite) {
	// Arrange
	let attacher = site.attacher(GroupMediaSettings::new().with_tracking(false));
	let creator = site.user("Ada").await;
	let group = site.group("club", "Club", &creator).await;
	let media = site.image("Fresh").await;
	let article = site.article("Article", &[&media]).await;
	site.manager
		.add_content(&group, &article, "group_node:article")
		.await
		.unwrap();

	// Act
	let created = attacher.attach(&article).await.unwrap();

	// Assert
	assert!(created.is_empty());
	assert!(site.store.load_by_entity(&media).await.unwrap().is_empty());
}

/// Test that settings loaded from TOML drive the attacher
#[rstest]
#[tokio::test]
async fn test_settings_from_toml(site: GroupSite) {
	// Arrange
	let settings = GroupMediaSettings::from_toml_str(
		"tracking_enabled = true\nexcluded_bundles = [\"image\"]\n",
	)
	.unwrap();
	let attacher = site.attacher(settings);
	let creator = site.user("Ada").await;
	let group = site.group("club", "Club", &creator).await;
	let media = site.image("Excluded").await;
	let article = site.article("Article", &[&media]).await;
	site.manager
		.add_content(&group, &article, "group_node:article")
		.await
		.unwrap();

	// Act
	let created = attacher.attach(&article).await.unwrap();

	// Assert
	assert!(created.is_empty());
}
