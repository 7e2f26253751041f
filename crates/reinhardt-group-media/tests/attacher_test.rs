//! Integration tests for automatic media attachment

#[path = "fixtures/mod.rs"]
mod fixtures;

use async_trait::async_trait;
use fixtures::{MediaEnv, env, tracked};
use reinhardt_group_core::{Entity, FieldDefinition, FieldItem, FieldType, GroupResult};
use reinhardt_group_media::{FinderContext, GroupMediaSettings, MediaFinder};
use rstest::rstest;
use std::sync::Arc;

/// Finder yielding a media item that was never saved
struct UnsavedMediaFinder;

#[async_trait]
impl MediaFinder for UnsavedMediaFinder {
	fn id(&self) -> &str {
		"unsaved_media"
	}

	fn label(&self) -> &str {
		"Unsaved media"
	}

	fn field_types(&self) -> &[FieldType] {
		&[]
	}

	async fn process(&self, _entity: &Entity, _context: &FinderContext) -> GroupResult<Vec<Entity>> {
		Ok(vec![Entity::new("media", "image").with_label("Draft")])
	}
}

/// Test that media referenced by grouped content joins the group once
#[rstest]
#[tokio::test]
async fn test_attach_adds_media_to_group(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&group, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(created[0].plugin_id, "group_media:image");
	assert_eq!(created[0].group_id(), group.int_id().unwrap());
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that re-running attachment on unchanged content adds nothing
#[rstest]
#[tokio::test]
async fn test_reattach_is_idempotent(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&group, &node).await;
	let attacher = env.tracking_attacher();
	attacher.attach(&node).await.unwrap();

	// Act
	let created = attacher.attach(&node).await.unwrap();

	// Assert
	assert!(created.is_empty());
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that media referenced twice by one entity is added once
#[rstest]
#[tokio::test]
async fn test_duplicate_discoveries_added_once(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let mut node = env.node_with_media("Article", &[&media, &media]).await;
	node.set_field(
		FieldDefinition::new("body", FieldType::TextLong),
		vec![FieldItem::text(format!(
			r#"<drupal-media data-entity-type="media" data-entity-uuid="{}"></drupal-media>"#,
			media.uuid
		))],
	);
	env.add_to_group(&group, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that content in two groups spreads its media to both
#[rstest]
#[tokio::test]
async fn test_attach_to_every_group(env: MediaEnv) {
	// Arrange
	let first = env.group("default", "First").await;
	let second = env.group("other", "Second").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&first, &node).await;
	env.add_to_group(&second, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 2);
	assert_eq!(env.media_count(&first, &media).await, 1);
	assert_eq!(env.media_count(&second, &media).await, 1);
}

/// Test the skip conditions that leave the group untouched
#[rstest]
#[case::tracking_disabled(GroupMediaSettings::new(), "image")]
#[case::excluded_bundle(
	GroupMediaSettings::new().with_tracking(true).with_excluded_bundles(["image"]),
	"image"
)]
#[case::plugin_not_tracking(GroupMediaSettings::new().with_tracking(true), "document")]
#[case::bundle_not_installed(GroupMediaSettings::new().with_tracking(true), "audio")]
#[tokio::test]
async fn test_attach_skips(env: MediaEnv, #[case] settings: GroupMediaSettings, #[case] bundle: &str) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media(bundle, "File").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&group, &node).await;

	// Act
	let created = env.attacher(settings).attach(&node).await.unwrap();

	// Assert
	assert!(created.is_empty());
	assert!(env.store.load_by_entity(&media).await.unwrap().is_empty());
}

/// Test that a group type without the media plugin is skipped
#[rstest]
#[tokio::test]
async fn test_group_type_without_plugin(env: MediaEnv) {
	// Arrange
	let plain = env.group("plain", "Plain").await;
	let club = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&plain, &node).await;
	env.add_to_group(&club, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(created[0].group_id(), club.int_id().unwrap());
}

/// Test that an attach hook veto skips only the vetoed group
#[rstest]
#[tokio::test]
async fn test_attach_hook_veto(env: MediaEnv) {
	// Arrange
	let allowed = env.group("default", "Allowed").await;
	let denied = env.group("default", "Denied").await;
	let denied_id = denied.int_id();
	env.hooks.on_should_attach(Some("deny_one"), move |votes, _media, group| {
		votes.push(group.int_id() != denied_id);
	});
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&allowed, &node).await;
	env.add_to_group(&denied, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&allowed, &media).await, 1);
	assert_eq!(env.media_count(&denied, &media).await, 0);
}

/// Test that unchecked assignment bypasses the attach hook
#[rstest]
#[tokio::test]
async fn test_unchecked_assignment_bypasses_hook(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	env.hooks
		.on_should_attach(None, |votes, _media, _group| votes.deny());
	let media = env.media("image", "Logo").await;
	let attacher = env.tracking_attacher();

	// Act
	let checked = attacher
		.assign_media_to_groups(std::slice::from_ref(&media), std::slice::from_ref(&group), true)
		.await
		.unwrap();
	let unchecked = attacher
		.assign_media_to_groups(std::slice::from_ref(&media), std::slice::from_ref(&group), false)
		.await
		.unwrap();

	// Assert
	assert!(checked.is_empty());
	assert_eq!(unchecked.len(), 1);
}

/// Test that a media item at its group limit is not added to another group
#[rstest]
#[tokio::test]
async fn test_group_cardinality_reached(env: MediaEnv) {
	// Arrange
	env.configure("other", "group_media:image", tracked().with_group_cardinality(1));
	let first = env.group("default", "First").await;
	let second = env.group("other", "Second").await;
	let third = env.group("other", "Third").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&first, &node).await;
	env.add_to_group(&second, &node).await;
	env.add_to_group(&third, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 2);
	assert_eq!(env.media_count(&first, &media).await, 1);
	assert_eq!(env.media_count(&second, &media).await, 1);
	assert_eq!(env.media_count(&third, &media).await, 0);
}

/// Test that attaching a relation uses its group and its target's media
#[rstest]
#[tokio::test]
async fn test_attach_relation(env: MediaEnv) {
	// Arrange
	let club = env.group("default", "Club").await;
	let other = env.group("default", "Other").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&other, &node).await;
	let relation = env
		.manager
		.add_content(&club, &node, "group_node:article")
		.await
		.unwrap()
		.relation()
		.cloned()
		.unwrap();

	// Act
	let created = env.tracking_attacher().attach_relation(&relation).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&club, &media).await, 1);
	assert_eq!(env.media_count(&other, &media).await, 0);
}

/// Test that a group referencing media attaches it to itself
#[rstest]
#[tokio::test]
async fn test_group_is_its_own_candidate(env: MediaEnv) {
	// Arrange
	let media = env.media("image", "Banner").await;
	let creator = env.user("creator").await;
	let group = env
		.manager
		.create_group(
			Entity::group("default", "Club")
				.with_field(fixtures::media_field(), fixtures::references(&[&media])),
			Some(&creator),
		)
		.await
		.unwrap();

	// Act
	let created = env.tracking_attacher().attach(&group).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that the content groups hook can add candidate groups
#[rstest]
#[tokio::test]
async fn test_content_groups_hook_adds_group(env: MediaEnv) {
	// Arrange
	let extra = env.group("default", "Extra").await;
	let injected = extra.clone();
	env.hooks.on_content_groups(Some("extra"), move |groups, _entity| {
		groups.push(injected.clone());
	});
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Loose article", &[&media]).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&extra, &media).await, 1);
}

/// Test that ungrouped content without hooks attaches nothing
#[rstest]
#[tokio::test]
async fn test_ungrouped_content(env: MediaEnv) {
	// Arrange
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Loose article", &[&media]).await;

	// Act
	let groups = env.tracking_attacher().get_content_groups(&node).await.unwrap();
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert!(groups.is_empty());
	assert!(created.is_empty());
}

/// Test that embedded media is attached like referenced media
#[rstest]
#[tokio::test]
async fn test_embedded_media_attached(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Inline").await;
	let node = env.node_with_embeds("Article", &[&media]).await;
	env.add_to_group(&group, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that an unsaved media item is skipped without failing the attachment
#[rstest]
#[tokio::test]
async fn test_unsaved_media_is_skipped(env: MediaEnv) {
	// Arrange
	env.finders.register(Arc::new(UnsavedMediaFinder));
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let node = env.node_with_media("Article", &[&media]).await;
	env.add_to_group(&group, &node).await;

	// Act
	let created = env.tracking_attacher().attach(&node).await.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(created[0].target_key(), media.key().unwrap());
	assert_eq!(env.media_count(&group, &media).await, 1);
}

/// Test that an item failing relation preconditions is skipped for that group only
#[rstest]
#[tokio::test]
async fn test_unassignable_item_is_skipped(env: MediaEnv) {
	// Arrange
	let group = env.group("default", "Club").await;
	let media = env.media("image", "Logo").await;
	let mut stale = media.clone();
	stale.entity_type = "node".into();

	// Act
	let created = env
		.tracking_attacher()
		.assign_media_to_groups(&[stale, media.clone()], std::slice::from_ref(&group), true)
		.await
		.unwrap();

	// Assert
	assert_eq!(created.len(), 1);
	assert_eq!(env.media_count(&group, &media).await, 1);
}
