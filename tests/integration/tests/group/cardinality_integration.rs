//! Cardinality limits enforced through the group manager

use reinhardt_group::prelude::*;
use reinhardt_group_integration_tests::GroupSite;
use rstest::{fixture, rstest};

#[fixture]
fn site() -> GroupSite {
	GroupSite::new()
}

/// Test that the (L+1)-th group is refused with one violation on the reference field
#[rstest]
#[case(1)]
#[case(3)]
#[tokio::test]
async fn test_group_limit(site: GroupSite, #[case] limit: u32) {
	// Arrange
	site.configure(
		"club",
		"group_node:article",
		EnablerConfiguration::default().with_group_cardinality(limit),
	);
	let creator = site.user("Ada").await;
	let article = site.article("Popular", &[]).await;
	for index in 0..limit {
		let group = site.group("club", &format!("Club {}", index), &creator).await;
		let outcome = site
			.manager
			.add_content(&group, &article, "group_node:article")
			.await
			.unwrap();
		assert!(outcome.is_saved());
	}
	let extra = site.group("club", "One too many", &creator).await;

	// Act
	let outcome = site
		.manager
		.add_content(&extra, &article, "group_node:article")
		.await
		.unwrap();

	// Assert
	let violations = outcome.violations().unwrap();
	assert_eq!(violations.len(), 1);
	let violation = violations.iter().next().unwrap();
	assert_eq!(violation.code, ViolationCode::GroupCardinality);
	assert_eq!(violation.property_path, "entity_id.0");
	assert!(site.store.load_by_group(&extra, Some("group_node:article")).await.unwrap().is_empty());
}

/// Test that only attempt L+1 in one group is refused
#[rstest]
#[case(1)]
#[case(2)]
#[tokio::test]
async fn test_entity_limit(site: GroupSite, #[case] limit: u32) {
	// Arrange
	site.configure(
		"club",
		"group_node:article",
		EnablerConfiguration::default().with_entity_cardinality(limit),
	);
	let creator = site.user("Ada").await;
	let group = site.group("club", "Club", &creator).await;
	let article = site.article("Repeated", &[]).await;

	// Act
	let mut saved = Vec::new();
	for _ in 0..=limit {
		saved.push(
			site.manager
				.add_content(&group, &article, "group_node:article")
				.await
				.unwrap()
				.is_saved(),
		);
	}

	// Assert
	let mut expected = vec![true; limit as usize];
	expected.push(false);
	assert_eq!(saved, expected);
}

/// Test that limits on one group type do not affect another
#[rstest]
#[tokio::test]
async fn test_limits_are_per_group_type(site: GroupSite) {
	// Arrange
	site.configure(
		"club",
		"group_node:article",
		EnablerConfiguration::default().with_entity_cardinality(1),
	);
	let creator = site.user("Ada").await;
	let team = site.group("team", "Team", &creator).await;
	let article = site.article("Shared", &[]).await;

	// Act
	let first = site
		.manager
		.add_content(&team, &article, "group_node:article")
		.await
		.unwrap();
	let second = site
		.manager
		.add_content(&team, &article, "group_node:article")
		.await
		.unwrap();

	// Assert
	assert!(first.is_saved());
	assert!(second.is_saved());
}
