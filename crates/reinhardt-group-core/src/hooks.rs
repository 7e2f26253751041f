//! Alter hooks
//!
//! Three extension points let other code influence media tracking:
//!
//! - `content_groups`: edit the candidate groups of an entity
//! - `should_attach`: vote on attaching a media item to a group
//! - `should_include`: vote on keeping a media item found in a host entity field
//!
//! Receivers run in registration order. Voting hooks fold their ballots with a
//! veto rule: no votes means yes, any `false` means no, and a ballot a receiver
//! marked as malformed means no.

use crate::entity::Entity;
use parking_lot::RwLock;
use std::sync::Arc;

/// Receiver altering the candidate groups of an entity
pub type ContentGroupsReceiver = dyn Fn(&mut Vec<Entity>, &Entity) + Send + Sync;

/// Receiver voting on attaching `media` to `group`
pub type ShouldAttachReceiver = dyn Fn(&mut HookVotes, &Entity, &Entity) + Send + Sync;

/// Receiver voting on keeping `media` found in a host entity
pub type ShouldIncludeReceiver =
	dyn for<'a> Fn(&mut HookVotes, &Entity, &InclusionContext<'a>) + Send + Sync;

/// Where a media item was found
#[derive(Debug, Clone, Copy)]
pub struct InclusionContext<'a> {
	/// Entity hosting the field
	pub entity: &'a Entity,
	/// Field the media was found in
	pub field_name: &'a str,
}

/// Ballot box shared by the receivers of a voting hook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookVotes {
	votes: Vec<bool>,
	malformed: bool,
}

impl HookVotes {
	/// Creates an empty ballot box
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a vote
	pub fn push(&mut self, vote: bool) {
		self.votes.push(vote);
	}

	/// Records a veto
	pub fn deny(&mut self) {
		self.push(false);
	}

	/// Flags the ballot as unusable; the fold then denies
	pub fn mark_malformed(&mut self) {
		self.malformed = true;
	}

	/// Number of votes cast
	pub fn len(&self) -> usize {
		self.votes.len()
	}

	/// Whether no vote was cast
	pub fn is_empty(&self) -> bool {
		self.votes.is_empty()
	}

	/// Folds the ballot
	pub fn allows(&self) -> bool {
		!self.malformed && self.votes.iter().all(|vote| *vote)
	}
}

struct HookReceiver<F: ?Sized> {
	receiver: Arc<F>,
	dispatch_uid: Option<String>,
}

/// Ordered list of receivers for one hook
pub struct AlterHook<F: ?Sized> {
	receivers: RwLock<Vec<HookReceiver<F>>>,
}

impl<F: ?Sized> AlterHook<F> {
	/// Creates a hook without receivers
	pub fn new() -> Self {
		Self {
			receivers: RwLock::new(Vec::new()),
		}
	}

	/// Connects a receiver
	///
	/// A receiver connected with a `dispatch_uid` replaces any earlier receiver
	/// that used the same uid, keeping its original position.
	pub fn connect_arc(&self, receiver: Arc<F>, dispatch_uid: Option<&str>) {
		let mut receivers = self.receivers.write();
		if let Some(uid) = dispatch_uid
			&& let Some(existing) = receivers
				.iter_mut()
				.find(|r| r.dispatch_uid.as_deref() == Some(uid))
		{
			existing.receiver = receiver;
			return;
		}
		receivers.push(HookReceiver {
			receiver,
			dispatch_uid: dispatch_uid.map(str::to_string),
		});
	}

	/// Disconnects the receiver with `dispatch_uid`, or every receiver when `None`
	pub fn disconnect(&self, dispatch_uid: Option<&str>) -> bool {
		let mut receivers = self.receivers.write();
		let original_len = receivers.len();
		match dispatch_uid {
			Some(uid) => receivers.retain(|r| r.dispatch_uid.as_deref() != Some(uid)),
			None => receivers.clear(),
		}
		receivers.len() < original_len
	}

	/// Number of connected receivers
	pub fn receivers_count(&self) -> usize {
		self.receivers.read().len()
	}

	/// Snapshot of the receivers in registration order
	///
	/// Receivers are invoked on the snapshot so they may connect or disconnect
	/// other receivers without deadlocking.
	pub fn receivers(&self) -> Vec<Arc<F>> {
		self.receivers
			.read()
			.iter()
			.map(|r| Arc::clone(&r.receiver))
			.collect()
	}
}

impl<F: ?Sized> Default for AlterHook<F> {
	fn default() -> Self {
		Self::new()
	}
}

/// The hook table of the grouping system
#[derive(Default)]
pub struct GroupHooks {
	/// Candidate group alteration
	pub content_groups: AlterHook<ContentGroupsReceiver>,
	/// Attach votes
	pub should_attach: AlterHook<ShouldAttachReceiver>,
	/// Inclusion votes
	pub should_include: AlterHook<ShouldIncludeReceiver>,
}

impl GroupHooks {
	/// Creates an empty hook table
	pub fn new() -> Self {
		Self::default()
	}

	/// Connects a candidate group receiver
	pub fn on_content_groups<H>(&self, dispatch_uid: Option<&str>, receiver: H)
	where
		H: Fn(&mut Vec<Entity>, &Entity) + Send + Sync + 'static,
	{
		self.content_groups
			.connect_arc(Arc::new(receiver), dispatch_uid);
	}

	/// Connects an attach vote receiver
	pub fn on_should_attach<H>(&self, dispatch_uid: Option<&str>, receiver: H)
	where
		H: Fn(&mut HookVotes, &Entity, &Entity) + Send + Sync + 'static,
	{
		self.should_attach
			.connect_arc(Arc::new(receiver), dispatch_uid);
	}

	/// Connects an inclusion vote receiver
	pub fn on_should_include<H>(&self, dispatch_uid: Option<&str>, receiver: H)
	where
		H: for<'a> Fn(&mut HookVotes, &Entity, &InclusionContext<'a>) + Send + Sync + 'static,
	{
		self.should_include
			.connect_arc(Arc::new(receiver), dispatch_uid);
	}

	/// Lets receivers edit the candidate groups of `entity`
	pub fn alter_content_groups(&self, groups: &mut Vec<Entity>, entity: &Entity) {
		for receiver in self.content_groups.receivers() {
			receiver(groups, entity);
		}
	}

	/// Whether `media` may be attached to `group`
	pub fn should_attach(&self, media: &Entity, group: &Entity) -> bool {
		let mut votes = HookVotes::new();
		for receiver in self.should_attach.receivers() {
			receiver(&mut votes, media, group);
		}
		votes.allows()
	}

	/// Whether `media`, found in `context`, should be kept
	pub fn should_include(&self, media: &Entity, context: &InclusionContext<'_>) -> bool {
		let mut votes = HookVotes::new();
		for receiver in self.should_include.receivers() {
			receiver(&mut votes, media, context);
		}
		votes.allows()
	}
}
