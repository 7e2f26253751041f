//! Content enabler registration table
//!
//! Enablers are registered explicitly at startup, either directly or through a
//! deriver that produces one enabler per bundle. The resolved definition table
//! is cached and rebuilt after any registration or bundle change.

use crate::bundles::BundleInfo;
use crate::plugins::{
	ContentEnabler, EnablerDeriver, GroupMediaDeriver, GroupMembershipEnabler, GroupNodeDeriver,
	SubgroupDeriver,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use reinhardt_group_core::{GroupError, GroupResult};
use std::sync::Arc;

type DefinitionTable = IndexMap<String, Arc<dyn ContentEnabler>>;

/// Registration table of content enablers
pub struct ContentEnablerManager {
	bundles: RwLock<BundleInfo>,
	enablers: RwLock<Vec<Arc<dyn ContentEnabler>>>,
	derivers: RwLock<Vec<Arc<dyn EnablerDeriver>>>,
	definitions: RwLock<Option<Arc<DefinitionTable>>>,
}

impl ContentEnablerManager {
	/// Creates an empty manager over `bundles`
	pub fn new(bundles: BundleInfo) -> Self {
		Self {
			bundles: RwLock::new(bundles),
			enablers: RwLock::new(Vec::new()),
			derivers: RwLock::new(Vec::new()),
			definitions: RwLock::new(None),
		}
	}

	/// Manager with the built-in enablers
	///
	/// Registers `group_membership` plus the `group_media`, `group_node` and
	/// `subgroup` derivers.
	pub fn with_defaults(bundles: BundleInfo) -> Self {
		let manager = Self::new(bundles);
		manager.register(Arc::new(GroupMembershipEnabler::new()));
		manager.register_deriver(Arc::new(GroupMediaDeriver));
		manager.register_deriver(Arc::new(GroupNodeDeriver));
		manager.register_deriver(Arc::new(SubgroupDeriver));
		manager
	}

	/// Registers a single enabler
	pub fn register(&self, enabler: Arc<dyn ContentEnabler>) {
		tracing::debug!(plugin_id = enabler.plugin_id(), "Registered content enabler");
		self.enablers.write().push(enabler);
		self.clear_cached_definitions();
	}

	/// Registers a deriver
	pub fn register_deriver(&self, deriver: Arc<dyn EnablerDeriver>) {
		tracing::debug!(base_id = deriver.base_id(), "Registered content enabler deriver");
		self.derivers.write().push(deriver);
		self.clear_cached_definitions();
	}

	/// Adds a bundle, producing new derivatives
	pub fn add_bundle(&self, entity_type: &str, bundle: &str, label: &str) {
		self.bundles.write().add(entity_type, bundle, label);
		self.clear_cached_definitions();
	}

	/// Removes a bundle and its derivatives
	pub fn remove_bundle(&self, entity_type: &str, bundle: &str) -> bool {
		let removed = self.bundles.write().remove(entity_type, bundle);
		if removed {
			self.clear_cached_definitions();
		}
		removed
	}

	/// Snapshot of the known bundles
	pub fn bundles(&self) -> BundleInfo {
		self.bundles.read().clone()
	}

	/// Resolved definition table, keyed by plugin id
	///
	/// Directly registered enablers come first, then derivatives in deriver
	/// registration order. A later registration with an existing id replaces
	/// the earlier one in place.
	pub fn definitions(&self) -> Arc<DefinitionTable> {
		if let Some(definitions) = self.definitions.read().as_ref() {
			return Arc::clone(definitions);
		}

		let bundles = self.bundles.read().clone();
		let mut table = DefinitionTable::new();
		for enabler in self.enablers.read().iter() {
			table.insert(enabler.plugin_id().to_string(), Arc::clone(enabler));
		}
		for deriver in self.derivers.read().iter() {
			for enabler in deriver.derivatives(&bundles) {
				table.insert(enabler.plugin_id().to_string(), enabler);
			}
		}

		let table = Arc::new(table);
		*self.definitions.write() = Some(Arc::clone(&table));
		table
	}

	/// Looks up an enabler by plugin id
	pub fn get(&self, plugin_id: &str) -> GroupResult<Arc<dyn ContentEnabler>> {
		self.definitions()
			.get(plugin_id)
			.cloned()
			.ok_or_else(|| GroupError::PluginNotFound(plugin_id.to_string()))
	}

	/// Whether an enabler with `plugin_id` exists
	pub fn has_definition(&self, plugin_id: &str) -> bool {
		self.definitions().contains_key(plugin_id)
	}

	/// Enablers installed on every group type
	pub fn enforced(&self) -> Vec<Arc<dyn ContentEnabler>> {
		self.definitions()
			.values()
			.filter(|enabler| enabler.is_enforced())
			.cloned()
			.collect()
	}

	/// Forgets the resolved definition table
	pub fn clear_cached_definitions(&self) {
		*self.definitions.write() = None;
	}
}

impl Default for ContentEnablerManager {
	fn default() -> Self {
		Self::with_defaults(BundleInfo::new())
	}
}
