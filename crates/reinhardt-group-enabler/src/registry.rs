//! Per group type plugin installation
//!
//! Each group type installs a subset of the known content enablers, each with
//! its own [`EnablerConfiguration`]. An installation is exposed as a
//! [`PluginInstance`], and each installation backs exactly one relation bundle
//! (content type).
//!
//! Computing the installed plugin map walks every group type, so the result is
//! cached process wide. Every mutation through this registry invalidates the
//! cache; collaborators changing configuration elsewhere call
//! [`ContentEnablerRegistry::clear_cache`].

use crate::bundles::GroupType;
use crate::configuration::EnablerConfiguration;
use crate::manager::ContentEnablerManager;
use crate::plugins::ContentEnabler;
use indexmap::IndexMap;
use parking_lot::RwLock;
use reinhardt_group_core::{
	Entity, EntityReferenceSchema, GROUP_ENTITY_TYPE, GroupContent, GroupError, GroupResult,
	ReferenceFieldDefinition,
};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Relation bundle id of `plugin_id` installed on `group_type`
///
/// # Examples
///
/// ```
/// use reinhardt_group_enabler::content_type_id;
///
/// assert_eq!(content_type_id("club", "group_media:image"), "club-group_media-image");
/// ```
pub fn content_type_id(group_type: &str, plugin_id: &str) -> String {
	format!("{}-{}", group_type, plugin_id.replace(':', "-"))
}

/// A content enabler installed on a group type
#[derive(Clone)]
pub struct PluginInstance {
	group_type: String,
	content_type_id: String,
	enabler: Arc<dyn ContentEnabler>,
	configuration: EnablerConfiguration,
}

impl PluginInstance {
	fn new(
		group_type: &str,
		enabler: Arc<dyn ContentEnabler>,
		configuration: EnablerConfiguration,
	) -> Self {
		Self {
			group_type: group_type.to_string(),
			content_type_id: content_type_id(group_type, enabler.plugin_id()),
			enabler,
			configuration,
		}
	}

	/// Plugin id
	pub fn plugin_id(&self) -> &str {
		self.enabler.plugin_id()
	}

	/// Group type the plugin is installed on
	pub fn group_type(&self) -> &str {
		&self.group_type
	}

	/// Relation bundle backed by this installation
	pub fn content_type_id(&self) -> &str {
		&self.content_type_id
	}

	/// Underlying enabler
	pub fn enabler(&self) -> &Arc<dyn ContentEnabler> {
		&self.enabler
	}

	/// Installation configuration
	pub fn configuration(&self) -> &EnablerConfiguration {
		&self.configuration
	}

	/// Group cardinality limit, `0` for unlimited
	pub fn group_cardinality(&self) -> u32 {
		self.configuration.group_cardinality
	}

	/// Entity cardinality limit, `0` for unlimited
	pub fn entity_cardinality(&self) -> u32 {
		self.configuration.entity_cardinality
	}

	/// Whether discovered media is attached automatically
	pub fn is_tracking_enabled(&self) -> bool {
		self.configuration.tracking_enabled
	}

	/// Entity type served
	pub fn entity_type_id(&self) -> &str {
		self.enabler.entity_type_id()
	}

	/// Bundle restriction
	pub fn entity_bundle(&self) -> Option<&str> {
		self.enabler.entity_bundle()
	}

	/// Label of a relation created through this installation
	pub fn content_label(&self, relation: &GroupContent, target: &Entity) -> String {
		self.enabler.content_label(relation, target)
	}

	/// Reference field of the relation bundle
	pub fn reference_field_definition(&self, schema: &EntityReferenceSchema) -> ReferenceFieldDefinition {
		self.enabler.reference_field_definition(schema)
	}
}

impl fmt::Debug for PluginInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PluginInstance")
			.field("plugin_id", &self.plugin_id())
			.field("group_type", &self.group_type)
			.field("content_type_id", &self.content_type_id)
			.field("configuration", &self.configuration)
			.finish()
	}
}

/// Installed plugins of one group type, in installation order
#[derive(Debug, Clone, Default)]
pub struct InstalledPlugins {
	instances: IndexMap<String, Arc<PluginInstance>>,
}

impl InstalledPlugins {
	/// Instance of `plugin_id`
	pub fn get(&self, plugin_id: &str) -> Option<&Arc<PluginInstance>> {
		self.instances.get(plugin_id)
	}

	/// Whether `plugin_id` is installed
	pub fn has(&self, plugin_id: &str) -> bool {
		self.instances.contains_key(plugin_id)
	}

	/// Iterates over the instances
	pub fn iter(&self) -> impl Iterator<Item = &Arc<PluginInstance>> {
		self.instances.values()
	}

	/// Installed plugin ids
	pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
		self.instances.keys().map(String::as_str)
	}

	/// Number of installed plugins
	pub fn len(&self) -> usize {
		self.instances.len()
	}

	/// Whether nothing is installed
	pub fn is_empty(&self) -> bool {
		self.instances.is_empty()
	}
}

#[derive(Default)]
struct RegistryCache {
	by_group_type: HashMap<String, Arc<InstalledPlugins>>,
	by_content_type: HashMap<String, Arc<PluginInstance>>,
	content_type_ids: HashMap<String, BTreeSet<String>>,
}

/// Installation registry of content enablers per group type
pub struct ContentEnablerRegistry {
	manager: Arc<ContentEnablerManager>,
	group_types: RwLock<IndexMap<String, GroupType>>,
	installations: RwLock<IndexMap<String, IndexMap<String, EnablerConfiguration>>>,
	cache: RwLock<Option<Arc<RegistryCache>>>,
}

impl ContentEnablerRegistry {
	/// Creates a registry over `manager`
	pub fn new(manager: Arc<ContentEnablerManager>) -> Self {
		Self {
			manager,
			group_types: RwLock::new(IndexMap::new()),
			installations: RwLock::new(IndexMap::new()),
			cache: RwLock::new(None),
		}
	}

	/// The enabler manager
	pub fn manager(&self) -> &Arc<ContentEnablerManager> {
		&self.manager
	}

	/// Registers (or replaces) a group type
	///
	/// Enforced enablers become installed on it right away.
	pub fn register_group_type(&self, group_type: GroupType) {
		self.manager
			.add_bundle(GROUP_ENTITY_TYPE, &group_type.id, &group_type.label);
		self.installations
			.write()
			.entry(group_type.id.clone())
			.or_default();
		tracing::debug!(group_type = %group_type.id, "Registered group type");
		self.group_types
			.write()
			.insert(group_type.id.clone(), group_type);
		self.clear_cache();
	}

	/// Looks up a group type
	pub fn group_type(&self, group_type_id: &str) -> GroupResult<GroupType> {
		self.group_types
			.read()
			.get(group_type_id)
			.cloned()
			.ok_or_else(|| GroupError::GroupTypeNotFound(group_type_id.to_string()))
	}

	/// Registered group types
	pub fn group_types(&self) -> Vec<GroupType> {
		self.group_types.read().values().cloned().collect()
	}

	/// Installs `plugin_id` on `group_type_id`
	///
	/// `configuration` defaults to the enabler's default configuration. Values
	/// the enabler locks are forced either way.
	pub fn install(
		&self,
		group_type_id: &str,
		plugin_id: &str,
		configuration: Option<EnablerConfiguration>,
	) -> GroupResult<Arc<PluginInstance>> {
		self.group_type(group_type_id)?;
		let enabler = self.manager.get(plugin_id)?;
		if self.has(group_type_id, plugin_id) {
			return Err(GroupError::PluginAlreadyInstalled {
				group_type: group_type_id.to_string(),
				plugin_id: plugin_id.to_string(),
			});
		}

		let mut configuration = configuration.unwrap_or_else(|| enabler.default_configuration());
		enabler.lock_configuration(&mut configuration);
		self.installations
			.write()
			.entry(group_type_id.to_string())
			.or_default()
			.insert(plugin_id.to_string(), configuration);
		self.clear_cache();

		tracing::debug!(
			group_type = group_type_id,
			plugin_id,
			"Installed content enabler"
		);
		self.get(group_type_id, plugin_id)
	}

	/// Uninstalls `plugin_id` from `group_type_id`
	///
	/// Enforced enablers cannot be uninstalled. Relations of the content type
	/// are left alone; see the storage layer for a cascading variant.
	pub fn uninstall(&self, group_type_id: &str, plugin_id: &str) -> GroupResult<()> {
		let instance = self.get(group_type_id, plugin_id)?;
		if instance.enabler().is_enforced() {
			return Err(GroupError::InvalidPlugin(format!(
				"{} is enforced and cannot be uninstalled",
				plugin_id
			)));
		}

		if let Some(installed) = self.installations.write().get_mut(group_type_id) {
			installed.shift_remove(plugin_id);
		}
		self.clear_cache();
		tracing::debug!(
			group_type = group_type_id,
			plugin_id,
			"Uninstalled content enabler"
		);
		Ok(())
	}

	/// Replaces the configuration of an installed plugin
	pub fn update_configuration(
		&self,
		group_type_id: &str,
		plugin_id: &str,
		mut configuration: EnablerConfiguration,
	) -> GroupResult<Arc<PluginInstance>> {
		let instance = self.get(group_type_id, plugin_id)?;
		instance.enabler().lock_configuration(&mut configuration);
		self.installations
			.write()
			.entry(group_type_id.to_string())
			.or_default()
			.insert(plugin_id.to_string(), configuration);
		self.clear_cache();
		self.get(group_type_id, plugin_id)
	}

	/// Installed plugins of `group_type_id`; empty for unknown group types
	pub fn installed_plugins(&self, group_type_id: &str) -> Arc<InstalledPlugins> {
		self.cache()
			.by_group_type
			.get(group_type_id)
			.cloned()
			.unwrap_or_default()
	}

	/// Plugin ids installed on any group type
	pub fn installed_instance_ids(&self) -> BTreeSet<String> {
		self.cache()
			.by_group_type
			.values()
			.flat_map(|installed| installed.plugin_ids().map(str::to_string))
			.collect()
	}

	/// Whether `plugin_id` is installed on `group_type_id`
	pub fn has(&self, group_type_id: &str, plugin_id: &str) -> bool {
		self.installed_plugins(group_type_id).has(plugin_id)
	}

	/// Instance of `plugin_id` on `group_type_id`
	pub fn get(&self, group_type_id: &str, plugin_id: &str) -> GroupResult<Arc<PluginInstance>> {
		self.installed_plugins(group_type_id)
			.get(plugin_id)
			.cloned()
			.ok_or_else(|| GroupError::PluginNotFound(plugin_id.to_string()))
	}

	/// Relation bundles backed by `plugin_id`, one per group type it is installed on
	pub fn content_type_ids_for(&self, plugin_id: &str) -> BTreeSet<String> {
		self.cache()
			.content_type_ids
			.get(plugin_id)
			.cloned()
			.unwrap_or_default()
	}

	/// Installation backing the relation bundle `content_type_id`
	pub fn content_type(&self, content_type_id: &str) -> Option<Arc<PluginInstance>> {
		self.cache().by_content_type.get(content_type_id).cloned()
	}

	/// Forgets the installed plugin map
	pub fn clear_cache(&self) {
		*self.cache.write() = None;
	}

	fn cache(&self) -> Arc<RegistryCache> {
		if let Some(cache) = self.cache.read().as_ref() {
			return Arc::clone(cache);
		}

		let cache = Arc::new(self.build_cache());
		*self.cache.write() = Some(Arc::clone(&cache));
		cache
	}

	fn build_cache(&self) -> RegistryCache {
		let enforced = self.manager.enforced();
		let installations = self.installations.read();
		let mut cache = RegistryCache::default();

		for group_type_id in self.group_types.read().keys() {
			let configured = installations.get(group_type_id);
			let mut installed = InstalledPlugins::default();

			for enabler in &enforced {
				let configuration = configured
					.and_then(|c| c.get(enabler.plugin_id()))
					.cloned()
					.unwrap_or_else(|| enabler.default_configuration());
				installed.instances.insert(
					enabler.plugin_id().to_string(),
					Arc::new(PluginInstance::new(group_type_id, Arc::clone(enabler), configuration)),
				);
			}

			for (plugin_id, configuration) in configured.into_iter().flatten() {
				if installed.has(plugin_id) {
					continue;
				}
				// Enablers whose bundle disappeared stay configured but inactive.
				let Ok(enabler) = self.manager.get(plugin_id) else {
					tracing::warn!(
						group_type = %group_type_id,
						plugin_id = %plugin_id,
						"Installed content enabler has no definition"
					);
					continue;
				};
				installed.instances.insert(
					plugin_id.clone(),
					Arc::new(PluginInstance::new(group_type_id, enabler, configuration.clone())),
				);
			}

			for instance in installed.iter() {
				cache
					.by_content_type
					.insert(instance.content_type_id().to_string(), Arc::clone(instance));
				cache
					.content_type_ids
					.entry(instance.plugin_id().to_string())
					.or_default()
					.insert(instance.content_type_id().to_string());
			}
			cache
				.by_group_type
				.insert(group_type_id.clone(), Arc::new(installed));
		}

		cache
	}
}
