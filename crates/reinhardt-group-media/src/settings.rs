//! Media tracking settings
//!
//! [`GroupMediaSettings`] is loaded from TOML and may be overlaid with
//! environment variables:
//!
//! ```toml
//! tracking_enabled = true
//! excluded_bundles = ["document"]
//! ```
//!
//! | Variable                      | Field              |
//! |-------------------------------|--------------------|
//! | `{prefix}TRACKING_ENABLED`    | `tracking_enabled` |
//! | `{prefix}EXCLUDED_BUNDLES`    | `excluded_bundles` (comma separated) |

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "GROUPMEDIA_";

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid setting: {0}")]
	Invalid(String),
}

/// Settings consumed by the media attacher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMediaSettings {
	/// Global switch for automatic media attachment
	pub tracking_enabled: bool,
	/// Media bundles that are never attached automatically
	#[serde(alias = "bundles")]
	pub excluded_bundles: Vec<String>,
}

impl GroupMediaSettings {
	/// Settings with tracking disabled and no exclusions
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_tracking(mut self, enabled: bool) -> Self {
		self.tracking_enabled = enabled;
		self
	}

	#[must_use]
	pub fn with_excluded_bundles<I, S>(mut self, bundles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.excluded_bundles = bundles.into_iter().map(Into::into).collect();
		self
	}

	/// Parses settings from a TOML document
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(content)?)
	}

	/// Reads settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let content = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&content)
	}

	/// Overlays values found in environment variables named `{prefix}KEY`
	pub fn with_env_overrides(mut self, prefix: &str) -> Result<Self, SettingsError> {
		let tracking_key = format!("{}TRACKING_ENABLED", prefix);
		if let Ok(value) = std::env::var(&tracking_key) {
			self.tracking_enabled = parse_bool(&tracking_key, &value)?;
		}

		if let Ok(value) = std::env::var(format!("{}EXCLUDED_BUNDLES", prefix)) {
			self.excluded_bundles = value
				.split(',')
				.map(str::trim)
				.filter(|bundle| !bundle.is_empty())
				.map(String::from)
				.collect();
		}

		Ok(self)
	}

	/// Whether media of `bundle` is excluded from automatic attachment
	pub fn is_bundle_excluded(&self, bundle: &str) -> bool {
		self.excluded_bundles.iter().any(|excluded| excluded == bundle)
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" | "" => Ok(false),
		other => Err(SettingsError::Invalid(format!(
			"{} must be a boolean, got '{}'",
			key, other
		))),
	}
}
