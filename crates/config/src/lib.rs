//! Configuration system for nsload.
//!
//! This crate loads the settings the autoloader consumes at startup: the
//! root for unregistered vendors, the unit file extension, prefix
//! registrations and an optional table of explicitly mapped units.
//! Configuration is written in TOML.
//!
//! # Configuration Files
//!
//! The first of these locations that applies is used:
//!
//! 1. A path passed explicitly by the host (e.g. `nsload --config`)
//! 2. `$NSLOAD_CONFIG`
//! 3. `$XDG_CONFIG_HOME/nsload/config.toml` (or the platform config dir), if it exists
//! 4. Built-in defaults
//!
//! `$NSLOAD_EXTERNAL_ROOT` and `$NSLOAD_EXTENSION` override the file afterwards.
//!
//! # Schema
//!
//! ```toml
//! external_root = "externals/vendor"
//! extension = "mod"
//!
//! [[prefix]]
//! name = "App"
//! dir = "src"
//!
//! [[prefix]]
//! name = "App.Extensions"
//! dir = "../extensions"
//!
//! [[prefix]]
//! name = "App.Plugins"
//! dir = "/opt/app/plugins"
//! ignore = true
//!
//! [units]
//! "Legacy.Helpers" = "legacy/helpers.mod"
//! ```
//!
//! # Relative Paths
//!
//! `external_root`, unit paths and prefix directories are anchored at the
//! directory containing the config file. The exception is a nested prefix
//! whose ancestors register a directory and which does not set `ignore`: its
//! directory stays relative and extends the nearest registered ancestor's
//! directory when names are resolved.
//!
//! Hosts can ship built-in registrations with
//! [`LoaderConfig::with_default_prefixes`]; entries from the file override them.

pub mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nsload_autoload::{
	DEFAULT_EXTENSION, DEFAULT_EXTERNAL_ROOT, PrefixRegistryBuilder, ResolverSettings, SymbolName,
};
use serde::Deserialize;
use tracing::debug;

pub use error::{ConfigError, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "NSLOAD_CONFIG";
/// Environment variable overriding `external_root`.
pub const EXTERNAL_ROOT_ENV: &str = "NSLOAD_EXTERNAL_ROOT";
/// Environment variable overriding `extension`.
pub const EXTENSION_ENV: &str = "NSLOAD_EXTENSION";

/// One `[[prefix]]` registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixEntry {
	/// Symbol prefix, e.g. `App.Plugins`.
	pub name: String,
	/// Directory bound to the prefix.
	pub dir: String,
	/// Replace the nearest ancestor directory instead of extending it.
	#[serde(default)]
	pub ignore: Option<bool>,
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
	external_root: Option<PathBuf>,
	extension: Option<String>,
	#[serde(default, rename = "prefix")]
	prefixes: Vec<PrefixEntry>,
	#[serde(default)]
	units: BTreeMap<String, PathBuf>,
}

/// Resolved loader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
	/// Root for names whose first segment has no registration.
	pub external_root: PathBuf,
	/// Unit file extension, without the dot.
	pub extension: String,
	/// Prefix registrations, applied in order.
	pub prefixes: Vec<PrefixEntry>,
	/// Explicit symbol-to-file table.
	pub units: BTreeMap<String, PathBuf>,
	/// File the configuration was read from, if any.
	pub source: Option<PathBuf>,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			external_root: PathBuf::from(DEFAULT_EXTERNAL_ROOT),
			extension: DEFAULT_EXTENSION.to_owned(),
			prefixes: Vec::new(),
			units: BTreeMap::new(),
			source: None,
		}
	}
}

impl LoaderConfig {
	/// Parse a TOML string. Relative paths are left as written.
	pub fn parse(input: &str) -> Result<Self> {
		let file: ConfigFile = toml::from_str(input)?;
		let defaults = Self::default();
		Ok(Self {
			external_root: file.external_root.unwrap_or(defaults.external_root),
			extension: file.extension.unwrap_or(defaults.extension),
			prefixes: file.prefixes,
			units: file.units,
			source: None,
		})
	}

	/// Load configuration from a file, anchoring relative paths at its directory.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let mut config = Self::parse(&content)?;
		if let Some(dir) = path.parent() {
			config.anchor(dir);
		}
		config.source = Some(path.to_path_buf());
		Ok(config)
	}

	/// Load configuration from the process environment.
	///
	/// See the [crate docs](crate) for the lookup order.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		Self::load_with(explicit, |key| std::env::var(key).ok())
	}

	/// Like [`load`](Self::load), reading environment variables through `env`.
	pub fn load_with(explicit: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut config = match discover(explicit, &env) {
			Some(path) => {
				debug!(path = %path.display(), "Loading config");
				Self::from_file(path)?
			}
			None => Self::default(),
		};
		config.apply_env(&env);
		Ok(config)
	}

	/// Applies `$NSLOAD_EXTERNAL_ROOT` and `$NSLOAD_EXTENSION`.
	pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
		if let Some(root) = env(EXTERNAL_ROOT_ENV).filter(|v| !v.is_empty()) {
			debug!(external_root = %root, "External root overridden by environment");
			self.external_root = PathBuf::from(root);
		}
		if let Some(extension) = env(EXTENSION_ENV) {
			debug!(%extension, "Extension overridden by environment");
			self.extension = extension.trim_start_matches('.').to_owned();
		}
	}

	/// Anchors relative paths at `base`.
	///
	/// A prefix directory stays relative only when it will extend an
	/// ancestor's directory: the entry has a registered ancestor with a
	/// directory and does not replace it with `ignore = true`.
	pub fn anchor(&mut self, base: &Path) {
		if self.external_root.is_relative() {
			self.external_root = base.join(&self.external_root);
		}

		let names: Vec<Option<SymbolName>> = self
			.prefixes
			.iter()
			.map(|entry| SymbolName::parse(&entry.name).ok())
			.collect();
		let extends_ancestor: Vec<bool> = names
			.iter()
			.zip(&self.prefixes)
			.map(|(name, entry)| {
				let Some(name) = name else { return false };
				entry.ignore != Some(true)
					&& self.prefixes.iter().zip(&names).any(|(other, other_name)| {
						!other.dir.trim().is_empty()
							&& other_name.as_ref().is_some_and(|o| {
								o.len() < name.len() && name.segments().starts_with(o.segments())
							})
					})
			})
			.collect();

		for (entry, extends) in self.prefixes.iter_mut().zip(extends_ancestor) {
			let dir = entry.dir.trim();
			if !extends && !dir.is_empty() && Path::new(dir).is_relative() {
				entry.dir = base.join(dir).to_string_lossy().into_owned();
			}
		}

		for path in self.units.values_mut() {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}

	/// Places host-supplied registrations before those already loaded.
	///
	/// Later entries win when both bind the same prefix, so file and
	/// command-line entries override the defaults.
	pub fn with_default_prefixes(mut self, defaults: impl IntoIterator<Item = PrefixEntry>) -> Self {
		let mut prefixes: Vec<PrefixEntry> = defaults.into_iter().collect();
		prefixes.append(&mut self.prefixes);
		self.prefixes = prefixes;
		self
	}

	/// Appends a registration after those read from the file.
	pub fn push_prefix(&mut self, entry: PrefixEntry) {
		self.prefixes.push(entry);
	}

	/// Registry builder seeded with every prefix entry, in order.
	pub fn registry_builder(&self) -> Result<PrefixRegistryBuilder> {
		let mut builder = PrefixRegistryBuilder::new();
		for entry in &self.prefixes {
			builder.register(&entry.name, &entry.dir, entry.ignore)?;
		}
		Ok(builder)
	}

	/// Settings for [`nsload_autoload::Resolver`].
	pub fn resolver_settings(&self) -> ResolverSettings {
		ResolverSettings {
			external_root: self.external_root.clone(),
			extension: self.extension.clone(),
		}
	}

	/// Parsed `[units]` table.
	pub fn explicit_units(&self) -> Result<Vec<(SymbolName, PathBuf)>> {
		self.units
			.iter()
			.map(|(name, path)| {
				let symbol = SymbolName::parse(name).map_err(|e| ConfigError::InvalidUnit {
					name: name.clone(),
					reason: e.to_string(),
				})?;
				Ok((symbol, path.clone()))
			})
			.collect()
	}
}

/// Finds the config file to read, if any.
fn discover(explicit: Option<&Path>, env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
	if let Some(path) = explicit {
		return Some(path.to_path_buf());
	}
	if let Some(path) = env(CONFIG_ENV).filter(|v| !v.is_empty()) {
		return Some(PathBuf::from(path));
	}
	default_config_path(env).filter(|path| path.is_file())
}

/// `$XDG_CONFIG_HOME/nsload/config.toml`, falling back to the platform config dir.
fn default_config_path(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
	env("XDG_CONFIG_HOME")
		.filter(|v| !v.is_empty())
		.map(PathBuf::from)
		.or_else(dirs::config_dir)
		.map(|dir| dir.join("nsload").join("config.toml"))
}

#[cfg(test)]
mod tests;
