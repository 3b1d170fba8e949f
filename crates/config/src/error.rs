//! Error types for configuration loading.

use std::path::PathBuf;

use nsload_autoload::RegistryError;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A prefix entry could not be registered.
	#[error("invalid prefix entry: {0}")]
	Registry(#[from] RegistryError),

	/// An explicit unit entry has an unusable symbol name.
	#[error("invalid unit name '{name}': {reason}")]
	InvalidUnit {
		/// Name as written in the file.
		name: String,
		/// Why it was rejected.
		reason: String,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
