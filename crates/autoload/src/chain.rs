//! Ordered fallback across loader strategies.
//!
//! Hosts register any number of [`SymbolLoader`]s in a [`LoaderChain`]. A
//! request tries each loader in registration order and stops at the first one
//! that succeeds. Only when every loader reports
//! [`LoadOutcome::NotFound`] does the request fail.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::ChainError;
use crate::fs::{Filesystem, OsFilesystem};
use crate::loader::{LoadOutcome, LoadedSet, PrefixLoader};
use crate::materialize::Materializer;
use crate::symbol::SymbolName;

/// A strategy for turning a symbol name into a loaded unit.
pub trait SymbolLoader: Send + Sync {
	/// Short identifier used in logs and reports.
	fn id(&self) -> &str;

	/// Loads `name`, reporting [`LoadOutcome::NotFound`] to let the next
	/// strategy try.
	fn load(&self, name: &SymbolName) -> LoadOutcome;
}

impl SymbolLoader for PrefixLoader {
	fn id(&self) -> &str {
		Self::ID
	}

	fn load(&self, name: &SymbolName) -> LoadOutcome {
		PrefixLoader::load(self, name)
	}
}

/// Loader backed by a fixed symbol-to-file table.
pub struct ExplicitLoader {
	entries: FxHashMap<SymbolName, PathBuf>,
	fs: Arc<dyn Filesystem>,
	materializer: Arc<dyn Materializer>,
	loaded: LoadedSet,
}

impl std::fmt::Debug for ExplicitLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExplicitLoader")
			.field("entries", &self.entries)
			.field("loaded", &self.loaded.len())
			.finish_non_exhaustive()
	}
}

impl ExplicitLoader {
	pub const ID: &'static str = "explicit";

	pub fn new(materializer: Arc<dyn Materializer>) -> Self {
		Self {
			entries: FxHashMap::default(),
			fs: Arc::new(OsFilesystem),
			materializer,
			loaded: LoadedSet::new(),
		}
	}

	pub fn with_filesystem(mut self, fs: Arc<dyn Filesystem>) -> Self {
		self.fs = fs;
		self
	}

	/// Maps `name` to `path`, replacing any previous entry.
	pub fn with_entry(mut self, name: SymbolName, path: impl Into<PathBuf>) -> Self {
		self.entries.insert(name, path.into());
		self
	}

	pub fn path_for(&self, name: &SymbolName) -> Option<&Path> {
		self.entries.get(name).map(PathBuf::as_path)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn loaded(&self) -> &LoadedSet {
		&self.loaded
	}
}

impl SymbolLoader for ExplicitLoader {
	fn id(&self) -> &str {
		Self::ID
	}

	fn load(&self, name: &SymbolName) -> LoadOutcome {
		let Some(path) = self.entries.get(name) else {
			return LoadOutcome::NotFound;
		};
		self.loaded
			.load_once(name, self.fs.as_ref(), self.materializer.as_ref(), || {
				[path.clone()]
			})
	}
}

/// Successful chain request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	/// Identifier of the loader that succeeded.
	pub loader: String,
	pub outcome: LoadOutcome,
}

/// Loaders tried in registration order.
#[derive(Default)]
pub struct LoaderChain {
	loaders: Vec<Arc<dyn SymbolLoader>>,
}

impl std::fmt::Debug for LoaderChain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoaderChain")
			.field("loaders", &self.ids())
			.finish()
	}
}

impl LoaderChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a loader after those already registered.
	pub fn push(&mut self, loader: Arc<dyn SymbolLoader>) -> &mut Self {
		self.loaders.push(loader);
		self
	}

	pub fn with(mut self, loader: Arc<dyn SymbolLoader>) -> Self {
		self.push(loader);
		self
	}

	/// Loader identifiers in try order.
	pub fn ids(&self) -> Vec<&str> {
		self.loaders.iter().map(|l| l.id()).collect()
	}

	pub fn len(&self) -> usize {
		self.loaders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.loaders.is_empty()
	}

	/// Tries each loader until one succeeds.
	pub fn load(&self, name: &SymbolName) -> Option<Resolution> {
		self.loaders.iter().find_map(|loader| {
			let outcome = loader.load(name);
			if outcome.is_success() {
				return Some(Resolution {
					loader: loader.id().to_owned(),
					outcome,
				});
			}
			debug!(symbol = %name, loader = loader.id(), "Loader missed, trying next");
			None
		})
	}

	/// Like [`load`](Self::load), failing when no loader resolves `name`.
	pub fn require(&self, name: &SymbolName) -> Result<Resolution, ChainError> {
		self.load(name)
			.ok_or_else(|| ChainError::Unresolved(name.clone()))
	}
}
