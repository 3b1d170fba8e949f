//! Load-once symbol loading.
//!
//! A [`PrefixLoader`] resolves a name to its candidates, probes them in order
//! and materializes the first readable one. Loaded names are recorded in a
//! [`LoadedSet`] so later requests return without touching the filesystem.
//!
//! # Concurrency
//!
//! The set keeps one slot per name behind a short-lived map lock. Probing and
//! reading happen while holding only that name's slot guard, so concurrent
//! loads of one name collapse into a single materialization while loads of
//! distinct names proceed independently.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::fs::{Filesystem, OsFilesystem};
use crate::materialize::Materializer;
use crate::resolver::Resolver;
use crate::symbol::SymbolName;

/// Result of a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The name was loaded earlier or is already defined by the host.
	AlreadyLoaded,
	/// The unit at the given path was materialized by this request.
	Loaded(PathBuf),
	/// No candidate could be loaded; the caller may try another loader.
	NotFound,
}

impl LoadOutcome {
	/// Whether the name is available after this request.
	pub fn is_success(&self) -> bool {
		!matches!(self, LoadOutcome::NotFound)
	}

	/// Path materialized by this request, if any.
	pub fn path(&self) -> Option<&Path> {
		match self {
			LoadOutcome::Loaded(path) => Some(path),
			_ => None,
		}
	}
}

#[derive(Debug, Default)]
struct Slot {
	loaded: AtomicBool,
	guard: Mutex<()>,
}

/// Names that were successfully loaded. Only ever grows.
///
/// Names that fail to load hold a slot only while a request for them is in
/// flight.
#[derive(Debug, Default)]
pub struct LoadedSet {
	slots: Mutex<FxHashMap<SymbolName, Arc<Slot>>>,
}

impl LoadedSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, name: &SymbolName) -> bool {
		self.slots
			.lock()
			.get(name)
			.is_some_and(|slot| slot.loaded.load(Ordering::Acquire))
	}

	/// Number of loaded names.
	pub fn len(&self) -> usize {
		self.slots
			.lock()
			.values()
			.filter(|slot| slot.loaded.load(Ordering::Acquire))
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Loaded names, sorted.
	pub fn names(&self) -> Vec<SymbolName> {
		let mut names: Vec<SymbolName> = self
			.slots
			.lock()
			.iter()
			.filter(|(_, slot)| slot.loaded.load(Ordering::Acquire))
			.map(|(name, _)| name.clone())
			.collect();
		names.sort();
		names
	}

	fn slot(&self, name: &SymbolName) -> Arc<Slot> {
		let mut slots = self.slots.lock();
		if let Some(slot) = slots.get(name) {
			return Arc::clone(slot);
		}
		Arc::clone(slots.entry(name.clone()).or_default())
	}

	/// Loads `name` from the first readable path produced by `candidates`,
	/// unless it is already loaded.
	///
	/// Candidates that exist but fail to read are skipped like missing ones.
	/// `candidates` is only invoked when the filesystem must be consulted.
	pub fn load_once<I>(
		&self,
		name: &SymbolName,
		fs: &dyn Filesystem,
		materializer: &dyn Materializer,
		candidates: impl FnOnce() -> I,
	) -> LoadOutcome
	where
		I: IntoIterator<Item = PathBuf>,
	{
		if self.contains(name) || materializer.is_defined(name) {
			return LoadOutcome::AlreadyLoaded;
		}

		let slot = self.slot(name);
		let outcome = {
			let _guard = slot.guard.lock();
			if slot.loaded.load(Ordering::Acquire) {
				return LoadOutcome::AlreadyLoaded;
			}
			let outcome = probe(name, fs, materializer, candidates());
			if let LoadOutcome::Loaded(_) = outcome {
				slot.loaded.store(true, Ordering::Release);
			}
			outcome
		};

		if outcome == LoadOutcome::NotFound {
			self.release(name, slot);
		}
		outcome
	}

	/// Drops the slot of a name that failed to load once no other request
	/// holds it.
	///
	/// Unloaded slots are cloned and dropped only under the map lock, so the
	/// last holder always sees the map's reference alone.
	fn release(&self, name: &SymbolName, slot: Arc<Slot>) {
		let mut slots = self.slots.lock();
		drop(slot);
		if let Some(entry) = slots.get(name)
			&& Arc::strong_count(entry) == 1
			&& !entry.loaded.load(Ordering::Acquire)
		{
			slots.remove(name);
		}
	}
}

fn probe<I>(name: &SymbolName, fs: &dyn Filesystem, materializer: &dyn Materializer, candidates: I) -> LoadOutcome
where
	I: IntoIterator<Item = PathBuf>,
{
	for path in candidates {
		if !fs.exists(&path) {
			debug!(symbol = %name, path = %path.display(), "Candidate missing");
			continue;
		}

		let source = match fs.read(&path) {
			Ok(source) => source,
			Err(error) => {
				debug!(symbol = %name, path = %path.display(), %error, "Candidate unreadable");
				continue;
			}
		};

		return match materializer.materialize(name, &path, source) {
			Ok(()) => {
				info!(symbol = %name, path = %path.display(), "Loaded unit");
				LoadOutcome::Loaded(path)
			}
			Err(error) => {
				warn!(symbol = %name, path = %path.display(), %error, "Unit rejected");
				LoadOutcome::NotFound
			}
		};
	}

	debug!(symbol = %name, "No candidate found");
	LoadOutcome::NotFound
}

/// Loader resolving names through the prefix tree.
pub struct PrefixLoader {
	resolver: Resolver,
	fs: Arc<dyn Filesystem>,
	materializer: Arc<dyn Materializer>,
	loaded: LoadedSet,
}

impl std::fmt::Debug for PrefixLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PrefixLoader")
			.field("resolver", &self.resolver)
			.field("loaded", &self.loaded.len())
			.finish_non_exhaustive()
	}
}

impl PrefixLoader {
	/// Identifier reported by [`SymbolLoader::id`](crate::SymbolLoader::id).
	pub const ID: &'static str = "prefix";

	/// Creates a loader probing the OS filesystem.
	pub fn new(resolver: Resolver, materializer: Arc<dyn Materializer>) -> Self {
		Self {
			resolver,
			fs: Arc::new(OsFilesystem),
			materializer,
			loaded: LoadedSet::new(),
		}
	}

	/// Replaces the filesystem candidates are probed against.
	pub fn with_filesystem(mut self, fs: Arc<dyn Filesystem>) -> Self {
		self.fs = fs;
		self
	}

	pub fn resolver(&self) -> &Resolver {
		&self.resolver
	}

	pub fn loaded(&self) -> &LoadedSet {
		&self.loaded
	}

	/// Loads `name` unless it is already loaded.
	pub fn load(&self, name: &SymbolName) -> LoadOutcome {
		self.loaded
			.load_once(name, self.fs.as_ref(), self.materializer.as_ref(), || {
				self.resolver.resolve(name).into_paths()
			})
	}
}
