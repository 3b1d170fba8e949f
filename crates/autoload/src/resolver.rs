//! Symbol name to candidate path resolution.
//!
//! Resolution never touches the filesystem. It walks the prefix tree along
//! the directory segments of a name and produces three candidate files, in
//! the order a loader should probe them:
//!
//! 1. `<base>/<Leaf>.<ext>`
//! 2. `<base>/src/<Leaf>.<ext>`
//! 3. `<base>/test/<Leaf>.<ext>`
//!
//! Directory segments consumed by the tree keep the directories given at
//! registration time. Segments past the last matched node are lower-cased.
//! The leaf is a file name and keeps its case.
//!
//! Names whose first segment has no registration resolve under the external
//! module root instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::registry::PrefixRegistry;
use crate::symbol::SymbolName;

/// Default source unit extension.
pub const DEFAULT_EXTENSION: &str = "mod";

/// Default root for names with an unregistered first segment.
pub const DEFAULT_EXTERNAL_ROOT: &str = "externals/vendor";

/// Settings consumed by resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
	/// Root for names whose first segment has no registration.
	pub external_root: PathBuf,
	/// File extension appended to the leaf, without the dot.
	pub extension: String,
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			external_root: PathBuf::from(DEFAULT_EXTERNAL_ROOT),
			extension: DEFAULT_EXTENSION.to_owned(),
		}
	}
}

/// Layout location of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
	/// Directly in the base directory.
	Direct,
	/// Under the `src` directory.
	Src,
	/// Under the `test` directory.
	Test,
}

impl Placement {
	/// All placements in probe order.
	pub const ORDER: [Placement; 3] = [Placement::Direct, Placement::Src, Placement::Test];

	fn subdir(self) -> Option<&'static str> {
		match self {
			Placement::Direct => None,
			Placement::Src => Some("src"),
			Placement::Test => Some("test"),
		}
	}
}

/// Candidate files for one symbol, in probe order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
	base: PathBuf,
	paths: [PathBuf; 3],
}

impl Candidates {
	fn new(base: PathBuf, leaf: &str, extension: &str) -> Self {
		let file_name = if extension.is_empty() {
			leaf.to_owned()
		} else {
			format!("{leaf}.{extension}")
		};
		let paths = Placement::ORDER.map(|placement| match placement.subdir() {
			Some(dir) => base.join(dir).join(&file_name),
			None => base.join(&file_name),
		});
		Self { base, paths }
	}

	/// Base directory shared by all candidates.
	pub fn base(&self) -> &Path {
		&self.base
	}

	/// Highest priority candidate.
	pub fn primary(&self) -> &Path {
		&self.paths[0]
	}

	/// Candidate for a specific placement.
	pub fn get(&self, placement: Placement) -> &Path {
		let index = Placement::ORDER
			.iter()
			.position(|p| *p == placement)
			.unwrap_or(0);
		&self.paths[index]
	}

	/// Candidates with their placement, in probe order.
	pub fn iter(&self) -> impl Iterator<Item = (Placement, &Path)> {
		Placement::ORDER
			.into_iter()
			.zip(self.paths.iter().map(PathBuf::as_path))
	}

	pub fn into_paths(self) -> [PathBuf; 3] {
		self.paths
	}
}

/// Resolves `name` against `registry`.
///
/// Only the directory segments walk the tree; the leaf is always the file
/// name. A single-segment name therefore has no directory to match and
/// resolves under the external root even when that segment is registered.
pub fn resolve(registry: &PrefixRegistry, settings: &ResolverSettings, name: &SymbolName) -> Candidates {
	Candidates::new(base_path(registry, settings, name), name.leaf(), &settings.extension)
}

fn base_path(registry: &PrefixRegistry, settings: &ResolverSettings, name: &SymbolName) -> PathBuf {
	let dirs = name.directories();

	let Some(root) = dirs.first().and_then(|vendor| registry.root(vendor)) else {
		let mut base = settings.external_root.clone();
		base.extend(dirs.iter().map(|segment| segment.to_lowercase()));
		return base;
	};

	// One slot per directory segment; `None` means the segment contributes nothing.
	let mut slots: Vec<Option<PathBuf>> = vec![None; dirs.len()];
	let mut node = root;
	let mut matched = 0;
	loop {
		if node.ignores_previous()
			&& let Some(previous) = slots[..matched].iter_mut().rev().find(|slot| slot.is_some())
		{
			*previous = None;
		}
		slots[matched] = node.path().map(Path::to_path_buf);
		matched += 1;

		match dirs.get(matched).and_then(|segment| node.child(segment)) {
			Some(child) => node = child,
			None => break,
		}
	}

	for (slot, segment) in slots.iter_mut().zip(dirs).skip(matched) {
		*slot = Some(PathBuf::from(segment.to_lowercase()));
	}

	slots.into_iter().flatten().collect()
}

/// Registry and settings bundled for repeated resolution.
#[derive(Debug, Clone)]
pub struct Resolver {
	registry: Arc<PrefixRegistry>,
	settings: ResolverSettings,
}

impl Resolver {
	pub fn new(registry: Arc<PrefixRegistry>, settings: ResolverSettings) -> Self {
		Self { registry, settings }
	}

	pub fn registry(&self) -> &PrefixRegistry {
		&self.registry
	}

	pub fn settings(&self) -> &ResolverSettings {
		&self.settings
	}

	pub fn resolve(&self, name: &SymbolName) -> Candidates {
		resolve(&self.registry, &self.settings, name)
	}
}
