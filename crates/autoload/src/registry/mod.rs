//! Prefix registry.
//!
//! Registrations bind a symbol prefix (`Vendor.Sub`) to a directory. They are
//! stored as a forest keyed by the first segment, where every node mirrors one
//! name segment. A [`PrefixRegistryBuilder`] collects registrations during
//! startup; [`PrefixRegistryBuilder::build`] freezes it into a
//! [`PrefixRegistry`] that has no mutating API and can be shared across
//! threads without locking.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::RegistryError;
use crate::symbol::SymbolName;


/// One registered segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixNode {
	/// A bare directory with no nested registrations.
	Leaf(PathBuf),
	/// A node with nested registrations, an optional directory and the ignore flag.
	Branch(Branch),
}

/// Structured node data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
	/// Nested registrations keyed by segment.
	pub children: FxHashMap<String, PrefixNode>,
	/// Directory contributed by this segment, if any.
	pub path: Option<PathBuf>,
	/// Drop the nearest path-bearing ancestor when resolving below this node.
	pub ignore_previous: bool,
}

impl PrefixNode {
	fn empty() -> Self {
		Self::Branch(Branch::default())
	}

	/// Directory contributed by this node.
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::Leaf(path) => Some(path),
			Self::Branch(branch) => branch.path.as_deref(),
		}
	}

	/// Whether this node replaces the nearest ancestor directory.
	pub fn ignores_previous(&self) -> bool {
		matches!(self, Self::Branch(branch) if branch.ignore_previous)
	}

	/// Nested registration for `segment`.
	pub fn child(&self, segment: &str) -> Option<&PrefixNode> {
		match self {
			Self::Leaf(_) => None,
			Self::Branch(branch) => branch.children.get(segment),
		}
	}

	/// Turns a leaf into a branch that keeps the leaf directory as its own.
	fn make_branch(&mut self) -> &mut Branch {
		match self {
			Self::Branch(branch) => branch,
			Self::Leaf(path) => {
				let path = std::mem::take(path);
				*self = Self::Branch(Branch {
					path: Some(path),
					..Branch::default()
				});
				self.make_branch()
			}
		}
	}

	fn assign(&mut self, dir: PathBuf, ignore: Option<bool>) {
		if let Some(ignore) = ignore {
			let branch = self.make_branch();
			branch.path = Some(dir);
			branch.ignore_previous = ignore;
			return;
		}

		match self {
			Self::Branch(branch) if !branch.children.is_empty() || branch.ignore_previous => {
				branch.path = Some(dir);
			}
			_ => *self = Self::Leaf(dir),
		}
	}

	fn collect_entries(&self, prefix: String, out: &mut Vec<RegistryEntry>) {
		out.push(RegistryEntry {
			prefix: prefix.clone(),
			path: self.path().map(Path::to_path_buf),
			ignore_previous: self.ignores_previous(),
		});
		if let Self::Branch(branch) = self {
			for (segment, child) in &branch.children {
				child.collect_entries(format!("{prefix}.{segment}"), out);
			}
		}
	}
}

/// Flattened view of one node, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
	/// Dotted prefix of the node.
	pub prefix: String,
	/// Directory contributed by the node.
	pub path: Option<PathBuf>,
	/// Whether the node carries the ignore flag.
	pub ignore_previous: bool,
}

/// Mutable registry used during initialization.
#[derive(Debug, Clone, Default)]
pub struct PrefixRegistryBuilder {
	roots: FxHashMap<String, PrefixNode>,
}

impl PrefixRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `prefix` to `base_dir`.
	///
	/// Missing nodes along the prefix are created and existing ones reused. When
	/// `ignore` is given, the directory and flag are stored together and the
	/// directory replaces the nearest ancestor directory during resolution.
	///
	/// Trailing path separators are stripped from `base_dir`. An empty prefix or
	/// directory is rejected without touching the tree.
	pub fn register(
		&mut self,
		prefix: &str,
		base_dir: &str,
		ignore: Option<bool>,
	) -> Result<&mut Self, RegistryError> {
		let malformed = |reason: String| RegistryError::MalformedRegistration {
			prefix: prefix.to_owned(),
			reason,
		};

		let name = SymbolName::parse(prefix).map_err(|e| malformed(e.to_string()))?;
		let dir = normalize_dir(base_dir).ok_or_else(|| malformed("empty directory".to_owned()))?;

		debug!(prefix = %name, dir = %dir.display(), ?ignore, "Registering prefix");

		let (first, rest) = name.segments().split_at(1);
		let mut node = self
			.roots
			.entry(first[0].clone())
			.or_insert_with(PrefixNode::empty);
		for segment in rest {
			node = node
				.make_branch()
				.children
				.entry(segment.clone())
				.or_insert_with(PrefixNode::empty);
		}
		node.assign(dir, ignore);

		Ok(self)
	}

	/// Freezes the registrations.
	pub fn build(self) -> PrefixRegistry {
		PrefixRegistry { roots: self.roots }
	}
}

/// Frozen prefix tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixRegistry {
	roots: FxHashMap<String, PrefixNode>,
}

impl PrefixRegistry {
	pub fn builder() -> PrefixRegistryBuilder {
		PrefixRegistryBuilder::new()
	}

	/// Node registered for a top-level segment.
	pub fn root(&self, segment: &str) -> Option<&PrefixNode> {
		self.roots.get(segment)
	}

	/// Node reached by following `segments` from the roots.
	pub fn node(&self, segments: &[String]) -> Option<&PrefixNode> {
		let (first, rest) = segments.split_first()?;
		rest.iter()
			.try_fold(self.root(first)?, |node, segment| node.child(segment))
	}

	/// Number of top-level registrations.
	pub fn len(&self) -> usize {
		self.roots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.roots.is_empty()
	}

	/// Every node in the tree, sorted by prefix.
	pub fn entries(&self) -> Vec<RegistryEntry> {
		let mut out = Vec::new();
		for (segment, node) in &self.roots {
			node.collect_entries(segment.clone(), &mut out);
		}
		out.sort_by(|a, b| a.prefix.cmp(&b.prefix));
		out
	}
}

/// Strips trailing separators, keeping a bare filesystem root intact.
fn normalize_dir(base_dir: &str) -> Option<PathBuf> {
	let base_dir = base_dir.trim();
	if base_dir.is_empty() {
		return None;
	}
	let trimmed = base_dir.trim_end_matches(['/', '\\']);
	if trimmed.is_empty() {
		return Some(PathBuf::from(&base_dir[..1]));
	}
	Some(PathBuf::from(trimmed))
}
