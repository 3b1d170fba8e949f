//! Host sink for loaded units.
//!
//! Once a loader finds a readable candidate it hands the contents to a
//! [`Materializer`], which makes the unit available to the running program.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::MaterializeError;
use crate::symbol::SymbolName;

/// Receives the contents of loaded units.
pub trait Materializer: Send + Sync {
	/// Makes `source`, read from `path`, available as `name`.
	fn materialize(&self, name: &SymbolName, path: &Path, source: Vec<u8>) -> Result<(), MaterializeError>;

	/// Whether the host already defines `name` without this loader's help.
	fn is_defined(&self, _name: &SymbolName) -> bool {
		false
	}
}

/// A unit handed to a [`CollectingMaterializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedUnit {
	pub name: SymbolName,
	pub path: PathBuf,
	pub source: Vec<u8>,
}

/// Keeps every materialized unit in memory.
#[derive(Debug, Default)]
pub struct CollectingMaterializer {
	units: Mutex<Vec<LoadedUnit>>,
}

impl CollectingMaterializer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of the units materialized so far, in load order.
	pub fn units(&self) -> Vec<LoadedUnit> {
		self.units.lock().clone()
	}

	/// The unit materialized for `name`.
	pub fn get(&self, name: &SymbolName) -> Option<LoadedUnit> {
		self.units.lock().iter().find(|u| &u.name == name).cloned()
	}

	/// How many times `name` was materialized.
	pub fn count(&self, name: &SymbolName) -> usize {
		self.units.lock().iter().filter(|u| &u.name == name).count()
	}

	pub fn len(&self) -> usize {
		self.units.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.lock().is_empty()
	}
}

impl Materializer for CollectingMaterializer {
	fn materialize(&self, name: &SymbolName, path: &Path, source: Vec<u8>) -> Result<(), MaterializeError> {
		self.units.lock().push(LoadedUnit {
			name: name.clone(),
			path: path.to_path_buf(),
			source,
		});
		Ok(())
	}

	fn is_defined(&self, name: &SymbolName) -> bool {
		self.units.lock().iter().any(|u| &u.name == name)
	}
}
