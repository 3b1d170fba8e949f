//! Test doubles shared by the loader and chain tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::MaterializeError;
use crate::fs::Filesystem;
use crate::materialize::Materializer;
use crate::symbol::SymbolName;

/// In-memory filesystem that counts every operation.
#[derive(Debug, Default)]
pub struct MemoryFs {
	files: FxHashMap<PathBuf, Result<Vec<u8>, io::ErrorKind>>,
	ops: AtomicUsize,
	probed: Mutex<Vec<PathBuf>>,
}

impl MemoryFs {
	pub fn with_file(mut self, path: &str, contents: &str) -> Self {
		self.files
			.insert(PathBuf::from(path), Ok(contents.as_bytes().to_vec()));
		self
	}

	/// A file that exists but fails to read.
	pub fn with_unreadable(mut self, path: &str) -> Self {
		self.files
			.insert(PathBuf::from(path), Err(io::ErrorKind::PermissionDenied));
		self
	}

	pub fn ops(&self) -> usize {
		self.ops.load(Ordering::SeqCst)
	}

	pub fn probed(&self) -> Vec<PathBuf> {
		self.probed.lock().clone()
	}
}

impl Filesystem for MemoryFs {
	fn exists(&self, path: &Path) -> bool {
		self.ops.fetch_add(1, Ordering::SeqCst);
		self.probed.lock().push(path.to_path_buf());
		self.files.contains_key(path)
	}

	fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		self.ops.fetch_add(1, Ordering::SeqCst);
		match self.files.get(path) {
			Some(Ok(bytes)) => Ok(bytes.clone()),
			Some(Err(kind)) => Err(io::Error::from(*kind)),
			None => Err(io::Error::from(io::ErrorKind::NotFound)),
		}
	}
}

/// Materializer that refuses every unit.
#[derive(Debug, Default)]
pub struct RejectingMaterializer;

impl Materializer for RejectingMaterializer {
	fn materialize(&self, name: &SymbolName, _path: &Path, _source: Vec<u8>) -> Result<(), MaterializeError> {
		Err(MaterializeError::Rejected {
			name: name.clone(),
			reason: "syntax error".to_owned(),
		})
	}
}

pub fn name(s: &str) -> SymbolName {
	SymbolName::parse(s).unwrap()
}
