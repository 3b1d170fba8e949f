//! Filesystem access used when probing candidates.
//!
//! Loaders only ever ask whether a candidate exists and read its bytes. The
//! trait lets hosts serve units from somewhere other than the OS filesystem.

use std::path::Path;
use std::{fs, io};

/// Read-only view of the files candidates are probed against.
pub trait Filesystem: Send + Sync {
	/// Whether a file exists at `path`.
	fn exists(&self, path: &Path) -> bool;

	/// Reads the full contents of `path`.
	fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
	fn exists(&self, path: &Path) -> bool {
		path.is_file()
	}

	fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		fs::read(path)
	}
}
