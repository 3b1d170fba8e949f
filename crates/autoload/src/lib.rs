// Loader diagnostics go through tracing, never stderr
#![deny(clippy::print_stderr)]

//! Prefix-tree symbol autoloading
//!
//! This crate maps hierarchical symbol names (`Vendor.Sub.Leaf`) onto source
//! files using a tree of registered prefix directories, and loads each name at
//! most once.
//!
//! # Architecture
//!
//! * [`symbol`]: Parsed, immutable symbol names
//! * [`registry`]: Prefix tree built once at startup, then frozen
//! * [`resolver`]: Pure name-to-candidate-path resolution
//! * [`fs`]: Filesystem seam used for probing and reading candidates
//! * [`materialize`]: Host sink receiving loaded units
//! * [`loader`]: Load-once cache and the prefix-tree loader
//! * [`chain`]: Ordered fallback across loader strategies
//!
//! # Lifecycle
//!
//! ```text
//! PrefixRegistryBuilder::register(..)  (startup, mutable)
//!         │ build()
//!         ▼
//! Arc<PrefixRegistry>  ──►  Resolver  ──►  PrefixLoader  ──►  LoaderChain
//!    (read-only)            (pure)         (load-once)       (early exit)
//! ```

pub mod chain;
pub mod error;
pub mod fs;
pub mod loader;
pub mod materialize;
pub mod registry;
pub mod resolver;
pub mod symbol;
#[cfg(test)]
mod testing;

pub use chain::{ExplicitLoader, LoaderChain, Resolution, SymbolLoader};
pub use error::{ChainError, MaterializeError, RegistryError, SymbolNameError};
pub use fs::{Filesystem, OsFilesystem};
pub use loader::{LoadOutcome, LoadedSet, PrefixLoader};
pub use materialize::{CollectingMaterializer, LoadedUnit, Materializer};
pub use registry::{Branch, PrefixNode, PrefixRegistry, PrefixRegistryBuilder, RegistryEntry};
pub use resolver::{Candidates, DEFAULT_EXTENSION, DEFAULT_EXTERNAL_ROOT, Placement, Resolver, ResolverSettings, resolve};
pub use symbol::SymbolName;
