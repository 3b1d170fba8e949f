//! Error types for symbol parsing, registration and loader chains.
//!
//! Failing to find a unit is not an error: loaders report it through
//! [`LoadOutcome::NotFound`](crate::LoadOutcome::NotFound) so callers can fall
//! back to the next strategy.

use thiserror::Error;

use crate::symbol::SymbolName;

/// Errors produced when parsing the textual form of a symbol name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolNameError {
	/// The input contained no segments at all.
	#[error("symbol name is empty")]
	Empty,

	/// Two separators appeared back to back.
	#[error("symbol name '{input}' contains an empty segment")]
	EmptySegment {
		/// The offending input.
		input: String,
	},
}

/// Errors that can occur when registering a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// The prefix or directory was unusable. The tree is left untouched.
	#[error("malformed registration for '{prefix}': {reason}")]
	MalformedRegistration {
		/// Prefix as supplied by the caller.
		prefix: String,
		/// Why the registration was rejected.
		reason: String,
	},
}

/// Errors a host [`Materializer`](crate::Materializer) reports for a unit.
#[derive(Debug, Error)]
pub enum MaterializeError {
	/// The host refused the unit contents.
	#[error("unit for {name} rejected: {reason}")]
	Rejected {
		/// Symbol the unit was loaded for.
		name: SymbolName,
		/// Host supplied reason.
		reason: String,
	},
}

/// Raised by hosts that escalate after every loader in a chain failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
	/// No registered loader could resolve the symbol.
	#[error("no registered loader could resolve {0}")]
	Unresolved(SymbolName),
}
