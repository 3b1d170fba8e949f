//! Hierarchical symbol names.

use std::fmt;
use std::str::FromStr;

use crate::error::SymbolNameError;

/// Characters accepted between segments of a symbol name.
pub const SEPARATORS: [char; 3] = ['.', '/', '\\'];

/// An immutable, non-empty sequence of name segments (e.g. `Vendor.Sub.Leaf`).
///
/// The last segment is the *leaf* and names the unit itself; every segment
/// before it is a *directory segment*.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolName {
	segments: Vec<String>,
}

impl SymbolName {
	/// Parses a symbol name, accepting any mix of `.`, `/` and `\` separators.
	///
	/// Surrounding whitespace and leading/trailing separators are ignored.
	pub fn parse(input: &str) -> Result<Self, SymbolNameError> {
		let trimmed = input.trim().trim_matches(SEPARATORS);
		if trimmed.is_empty() {
			return Err(SymbolNameError::Empty);
		}

		let segments: Vec<String> = trimmed.split(SEPARATORS).map(str::to_owned).collect();
		if segments.iter().any(String::is_empty) {
			return Err(SymbolNameError::EmptySegment {
				input: input.to_owned(),
			});
		}

		Ok(Self { segments })
	}

	/// Builds a name from already split segments.
	pub fn from_segments<I, S>(segments: I) -> Result<Self, SymbolNameError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
		if segments.is_empty() {
			return Err(SymbolNameError::Empty);
		}
		if segments.iter().any(|s| s.is_empty() || s.contains(SEPARATORS)) {
			return Err(SymbolNameError::EmptySegment {
				input: segments.join("."),
			});
		}
		Ok(Self { segments })
	}

	/// All segments, in order.
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Segments preceding the leaf.
	pub fn directories(&self) -> &[String] {
		&self.segments[..self.segments.len() - 1]
	}

	/// The last segment.
	pub fn leaf(&self) -> &str {
		&self.segments[self.segments.len() - 1]
	}

	/// The first segment, which selects the registry root.
	pub fn vendor(&self) -> &str {
		&self.segments[0]
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	/// Always `false`; kept for parity with `len`.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}

impl fmt::Display for SymbolName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.segments.join("."))
	}
}

impl FromStr for SymbolName {
	type Err = SymbolNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
