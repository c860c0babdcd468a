use std::fmt::{Debug, Formatter};

/// A closed-inclusive byte offset range
///
/// Both bounds are part of the range: a chunk spanning offsets 0 through 11
/// is `ByteRange { start: 0, end: 11 }` with a length of 12. Every range in
/// this crate uses this convention; mixing in half-open ranges is a reliable
/// source of off-by-one corruption in a format built on byte arithmetic.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ByteRange {
	/// Offset of the first byte in the range
	pub start: u64,
	/// Offset of the last byte in the range (inclusive)
	pub end: u64,
}

impl ByteRange {
	/// Create a range spanning `start` through `end`, both inclusive
	#[must_use]
	pub const fn new(start: u64, end: u64) -> Self {
		debug_assert!(start <= end);
		Self { start, end }
	}

	/// Number of bytes covered by the range
	pub const fn len(&self) -> u64 {
		self.end - self.start + 1
	}

	/// Whether `offset` falls inside the range
	pub const fn contains(&self, offset: u64) -> bool {
		self.start <= offset && offset <= self.end
	}
}

impl Debug for ByteRange {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..={}", self.start, self.end)
	}
}
