use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};

/// A 4-byte RIFF chunk identifier
///
/// A valid identifier is exactly 4 ASCII bytes with no NUL, padded with
/// ASCII 32 (space) when the meaningful portion is shorter (ex. `"fmt "`).
///
/// Identifiers compare byte-for-byte, and double as registry keys and as the
/// discriminant for container-kind detection during parsing.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
	/// The `RIFF` container chunk
	pub const RIFF: ChunkId = ChunkId(*b"RIFF");
	/// The `LIST` container chunk
	pub const LIST: ChunkId = ChunkId(*b"LIST");
	/// The `INFO` chunk (tagging metadata, interior left unparsed)
	pub const INFO: ChunkId = ChunkId(*b"INFO");
	/// The WAV format description chunk (note the trailing space)
	pub const FMT: ChunkId = ChunkId(*b"fmt ");
	/// The WAV sample data chunk
	pub const DATA: ChunkId = ChunkId(*b"data");
	/// The Broadcast Wave extension chunk
	pub const BEXT: ChunkId = ChunkId(*b"bext");
	/// The Broadcast Wave iXML metadata chunk
	pub const IXML: ChunkId = ChunkId(*b"iXML");

	/// Create an identifier from raw bytes
	#[must_use]
	pub const fn new(bytes: [u8; 4]) -> Self {
		Self(bytes)
	}

	/// Whether the identifier is 4 ASCII bytes free of NUL
	pub fn is_valid(&self) -> bool {
		self.0.iter().all(|&b| b.is_ascii() && b != 0)
	}

	/// The raw identifier bytes
	pub fn as_bytes(&self) -> [u8; 4] {
		self.0
	}

	/// The identifier as text, replacing any non-ASCII bytes
	pub fn as_str(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}
}

impl Display for ChunkId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl Debug for ChunkId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ChunkId({:?})", self.as_str())
	}
}

impl From<[u8; 4]> for ChunkId {
	fn from(bytes: [u8; 4]) -> Self {
		Self(bytes)
	}
}

impl PartialEq<[u8; 4]> for ChunkId {
	fn eq(&self, other: &[u8; 4]) -> bool {
		&self.0 == other
	}
}

impl PartialEq<&[u8; 4]> for ChunkId {
	fn eq(&self, other: &&[u8; 4]) -> bool {
		&self.0 == *other
	}
}
