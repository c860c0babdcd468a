//! Contains the errors that can arise within Riffle
//!
//! The primary error is [`RiffError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, RiffError>`
pub type Result<T> = std::result::Result<T, RiffError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Container-level errors
	/// The file does not start with a known container tag (`RIFF`, `RIFX`, `RF64`, `RIF2`)
	MissingRiffHeader,
	/// Found a `RIF2` container, which uses an unsupported 64-bit size scheme
	UnsupportedRif2,
	/// A chunk identifier was unreadable or not 4 NUL-free ASCII bytes
	///
	/// Carries the offending identifier when one could be read at all.
	InvalidChunkId(Option<String>),
	/// A container-kind chunk ended before its 4-byte sub-identifier
	MissingSubId(String),
	/// A chunk's length field could not be read
	InvalidChunkLength(String),
	/// A typed chunk's payload does not match its published layout
	MalformedChunk {
		/// The chunk identifier, ex. "fmt "
		id: &'static str,
		/// What was wrong with the payload
		reason: &'static str,
	},

	// Write path errors
	/// Expected the data to be a different size than provided
	///
	/// This occurs when a replacement payload (or the chunk on disk) no longer matches
	/// the size recorded at parse time. Chunks are never grown or shrunk in place.
	SizeMismatch,
	/// Attempted a path-based write on a file parsed from a bare reader
	NoBackingFile,
	/// The destination ends before the chunk being replaced
	FileTooSmall,
	/// Attempted to write a chunk identifier that is not 4 NUL-free ASCII bytes
	InvalidWriteId,
	/// Attempted to write a chunk sub-identifier that is not 4 NUL-free ASCII bytes
	InvalidWriteSubId,

	// WAV layer errors
	/// A chunk required by the requested operation is not present in the file
	MissingChunk(&'static str),

	// Conversions for external errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// Errors that could occur within Riffle
pub struct RiffError {
	pub(crate) kind: ErrorKind,
}

impl RiffError {
	/// Create a `RiffError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use riffle::error::{ErrorKind, RiffError};
	///
	/// let no_header = RiffError::new(ErrorKind::MissingRiffHeader);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use riffle::error::{ErrorKind, RiffError};
	///
	/// let no_header = RiffError::new(ErrorKind::MissingRiffHeader);
	/// if let ErrorKind::MissingRiffHeader = no_header.kind() {
	/// 	println!("Not a RIFF file");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for RiffError {}

impl Debug for RiffError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<std::io::Error> for RiffError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<TryReserveError> for RiffError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for RiffError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for RiffError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::MissingRiffHeader => write!(
				f,
				"Missing RIFF identifier at file start, not a RIFF/RIFX/RF64 file"
			),
			ErrorKind::UnsupportedRif2 => {
				write!(f, "RIF2 containers are not supported")
			},
			ErrorKind::InvalidChunkId(Some(ref id)) => {
				write!(f, "Invalid chunk identifier: \"{id}\"")
			},
			ErrorKind::InvalidChunkId(None) => write!(f, "Invalid chunk identifier"),
			ErrorKind::MissingSubId(ref id) => {
				write!(f, "Missing sub-identifier for chunk \"{id}\"")
			},
			ErrorKind::InvalidChunkLength(ref id) => {
				write!(f, "Chunk \"{id}\" has an invalid length field")
			},
			ErrorKind::MalformedChunk { id, reason } => {
				write!(f, "Malformed \"{id}\" chunk: {reason}")
			},

			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::NoBackingFile => {
				write!(f, "No backing file available for writing")
			},
			ErrorKind::FileTooSmall => {
				write!(f, "File is too small to contain the chunk being replaced")
			},
			ErrorKind::InvalidWriteId => write!(
				f,
				"Refusing to write a chunk identifier that is not 4 NUL-free ASCII bytes"
			),
			ErrorKind::InvalidWriteSubId => write!(
				f,
				"Refusing to write a chunk sub-identifier that is not 4 NUL-free ASCII bytes"
			),

			ErrorKind::MissingChunk(id) => write!(f, "File has no \"{id}\" chunk"),

			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::Infallible(_) => write!(f, "An expected condition was not upheld"),
		}
	}
}
