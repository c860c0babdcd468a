//! Various traits for reading and writing to file-like objects

use crate::error::RiffError;

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};

/// A random-access byte source for the read path
///
/// Parsing only ever seeks, reads, and asks for the current position, so anything
/// implementing [`Read`] and [`Seek`] qualifies. The parser assumes exclusive use
/// of the source (and its cursor) for the duration of one parse call.
pub trait MediaSource: Read + Seek {}

impl<T> MediaSource for T where T: Read + Seek {}

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> crate::error::Result<u64> {
		use std::io::SeekFrom;

		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Provides a method to get the length of a storage object
///
/// This is one component of the [`FileLike`] trait, which the in-place writer uses to
/// verify that a chunk still fits inside its destination before writing anything.
///
/// Take great care in implementing this for downstream types, as Riffle will assume that the
/// container has the exact length specified. If this assumption were to be broken, files **may** become corrupted.
pub trait Length {
	/// The error type of the length operation
	type Error: Into<RiffError>;

	/// Get the length of a storage object
	///
	/// # Errors
	///
	/// Errors depend on the object being read, which may not always be fallible.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

impl<T> Length for Box<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.as_ref())
	}
}

impl<T> Length for &T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

impl<T> Length for &mut T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// Provides a set of methods to read and write to a file-like object
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], and [`Length`] traits.
/// It is the byte source required by the in-place write methods such as
/// [`RiffFile::replace_chunk_in`](crate::riff::RiffFile::replace_chunk_in).
///
/// Take great care in implementing this for downstream types, as Riffle will assume that the
/// trait implementations are correct. If this assumption were to be broken, files **may** become corrupted.
pub trait FileLike: Read + Write + Seek + Length
where
	<Self as Length>::Error: Into<RiffError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Length,
	<T as Length>::Error: Into<RiffError>,
{
}
