//! RIFF container parsing and in-place writing

pub(crate) mod read;
pub(crate) mod write;

use crate::chunk::{ChunkNode, ChunkRegistry};
use crate::error::Result;
use crate::macros::err;
use crate::util::io::{FileLike, MediaSource};

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

/// The container format, identified by the file's leading 4-byte tag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RiffFormat {
	/// Classic little-endian `RIFF`
	Riff,
	/// Big-endian `RIFX`
	Rifx,
	/// `RF64`, parsed as a plain little-endian container
	///
	/// The 64-bit size-extension scheme is not interpreted; a `ds64` chunk
	/// decodes like any other unregistered chunk.
	Rf64,
	/// `RIF2`, recognized but always rejected at parse
	Rif2,
}

impl RiffFormat {
	/// The format matching a leading tag, if any
	pub(crate) fn from_tag(tag: [u8; 4]) -> Option<Self> {
		match &tag {
			b"RIFF" => Some(Self::Riff),
			b"RIFX" => Some(Self::Rifx),
			b"RF64" => Some(Self::Rf64),
			b"RIF2" => Some(Self::Rif2),
			_ => None,
		}
	}

	/// The byte order of length fields and typed payloads for this format
	pub fn endianness(&self) -> Endianness {
		match self {
			Self::Riff | Self::Rf64 | Self::Rif2 => Endianness::Little,
			Self::Rifx => Endianness::Big,
		}
	}
}

/// The byte order of a container's integer fields
///
/// The order is only known once the leading tag has been read, so this is a
/// runtime value dispatching to [`byteorder`]'s static types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endianness {
	/// Least significant byte first (`RIFF`, `RF64`)
	Little,
	/// Most significant byte first (`RIFX`)
	Big,
}

impl Endianness {
	/// Read a `u16` in this byte order
	///
	/// # Errors
	///
	/// The reader runs out of bytes
	pub fn read_u16<R>(self, reader: &mut R) -> std::io::Result<u16>
	where
		R: Read + ?Sized,
	{
		match self {
			Self::Little => reader.read_u16::<LittleEndian>(),
			Self::Big => reader.read_u16::<BigEndian>(),
		}
	}

	/// Read a `u32` in this byte order
	///
	/// # Errors
	///
	/// The reader runs out of bytes
	pub fn read_u32<R>(self, reader: &mut R) -> std::io::Result<u32>
	where
		R: Read + ?Sized,
	{
		match self {
			Self::Little => reader.read_u32::<LittleEndian>(),
			Self::Big => reader.read_u32::<BigEndian>(),
		}
	}

	/// Read a `u64` in this byte order
	///
	/// # Errors
	///
	/// The reader runs out of bytes
	pub fn read_u64<R>(self, reader: &mut R) -> std::io::Result<u64>
	where
		R: Read + ?Sized,
	{
		match self {
			Self::Little => reader.read_u64::<LittleEndian>(),
			Self::Big => reader.read_u64::<BigEndian>(),
		}
	}

	/// Write a `u16` in this byte order
	///
	/// # Errors
	///
	/// The writer rejects the bytes
	pub fn write_u16<W>(self, writer: &mut W, value: u16) -> std::io::Result<()>
	where
		W: Write + ?Sized,
	{
		match self {
			Self::Little => writer.write_u16::<LittleEndian>(value),
			Self::Big => writer.write_u16::<BigEndian>(value),
		}
	}

	/// Write a `u32` in this byte order
	///
	/// # Errors
	///
	/// The writer rejects the bytes
	pub fn write_u32<W>(self, writer: &mut W, value: u32) -> std::io::Result<()>
	where
		W: Write + ?Sized,
	{
		match self {
			Self::Little => writer.write_u32::<LittleEndian>(value),
			Self::Big => writer.write_u32::<BigEndian>(value),
		}
	}

	/// Write a `u64` in this byte order
	///
	/// # Errors
	///
	/// The writer rejects the bytes
	pub fn write_u64<W>(self, writer: &mut W, value: u64) -> std::io::Result<()>
	where
		W: Write + ?Sized,
	{
		match self {
			Self::Little => writer.write_u64::<LittleEndian>(value),
			Self::Big => writer.write_u64::<BigEndian>(value),
		}
	}
}

/// A parsed RIFF container
///
/// Parsed once at construction and read-only afterward. Writing through
/// [`RiffFile::replace_chunk`] changes the file, not this value; re-parse to
/// observe the new bytes.
#[derive(Debug, PartialEq)]
pub struct RiffFile {
	path: Option<PathBuf>,
	format: RiffFormat,
	chunks: Vec<ChunkNode>,
}

impl RiffFile {
	/// Parse the file at `path` with the standard registry
	///
	/// # Errors
	///
	/// * The file cannot be opened or read
	/// * The file is not a supported RIFF container (see [`read_from`](Self::read_from))
	pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
		Self::read_from_path_with(path, &ChunkRegistry::standard())
	}

	/// Parse the file at `path`, dispatching through `registry`
	///
	/// # Errors
	///
	/// Same as [`read_from_path`](Self::read_from_path)
	pub fn read_from_path_with(path: impl AsRef<Path>, registry: &ChunkRegistry) -> Result<Self> {
		let path = path.as_ref();
		let mut file = std::fs::File::open(path)?;

		let (format, chunks) = read::parse_riff(&mut file, registry)?;
		Ok(Self {
			path: Some(path.to_path_buf()),
			format,
			chunks,
		})
	}

	/// Parse a bare byte source with the standard registry
	///
	/// A file parsed this way has no backing path, so the path-based
	/// [`replace_chunk`](Self::replace_chunk) is unavailable;
	/// [`replace_chunk_in`](Self::replace_chunk_in) still works.
	///
	/// # Errors
	///
	/// * The source does not start with a `RIFF`/`RIFX`/`RF64` tag
	///   ([`ErrorKind::MissingRiffHeader`](crate::error::ErrorKind::MissingRiffHeader))
	/// * The source is a `RIF2` container
	///   ([`ErrorKind::UnsupportedRif2`](crate::error::ErrorKind::UnsupportedRif2))
	/// * Any chunk fails to parse
	pub fn read_from<R>(reader: &mut R) -> Result<Self>
	where
		R: MediaSource,
	{
		Self::read_from_with(reader, &ChunkRegistry::standard())
	}

	/// Parse a bare byte source, dispatching through `registry`
	///
	/// # Errors
	///
	/// Same as [`read_from`](Self::read_from)
	pub fn read_from_with<R>(reader: &mut R, registry: &ChunkRegistry) -> Result<Self>
	where
		R: MediaSource,
	{
		let (format, chunks) = read::parse_riff(reader, registry)?;
		Ok(Self {
			path: None,
			format,
			chunks,
		})
	}

	/// The container format
	pub fn format(&self) -> RiffFormat {
		self.format
	}

	/// The backing path, when parsed from one
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// The root chunks, in file order
	pub fn chunks(&self) -> &[ChunkNode] {
		&self.chunks
	}

	/// Overwrite `chunk`'s payload in the backing file, same size only
	///
	/// `payload` replaces the usable data region excluding the
	/// sub-identifier (for container-kind chunks) and the pad byte, and must
	/// match its length exactly. The file never grows or shrinks.
	///
	/// # Errors
	///
	/// * The file was parsed from a bare reader
	///   ([`ErrorKind::NoBackingFile`](crate::error::ErrorKind::NoBackingFile))
	/// * Any of the validation failures of
	///   [`replace_chunk_in`](Self::replace_chunk_in)
	pub fn replace_chunk(&self, chunk: &ChunkNode, payload: &[u8]) -> Result<()> {
		let Some(path) = &self.path else {
			err!(NoBackingFile);
		};

		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.replace_chunk_in(&mut file, chunk, payload)
	}

	/// Overwrite `chunk`'s payload in a caller-supplied handle
	///
	/// All validation happens before the first byte is written; on error the
	/// destination is untouched.
	///
	/// # Errors
	///
	/// * The chunk on disk no longer matches the parsed node
	///   ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
	/// * `payload` does not match the replaceable region's length exactly
	///   ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
	/// * The destination ends before the chunk does
	///   ([`ErrorKind::FileTooSmall`](crate::error::ErrorKind::FileTooSmall))
	pub fn replace_chunk_in<F>(&self, file: &mut F, chunk: &ChunkNode, payload: &[u8]) -> Result<()>
	where
		F: FileLike,
	{
		write::replace_chunk(file, self.format.endianness(), chunk, payload)
	}
}
