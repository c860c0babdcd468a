//! The WAV layer: typed decoders for `fmt `, `data`, `bext`, and `iXML`
//! chunks, and a file wrapper wiring them into the registry

mod bext;
mod data;
mod fmt;
mod ixml;

pub use bext::BextMetadata;
pub use data::DataMetadata;
pub use fmt::{FmtMetadata, WavEncoding};
pub use ixml::IxmlMetadata;

use crate::chunk::{ChunkId, ChunkNode, ChunkReader, ChunkRegistry, ChunksExt};
use crate::error::Result;
use crate::macros::err;
use crate::riff::RiffFile;
use crate::util::io::MediaSource;

use std::path::Path;

/// A RIFF container parsed with the WAV chunk decoders registered
///
/// Thin wrapper over [`RiffFile`]: the chunk tree is the same, but `fmt `,
/// `data`, `bext`, and `iXML` chunks come out as typed leaves. Queries for
/// absent chunks answer [`None`] rather than failing; only the write helpers
/// treat a missing target chunk as an error.
///
/// ```rust,no_run
/// use riffle::wav::WavFile;
///
/// # fn main() -> riffle::error::Result<()> {
/// let wav = WavFile::read_from_path("recording.wav")?;
/// if let Some(fmt) = wav.fmt() {
/// 	println!("{} ch @ {} Hz", fmt.channels, fmt.sample_rate);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct WavFile {
	riff: RiffFile,
}

impl WavFile {
	/// The standard registry extended with the WAV leaf decoders
	///
	/// Exposed so callers can merge their own strategies on top and parse
	/// through [`RiffFile::read_from_with`] directly.
	#[must_use]
	pub fn registry() -> ChunkRegistry {
		ChunkRegistry::standard_with([
			(ChunkId::FMT, Box::new(fmt::FmtReader) as Box<dyn ChunkReader>),
			(ChunkId::DATA, Box::new(data::DataReader) as Box<dyn ChunkReader>),
			(ChunkId::BEXT, Box::new(bext::BextReader) as Box<dyn ChunkReader>),
			(ChunkId::IXML, Box::new(ixml::IxmlReader) as Box<dyn ChunkReader>),
		])
	}

	/// Parse the file at `path`
	///
	/// # Errors
	///
	/// Same as [`RiffFile::read_from_path`]
	pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self {
			riff: RiffFile::read_from_path_with(path, &Self::registry())?,
		})
	}

	/// Parse a bare byte source
	///
	/// The result has no backing path, so the write helpers will answer
	/// [`ErrorKind::NoBackingFile`](crate::error::ErrorKind::NoBackingFile).
	///
	/// # Errors
	///
	/// Same as [`RiffFile::read_from`]
	pub fn read_from<R>(reader: &mut R) -> Result<Self>
	where
		R: MediaSource,
	{
		Ok(Self {
			riff: RiffFile::read_from_with(reader, &Self::registry())?,
		})
	}

	/// The underlying container
	pub fn riff(&self) -> &RiffFile {
		&self.riff
	}

	/// The first chunk matching `id` among the root containers' children
	pub fn chunk(&self, id: ChunkId) -> Option<&ChunkNode> {
		self.riff
			.chunks()
			.iter()
			.filter_map(ChunkNode::children)
			.find_map(|children| children.first_id(id))
	}

	/// The decoded `fmt ` chunk, if the file has one
	pub fn fmt(&self) -> Option<&FmtMetadata> {
		self.chunk(ChunkId::FMT)?.metadata_as()
	}

	/// The decoded `data` chunk, if the file has one
	pub fn data(&self) -> Option<&DataMetadata> {
		self.chunk(ChunkId::DATA)?.metadata_as()
	}

	/// The decoded `bext` chunk, if the file has one
	pub fn bext(&self) -> Option<&BextMetadata> {
		self.chunk(ChunkId::BEXT)?.metadata_as()
	}

	/// The decoded `iXML` chunk, if the file has one
	pub fn ixml(&self) -> Option<&IxmlMetadata> {
		self.chunk(ChunkId::IXML)?.metadata_as()
	}

	/// Encode `metadata` and overwrite the `fmt ` chunk in place
	///
	/// The encoded payload must match the existing chunk's size exactly,
	/// extra bytes included; see
	/// [`RiffFile::replace_chunk`] for the validation rules.
	///
	/// # Errors
	///
	/// * The file has no `fmt ` chunk
	///   ([`ErrorKind::MissingChunk`](crate::error::ErrorKind::MissingChunk))
	/// * Any failure of [`RiffFile::replace_chunk`]
	pub fn write_fmt(&self, metadata: &FmtMetadata) -> Result<()> {
		let Some(chunk) = self.chunk(ChunkId::FMT) else {
			err!(MissingChunk("fmt "));
		};

		let payload = metadata.encode(self.riff.format().endianness())?;
		self.riff.replace_chunk(chunk, &payload)
	}

	/// Overwrite the `data` chunk's sample bytes in place, same size only
	///
	/// # Errors
	///
	/// * The file has no `data` chunk
	///   ([`ErrorKind::MissingChunk`](crate::error::ErrorKind::MissingChunk))
	/// * Any failure of [`RiffFile::replace_chunk`]
	pub fn write_data(&self, bytes: &[u8]) -> Result<()> {
		let Some(chunk) = self.chunk(ChunkId::DATA) else {
			err!(MissingChunk("data"));
		};

		self.riff.replace_chunk(chunk, bytes)
	}

	/// Encode `metadata` and overwrite the `bext` chunk in place
	///
	/// # Errors
	///
	/// * The file has no `bext` chunk
	///   ([`ErrorKind::MissingChunk`](crate::error::ErrorKind::MissingChunk))
	/// * Any failure of [`RiffFile::replace_chunk`]
	pub fn write_bext(&self, metadata: &BextMetadata) -> Result<()> {
		let Some(chunk) = self.chunk(ChunkId::BEXT) else {
			err!(MissingChunk("bext"));
		};

		let payload = metadata.encode(self.riff.format().endianness())?;
		self.riff.replace_chunk(chunk, &payload)
	}
}
