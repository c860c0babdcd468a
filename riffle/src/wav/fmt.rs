use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkReader, ChunkRegistry};
use crate::error::Result;
use crate::macros::{decode_err, try_vec};
use crate::riff::Endianness;
use crate::util::io::MediaSource;

use std::io::{Cursor, Read};

const PCM: u16 = 1;
const IEEE_FLOAT: u16 = 3;
const EXTENSIBLE: u16 = 0xFFFE;

/// The audio encoding declared by a `fmt ` chunk
///
/// Only the handful of encodings this layer needs to distinguish get their
/// own variant; everything else is carried through untouched as
/// [`WavEncoding::Other`]. There is deliberately no registry of codec
/// identifiers here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WavEncoding {
	/// Integer PCM (1)
	Pcm,
	/// IEEE float PCM (3)
	IeeeFloat,
	/// `WAVE_FORMAT_EXTENSIBLE` (0xFFFE)
	Extensible,
	/// Any other encoding identifier
	Other(u16),
}

impl WavEncoding {
	fn from_u16(value: u16) -> Self {
		match value {
			PCM => Self::Pcm,
			IEEE_FLOAT => Self::IeeeFloat,
			EXTENSIBLE => Self::Extensible,
			other => Self::Other(other),
		}
	}

	fn as_u16(self) -> u16 {
		match self {
			Self::Pcm => PCM,
			Self::IeeeFloat => IEEE_FLOAT,
			Self::Extensible => EXTENSIBLE,
			Self::Other(other) => other,
		}
	}
}

/// The decoded payload of a `fmt ` chunk
///
/// Bytes-per-second and block alignment are absent on purpose: both are
/// derived from the other fields and recomputed on encode, so storing them
/// would only invite disagreement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FmtMetadata {
	/// The audio encoding
	pub encoding: WavEncoding,
	/// Channel count
	pub channels: u16,
	/// Samples per second, per channel
	pub sample_rate: u32,
	/// Bits per sample
	pub bit_depth: u16,
	/// Bytes past the 16 byte base layout, preserved verbatim
	///
	/// Non-PCM encodings commonly append an extension block here. It is
	/// never interpreted, only carried through for round-trip fidelity.
	pub extra: Option<Vec<u8>>,
}

impl FmtMetadata {
	/// Decode a `fmt ` payload
	///
	/// # Errors
	///
	/// The payload is shorter than the 16 byte base layout
	pub fn decode(data: &[u8], endianness: Endianness) -> Result<Self> {
		if data.len() < 16 {
			decode_err!(@BAIL "fmt ", "Payload is shorter than the 16 byte base layout");
		}

		let mut reader = Cursor::new(data);

		let encoding = WavEncoding::from_u16(endianness.read_u16(&mut reader)?);
		let channels = endianness.read_u16(&mut reader)?;
		let sample_rate = endianness.read_u32(&mut reader)?;

		// Bytes-per-second and block alignment are derived fields; whatever
		// the file declares is ignored rather than validated
		let _avg_bytes_per_sec = endianness.read_u32(&mut reader)?;
		let _block_align = endianness.read_u16(&mut reader)?;

		let bit_depth = endianness.read_u16(&mut reader)?;

		let extra = (data.len() > 16).then(|| data[16..].to_vec());

		Ok(Self {
			encoding,
			channels,
			sample_rate,
			bit_depth,
			extra,
		})
	}

	/// Encode the payload, recomputing the derived fields
	///
	/// # Errors
	///
	/// Never fails in practice; the only write target is a growable buffer
	pub fn encode(&self, endianness: Endianness) -> Result<Vec<u8>> {
		let extra_len = self.extra.as_ref().map_or(0, Vec::len);
		let mut bytes = Vec::with_capacity(16 + extra_len);

		// Widen before dividing: sub-byte bit depths (ex. 12-bit) would
		// otherwise truncate to a wrong alignment, and large decoded values
		// would overflow the narrow types
		let block_align = ((u32::from(self.bit_depth) * u32::from(self.channels)) / 8) as u16;
		let bytes_per_sec = ((u64::from(self.sample_rate)
			* u64::from(self.bit_depth)
			* u64::from(self.channels))
			/ 8) as u32;

		endianness.write_u16(&mut bytes, self.encoding.as_u16())?;
		endianness.write_u16(&mut bytes, self.channels)?;
		endianness.write_u32(&mut bytes, self.sample_rate)?;
		endianness.write_u32(&mut bytes, bytes_per_sec)?;
		endianness.write_u16(&mut bytes, block_align)?;
		endianness.write_u16(&mut bytes, self.bit_depth)?;
		if let Some(extra) = &self.extra {
			bytes.extend_from_slice(extra);
		}

		Ok(bytes)
	}
}

/// Decode strategy turning `fmt ` chunks into [`FmtMetadata`] leaves
pub(crate) struct FmtReader;

impl ChunkReader for FmtReader {
	fn read_chunk(
		&self,
		reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		endianness: Endianness,
		_registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		let Some(data_range) = descriptor.data_range else {
			decode_err!(@BAIL "fmt ", "Payload is shorter than the 16 byte base layout");
		};

		let mut data = try_vec![0; data_range.usable.len() as usize];
		reader.read_exact(&mut data)?;

		let metadata = FmtMetadata::decode(&data, endianness)?;

		Ok(ChunkNode::Leaf {
			id: descriptor.id,
			chunk_range: descriptor.chunk_range,
			data_range: Some(data_range.usable),
			metadata: Box::new(metadata),
		})
	}
}
