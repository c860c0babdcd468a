use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkReader, ChunkRegistry};
use crate::error::Result;
use crate::macros::{decode_err, try_vec};
use crate::riff::Endianness;
use crate::util::io::MediaSource;

use std::borrow::Cow;
use std::io::{Cursor, Read};

/// Size of the fixed portion of the record, everything before the coding
/// history
const BEXT_FIXED_SIZE: usize = 602;

/// The decoded payload of a `bext` (Broadcast Wave extension) chunk
///
/// The record is a fixed 602 byte layout followed by a variable-length
/// coding history. Fixed-width text fields keep their raw padded bytes: the
/// text accessors trim trailing NULs for display, but encoding always emits
/// the stored bytes verbatim, so a round trip reproduces the original
/// padding pattern even when it was not NUL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BextMetadata {
	/// Free description of the sound sequence, 256 bytes
	pub description: [u8; 256],
	/// Name of the originator, 32 bytes
	pub originator: [u8; 32],
	/// Unambiguous reference assigned by the originator, 32 bytes
	pub originator_reference: [u8; 32],
	/// Origination date as `yyyy-mm-dd`, 10 bytes
	pub origination_date: [u8; 10],
	/// Origination time as `hh:mm:ss`, 8 bytes
	pub origination_time: [u8; 8],
	/// First sample count since midnight
	pub time_reference: u64,
	/// BWF version
	pub version: u16,
	/// SMPTE UMID, 64 bytes
	pub umid: [u8; 64],
	/// Integrated loudness value
	pub loudness_value: u16,
	/// Loudness range
	pub loudness_range: u16,
	/// Maximum true peak level
	pub max_true_peak: u16,
	/// Highest value of the momentary loudness level
	pub max_momentary_loudness: u16,
	/// Highest value of the short-term loudness level
	pub max_short_term_loudness: u16,
	/// Reserved for extensions, 180 bytes
	pub reserved: [u8; 180],
	/// Coding history text, everything past the fixed record
	pub coding_history: Vec<u8>,
}

impl BextMetadata {
	/// Decode a `bext` payload
	///
	/// # Errors
	///
	/// The payload is shorter than the fixed 602 byte record
	pub fn decode(data: &[u8], endianness: Endianness) -> Result<Self> {
		if data.len() < BEXT_FIXED_SIZE {
			decode_err!(@BAIL "bext", "Payload is shorter than the fixed 602 byte record");
		}

		let mut reader = Cursor::new(data);

		let mut description = [0; 256];
		reader.read_exact(&mut description)?;

		let mut originator = [0; 32];
		reader.read_exact(&mut originator)?;

		let mut originator_reference = [0; 32];
		reader.read_exact(&mut originator_reference)?;

		let mut origination_date = [0; 10];
		reader.read_exact(&mut origination_date)?;

		let mut origination_time = [0; 8];
		reader.read_exact(&mut origination_time)?;

		let time_reference = endianness.read_u64(&mut reader)?;
		let version = endianness.read_u16(&mut reader)?;

		let mut umid = [0; 64];
		reader.read_exact(&mut umid)?;

		let loudness_value = endianness.read_u16(&mut reader)?;
		let loudness_range = endianness.read_u16(&mut reader)?;
		let max_true_peak = endianness.read_u16(&mut reader)?;
		let max_momentary_loudness = endianness.read_u16(&mut reader)?;
		let max_short_term_loudness = endianness.read_u16(&mut reader)?;

		let mut reserved = [0; 180];
		reader.read_exact(&mut reserved)?;

		let coding_history = data[BEXT_FIXED_SIZE..].to_vec();

		Ok(Self {
			description,
			originator,
			originator_reference,
			origination_date,
			origination_time,
			time_reference,
			version,
			umid,
			loudness_value,
			loudness_range,
			max_true_peak,
			max_momentary_loudness,
			max_short_term_loudness,
			reserved,
			coding_history,
		})
	}

	/// Encode the record, fixed bytes emitted verbatim
	///
	/// # Errors
	///
	/// Never fails in practice; the only write target is a growable buffer
	pub fn encode(&self, endianness: Endianness) -> Result<Vec<u8>> {
		let mut bytes = Vec::with_capacity(BEXT_FIXED_SIZE + self.coding_history.len());

		bytes.extend_from_slice(&self.description);
		bytes.extend_from_slice(&self.originator);
		bytes.extend_from_slice(&self.originator_reference);
		bytes.extend_from_slice(&self.origination_date);
		bytes.extend_from_slice(&self.origination_time);
		endianness.write_u64(&mut bytes, self.time_reference)?;
		endianness.write_u16(&mut bytes, self.version)?;
		bytes.extend_from_slice(&self.umid);
		endianness.write_u16(&mut bytes, self.loudness_value)?;
		endianness.write_u16(&mut bytes, self.loudness_range)?;
		endianness.write_u16(&mut bytes, self.max_true_peak)?;
		endianness.write_u16(&mut bytes, self.max_momentary_loudness)?;
		endianness.write_u16(&mut bytes, self.max_short_term_loudness)?;
		bytes.extend_from_slice(&self.reserved);
		bytes.extend_from_slice(&self.coding_history);

		Ok(bytes)
	}

	/// The description with trailing NULs trimmed
	pub fn description_text(&self) -> Cow<'_, str> {
		trimmed_text(&self.description)
	}

	/// The originator with trailing NULs trimmed
	pub fn originator_text(&self) -> Cow<'_, str> {
		trimmed_text(&self.originator)
	}

	/// The originator reference with trailing NULs trimmed
	pub fn originator_reference_text(&self) -> Cow<'_, str> {
		trimmed_text(&self.originator_reference)
	}

	/// The origination date with trailing NULs trimmed
	pub fn origination_date_text(&self) -> Cow<'_, str> {
		trimmed_text(&self.origination_date)
	}

	/// The origination time with trailing NULs trimmed
	pub fn origination_time_text(&self) -> Cow<'_, str> {
		trimmed_text(&self.origination_time)
	}

	/// The coding history as text
	pub fn coding_history_text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.coding_history)
	}

	/// Set the description, truncated and NUL-padded to 256 bytes
	pub fn set_description(&mut self, text: &str) {
		set_fixed_text(&mut self.description, text);
	}

	/// Set the originator, truncated and NUL-padded to 32 bytes
	pub fn set_originator(&mut self, text: &str) {
		set_fixed_text(&mut self.originator, text);
	}

	/// Set the originator reference, truncated and NUL-padded to 32 bytes
	pub fn set_originator_reference(&mut self, text: &str) {
		set_fixed_text(&mut self.originator_reference, text);
	}
}

fn trimmed_text(bytes: &[u8]) -> Cow<'_, str> {
	let end = bytes
		.iter()
		.rposition(|&b| b != 0)
		.map_or(0, |position| position + 1);
	String::from_utf8_lossy(&bytes[..end])
}

fn set_fixed_text(dest: &mut [u8], text: &str) {
	dest.fill(0);
	let len = text.len().min(dest.len());
	dest[..len].copy_from_slice(&text.as_bytes()[..len]);
}

/// Decode strategy turning `bext` chunks into [`BextMetadata`] leaves
pub(crate) struct BextReader;

impl ChunkReader for BextReader {
	fn read_chunk(
		&self,
		reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		endianness: Endianness,
		_registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		let Some(data_range) = descriptor.data_range else {
			decode_err!(@BAIL "bext", "Payload is shorter than the fixed 602 byte record");
		};

		let mut data = try_vec![0; data_range.usable.len() as usize];
		reader.read_exact(&mut data)?;

		let metadata = BextMetadata::decode(&data, endianness)?;

		Ok(ChunkNode::Leaf {
			id: descriptor.id,
			chunk_range: descriptor.chunk_range,
			data_range: Some(data_range.usable),
			metadata: Box::new(metadata),
		})
	}
}
