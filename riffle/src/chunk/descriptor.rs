use crate::chunk::{ByteRange, ChunkId, ChunkRegistry};
use crate::error::{ErrorKind, Result, RiffError};
use crate::riff::Endianness;

use std::io::{Read, Seek, SeekFrom};

/// Byte ranges of a chunk's data region
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataRange {
	/// The real payload bytes, excluding the implicit pad byte
	///
	/// For container-kind chunks the leading 4-byte sub-identifier is still part
	/// of this range; callers wanting the first child byte must skip 4 more.
	pub usable: ByteRange,
	/// The payload as encoded on disk
	///
	/// Equal to `usable` widened by one trailing byte when the declared length is
	/// odd, since every chunk must start on an even file offset.
	pub encoded: ByteRange,
}

/// Lightweight descriptor for a chunk: its identity and byte ranges
///
/// Descriptors are ephemeral. One is computed fresh for every parse step and
/// again by the writer's pre-write re-validation; none is ever mutated after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDescriptor {
	/// The chunk identifier
	pub id: ChunkId,
	/// The sub-identifier, present only for container-kind chunks
	pub sub_id: Option<ChunkId>,
	/// The payload length declared in the chunk header
	pub len: u32,
	/// The whole chunk: 8-byte header through the padded payload end
	pub chunk_range: ByteRange,
	/// The payload ranges, absent when the declared length is 0
	pub data_range: Option<DataRange>,
}

impl ChunkDescriptor {
	/// Scan the chunk starting at the reader's current position
	///
	/// On success the reader is left exactly one byte past `chunk_range.end`,
	/// ready for the next sibling. Whether a 4-byte sub-identifier is consumed
	/// from the data region is decided by the registry's container-kind test,
	/// not by a hardcoded identifier list.
	///
	/// A declared length running past the end of the underlying source is not
	/// detected here; it surfaces as a read failure once the payload or children
	/// are actually fetched.
	///
	/// # Errors
	///
	/// * The identifier is unreadable or invalid ([`ErrorKind::InvalidChunkId`])
	/// * The length field is unreadable ([`ErrorKind::InvalidChunkLength`])
	/// * A container-kind chunk ends before its sub-identifier ([`ErrorKind::MissingSubId`])
	pub fn read<R>(reader: &mut R, endianness: Endianness, registry: &ChunkRegistry) -> Result<Self>
	where
		R: Read + Seek + ?Sized,
	{
		let start = reader.stream_position()?;

		let mut id_bytes = [0; 4];
		if reader.read_exact(&mut id_bytes).is_err() {
			return Err(RiffError::new(ErrorKind::InvalidChunkId(None)));
		}

		let id = ChunkId::new(id_bytes);
		if !id.is_valid() {
			return Err(RiffError::new(ErrorKind::InvalidChunkId(Some(
				id.as_str().into_owned(),
			))));
		}

		let len = endianness
			.read_u32(reader)
			.map_err(|_| RiffError::new(ErrorKind::InvalidChunkLength(id.as_str().into_owned())))?;

		let data_start = reader.stream_position()?;

		let usable = (len > 0).then(|| ByteRange::new(data_start, data_start + u64::from(len) - 1));
		// Odd payloads are padded with one trailing byte to keep chunks word-aligned
		let encoded = usable.map(|range| ByteRange::new(range.start, range.end + u64::from(len % 2)));

		let encoded_len = encoded.map_or(0, |range| range.len());
		let chunk_range = ByteRange::new(start, start + 8 + encoded_len - 1);

		let sub_id = if registry.is_container(id) {
			// Container kinds carry a 4-byte sub-identifier as the first four
			// bytes of their data region
			let mut sub_id_bytes = [0; 4];
			reader
				.read_exact(&mut sub_id_bytes)
				.map_err(|_| RiffError::new(ErrorKind::MissingSubId(id.as_str().into_owned())))?;

			Some(ChunkId::new(sub_id_bytes))
		} else {
			None
		};

		reader.seek(SeekFrom::Start(chunk_range.end + 1))?;

		Ok(Self {
			id,
			sub_id,
			len,
			chunk_range,
			data_range: usable
				.zip(encoded)
				.map(|(usable, encoded)| DataRange { usable, encoded }),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::ChunkDescriptor;
	use crate::chunk::ChunkRegistry;
	use crate::riff::Endianness;

	use std::io::Cursor;

	fn chunk_bytes(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(id);
		bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
		bytes.extend_from_slice(payload);
		if payload.len() % 2 != 0 {
			bytes.push(0);
		}
		bytes
	}

	#[test_log::test]
	fn range_arithmetic() {
		let registry = ChunkRegistry::standard();

		for len in [1usize, 2, 3, 15, 16, 17, 255, 256] {
			let payload = vec![0xAB; len];
			let bytes = chunk_bytes(b"test", &payload);
			let mut reader = Cursor::new(bytes);

			let descriptor =
				ChunkDescriptor::read(&mut reader, Endianness::Little, &registry).unwrap();

			let padded = (len + (len % 2)) as u64;
			assert_eq!(descriptor.len, len as u32);
			assert_eq!(descriptor.chunk_range.len(), 8 + padded);

			let data_range = descriptor.data_range.unwrap();
			assert_eq!(data_range.usable.len(), len as u64);
			assert_eq!(data_range.encoded.len(), padded);
			assert_eq!(data_range.usable.start, 8);

			// The cursor must land one byte past the padded chunk end
			assert_eq!(reader.position(), descriptor.chunk_range.end + 1);
		}
	}

	#[test_log::test]
	fn zero_length_chunk_has_no_data_range() {
		let registry = ChunkRegistry::standard();
		let mut reader = Cursor::new(chunk_bytes(b"JUNK", &[]));

		let descriptor = ChunkDescriptor::read(&mut reader, Endianness::Little, &registry).unwrap();

		assert!(descriptor.data_range.is_none());
		assert_eq!(descriptor.chunk_range.len(), 8);
	}

	#[test_log::test]
	fn container_kind_consumes_sub_id() {
		let registry = ChunkRegistry::standard();

		let mut payload = b"INFO".to_vec();
		payload.extend_from_slice(&chunk_bytes(b"IART", b"an artist\0"));
		let mut reader = Cursor::new(chunk_bytes(b"LIST", &payload));

		let descriptor = ChunkDescriptor::read(&mut reader, Endianness::Little, &registry).unwrap();

		assert_eq!(descriptor.sub_id.unwrap(), *b"INFO");
		// The sub-identifier is still counted as payload
		assert_eq!(
			descriptor.data_range.unwrap().usable.len(),
			payload.len() as u64
		);
	}

	#[test_log::test]
	fn big_endian_length_field() {
		let registry = ChunkRegistry::standard();

		let mut bytes = b"test".to_vec();
		bytes.extend_from_slice(&6u32.to_be_bytes());
		bytes.extend_from_slice(&[0; 6]);
		let mut reader = Cursor::new(bytes);

		let descriptor = ChunkDescriptor::read(&mut reader, Endianness::Big, &registry).unwrap();
		assert_eq!(descriptor.len, 6);
	}

	#[test_log::test]
	fn rejects_invalid_identifier() {
		let registry = ChunkRegistry::standard();
		let mut reader = Cursor::new(chunk_bytes(&[b'f', b'm', b't', 0], &[0; 4]));

		assert!(ChunkDescriptor::read(&mut reader, Endianness::Little, &registry).is_err());
	}
}
