use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkRegistry};
use crate::error::Result;
use crate::macros::err;
use crate::riff::Endianness;
use crate::util::io::{FileLike, Length};

use std::io::{Seek, SeekFrom, Write};

/// Overwrite `chunk`'s payload in place, same size only
///
/// The file layout never changes: chunks are never grown, shrunk, or moved,
/// since resizing one chunk would mean shifting every byte after it. The
/// header and sub-identifier are rewritten alongside the payload as one
/// contiguous write; the trailing pad byte (if any) is left untouched.
///
/// Validation order, all of it before the first byte is written:
///
/// 1. A fresh descriptor is re-read at `chunk`'s recorded start, defending
///    against a file that changed since the parse
/// 2. The fresh descriptor's total size must equal the node's
/// 3. `payload` must exactly match the replaceable region (the usable data
///    minus the sub-identifier, when one is present)
/// 4. The identifier (and sub-identifier) being written back must be valid
/// 5. The destination must extend through the chunk's final byte
///
/// A failure during the write itself is surfaced as-is; whether partial
/// writes are visible is up to the destination.
pub(crate) fn replace_chunk<F>(
	file: &mut F,
	endianness: Endianness,
	chunk: &ChunkNode,
	payload: &[u8],
) -> Result<()>
where
	F: FileLike,
{
	let chunk_range = chunk.chunk_range();

	file.seek(SeekFrom::Start(chunk_range.start))?;

	// The registry only influences whether a sub-identifier is consumed,
	// which the total range does not depend on; the node itself knows
	// whether it carries one.
	let fresh = ChunkDescriptor::read(file, endianness, &ChunkRegistry::standard())?;
	if fresh.chunk_range.len() != chunk_range.len() {
		err!(SizeMismatch);
	}

	// The caller never supplies the sub-identifier bytes
	let expected = chunk
		.data_range_excluding_sub_id()
		.map_or(0, |range| range.len());
	if payload.len() as u64 != expected {
		err!(SizeMismatch);
	}

	if !chunk.id().is_valid() {
		err!(InvalidWriteId);
	}

	let sub_id = chunk.sub_id();
	if let Some(sub_id) = sub_id {
		if !sub_id.is_valid() {
			err!(InvalidWriteSubId);
		}
	}

	let file_len = file.len().map_err(Into::into)?;
	if file_len < chunk_range.end + 1 {
		err!(FileTooSmall);
	}

	log::debug!(
		"Replacing {} byte payload of chunk {} at offset {}",
		payload.len(),
		chunk.id(),
		chunk_range.start
	);

	// The length field comes from the node itself, not the on-disk header:
	// two declared lengths can share one total range (an odd length plus its
	// pad), and the payload was validated against the node
	let declared_len = chunk.data_range().map_or(0, |range| range.len()) as u32;

	let mut bytes = Vec::with_capacity(8 + 4 + payload.len());
	bytes.extend_from_slice(&chunk.id().as_bytes());
	endianness.write_u32(&mut bytes, declared_len)?;
	if let Some(sub_id) = sub_id {
		bytes.extend_from_slice(&sub_id.as_bytes());
	}
	bytes.extend_from_slice(payload);

	file.seek(SeekFrom::Start(chunk_range.start))?;
	file.write_all(&bytes)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::replace_chunk;
	use crate::chunk::{ByteRange, ChunkNode};
	use crate::error::ErrorKind;
	use crate::riff::Endianness;

	use std::io::Cursor;

	fn file_bytes() -> Vec<u8> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"RIFF");
		bytes.extend_from_slice(&16u32.to_le_bytes());
		bytes.extend_from_slice(b"WAVE");
		bytes.extend_from_slice(b"test");
		bytes.extend_from_slice(&3u32.to_le_bytes());
		bytes.extend_from_slice(&[0x01, 0x02, 0x03, 0x00]);
		bytes
	}

	fn leaf() -> ChunkNode {
		ChunkNode::Generic {
			id: crate::chunk::ChunkId::new(*b"test"),
			chunk_range: ByteRange::new(12, 23),
			data_range: Some(ByteRange::new(20, 22)),
		}
	}

	#[test_log::test]
	fn same_size_write_leaves_pad_alone() {
		let mut file = Cursor::new(file_bytes());

		replace_chunk(&mut file, Endianness::Little, &leaf(), &[0xAA, 0xBB, 0xCC]).unwrap();

		let bytes = file.into_inner();
		assert_eq!(&bytes[20..23], &[0xAA, 0xBB, 0xCC]);
		// Header and pad byte untouched
		assert_eq!(&bytes[12..16], b"test");
		assert_eq!(bytes[23], 0x00);
	}

	#[test_log::test]
	fn wrong_size_write_mutates_nothing() {
		let original = file_bytes();
		let mut file = Cursor::new(original.clone());

		let err = replace_chunk(&mut file, Endianness::Little, &leaf(), &[0xAA, 0xBB])
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::SizeMismatch));
		assert_eq!(file.into_inner(), original);
	}

	#[test_log::test]
	fn rewrite_restores_parsed_length_field() {
		// Length 4 spans the same total range as length 3 plus its pad byte,
		// so the size gate passes; the rewritten header must carry the node's
		// length, not the altered on-disk value
		let mut bytes = file_bytes();
		bytes[16..20].copy_from_slice(&4u32.to_le_bytes());
		let mut file = Cursor::new(bytes);

		replace_chunk(&mut file, Endianness::Little, &leaf(), &[0xAA, 0xBB, 0xCC]).unwrap();

		let bytes = file.into_inner();
		assert_eq!(&bytes[16..20], &3u32.to_le_bytes());
		assert_eq!(&bytes[20..23], &[0xAA, 0xBB, 0xCC]);
	}

	#[test_log::test]
	fn truncated_destination_mutates_nothing() {
		let mut truncated = file_bytes();
		truncated.truncate(22);
		let mut file = Cursor::new(truncated.clone());

		let err = replace_chunk(&mut file, Endianness::Little, &leaf(), &[0xAA, 0xBB, 0xCC])
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::FileTooSmall));
		assert_eq!(file.into_inner(), truncated);
	}
}
