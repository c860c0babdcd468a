use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkRegistry};
use crate::error::Result;
use crate::macros::err;
use crate::riff::{Endianness, RiffFormat};
use crate::util::io::{MediaSource, SeekStreamLen};

use std::io::{Read, Seek, SeekFrom};

/// Parse an entire container from the reader's current position
///
/// The leading tag decides the format and byte order; the source is then
/// rewound and every root chunk is dispatched through the registry.
pub(crate) fn parse_riff<R>(
	reader: &mut R,
	registry: &ChunkRegistry,
) -> Result<(RiffFormat, Vec<ChunkNode>)>
where
	R: MediaSource,
{
	let start = reader.stream_position()?;

	let mut tag = [0; 4];
	if reader.read_exact(&mut tag).is_err() {
		err!(MissingRiffHeader);
	}

	let Some(format) = RiffFormat::from_tag(tag) else {
		err!(MissingRiffHeader);
	};

	// RIF2 moves chunk sizes to a 64-bit scheme this parser does not speak.
	// Treating it as plain RIFF would misread every length field.
	if format == RiffFormat::Rif2 {
		err!(UnsupportedRif2);
	}

	log::debug!("Parsing {format:?} container");

	let endianness = format.endianness();
	let len = reader.stream_len_hack()?;
	reader.seek(SeekFrom::Start(start))?;

	let mut chunks = Vec::new();
	let mut offset = start;
	while offset < len {
		let chunk = parse_chunk(reader, endianness, registry)?;
		offset = chunk.chunk_range().end + 1;
		chunks.push(chunk);
	}

	Ok((format, chunks))
}

/// Parse one chunk at the reader's current position and dispatch it
///
/// Unregistered identifiers become [`ChunkNode::Generic`] without their
/// payload ever being read. The reader is left one byte past the chunk,
/// whatever the dispatched strategy did with it.
pub(crate) fn parse_chunk(
	reader: &mut dyn MediaSource,
	endianness: Endianness,
	registry: &ChunkRegistry,
) -> Result<ChunkNode> {
	let descriptor = ChunkDescriptor::read(reader, endianness, registry)?;
	let resume = descriptor.chunk_range.end + 1;

	let node = match registry.reader_for(descriptor.id) {
		Some(strategy) => {
			// Strategies expect the cursor at the first payload byte past
			// any sub-identifier
			if let Some(data_range) = descriptor.data_range {
				let payload_start = if descriptor.sub_id.is_some() {
					data_range.usable.start + 4
				} else {
					data_range.usable.start
				};
				reader.seek(SeekFrom::Start(payload_start))?;
			}

			strategy.read_chunk(reader, &descriptor, endianness, registry)?
		},
		None => {
			log::debug!("Keeping unregistered chunk {} generic", descriptor.id);

			ChunkNode::Generic {
				id: descriptor.id,
				chunk_range: descriptor.chunk_range,
				data_range: descriptor.data_range.map(|range| range.usable),
			}
		},
	};

	reader.seek(SeekFrom::Start(resume))?;
	Ok(node)
}

/// Parse a container's children, starting at `start` (the byte right after
/// the sub-identifier)
///
/// Children are appended in strict file order; repeated sibling identifiers
/// are all kept. The loop stops once the cursor reaches the parent's final
/// byte, so a lone trailing pad byte stays unclaimed rather than being
/// mistaken for a child.
pub(crate) fn parse_subchunks(
	reader: &mut dyn MediaSource,
	start: u64,
	parent_end: u64,
	endianness: Endianness,
	registry: &ChunkRegistry,
) -> Result<Vec<ChunkNode>> {
	reader.seek(SeekFrom::Start(start))?;

	let mut children = Vec::new();
	let mut offset = start;
	while offset < parent_end {
		let child = parse_chunk(reader, endianness, registry)?;
		offset = child.chunk_range().end + 1;
		children.push(child);
	}

	Ok(children)
}
