use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkReader, ChunkRegistry};
use crate::error::Result;
use crate::riff::Endianness;
use crate::util::io::MediaSource;

/// The decoded payload of a `data` chunk
///
/// Samples are never decoded; the only thing recorded is how many payload
/// bytes there are. The bytes themselves stay on disk, addressable through
/// the node's data range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataMetadata {
	/// Number of sample payload bytes, excluding any pad byte
	pub byte_length: u64,
}

/// Decode strategy turning `data` chunks into [`DataMetadata`] leaves
/// without touching the sample bytes
pub(crate) struct DataReader;

impl ChunkReader for DataReader {
	fn read_chunk(
		&self,
		_reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		_endianness: Endianness,
		_registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		let data_range = descriptor.data_range.map(|range| range.usable);

		Ok(ChunkNode::Leaf {
			id: descriptor.id,
			chunk_range: descriptor.chunk_range,
			data_range,
			metadata: Box::new(DataMetadata {
				byte_length: data_range.map_or(0, |range| range.len()),
			}),
		})
	}
}
