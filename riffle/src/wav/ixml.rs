use crate::chunk::{ChunkDescriptor, ChunkNode, ChunkReader, ChunkRegistry};
use crate::error::Result;
use crate::macros::try_vec;
use crate::riff::Endianness;
use crate::util::io::MediaSource;

use std::io::Read;

/// The decoded payload of an `iXML` chunk
///
/// The payload is production metadata as XML text. No XML parsing happens
/// here; the text is carried as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IxmlMetadata {
	/// The XML document text
	pub xml: String,
}

/// Decode strategy turning `iXML` chunks into [`IxmlMetadata`] leaves
pub(crate) struct IxmlReader;

impl ChunkReader for IxmlReader {
	fn read_chunk(
		&self,
		reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		_endianness: Endianness,
		_registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		let data_range = descriptor.data_range.map(|range| range.usable);

		let xml = match data_range {
			Some(range) => {
				let mut data = try_vec![0; range.len() as usize];
				reader.read_exact(&mut data)?;
				String::from_utf8_lossy(&data).into_owned()
			},
			None => String::new(),
		};

		Ok(ChunkNode::Leaf {
			id: descriptor.id,
			chunk_range: descriptor.chunk_range,
			data_range,
			metadata: Box::new(IxmlMetadata { xml }),
		})
	}
}
