use crate::chunk::{ByteRange, ChunkId};

use std::any::Any;
use std::fmt::Debug;

/// A decoded payload attached to a [`ChunkNode::Leaf`]
///
/// Typed leaf decoders (ex. the WAV layer's `fmt ` and `bext` decoders) box
/// their record behind this trait so the core tree never has to know every
/// possible leaf type at compile time.
///
/// Equality between two erased payloads is a full structural comparison: a
/// downcast to the concrete type followed by its `PartialEq`. Two payloads of
/// different concrete types are never equal.
///
/// The trait is blanket-implemented, so any `Debug + PartialEq + Send + Sync`
/// type qualifies without ceremony.
pub trait ChunkMetadata: Debug + Send + Sync {
	/// Upcast for downcasting to the concrete record type
	fn as_any(&self) -> &dyn Any;

	/// Structural equality against another erased payload
	fn eq_metadata(&self, other: &dyn ChunkMetadata) -> bool;
}

impl<T> ChunkMetadata for T
where
	T: Debug + PartialEq + Send + Sync + 'static,
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn eq_metadata(&self, other: &dyn ChunkMetadata) -> bool {
		other
			.as_any()
			.downcast_ref::<T>()
			.is_some_and(|other| self == other)
	}
}

/// A parsed chunk
///
/// The persisted result of one parse step. The set of shapes a chunk can take
/// is small and fixed (does it have a sub-identifier? children? a decoded
/// payload?), so the tree is a closed tagged variant rather than an open
/// class hierarchy; extensibility lives in the
/// [`ChunkRegistry`](crate::chunk::ChunkRegistry) instead.
///
/// Nodes are immutable once constructed and exclusively own their children.
/// Writing new data to the file never updates a node in place; re-parse to
/// observe the change.
#[derive(Debug)]
pub enum ChunkNode {
	/// A container-kind chunk (`RIFF`, `LIST`, or any registered container)
	Container {
		/// The chunk identifier
		id: ChunkId,
		/// The 4-byte sub-identifier leading the data region
		sub_id: ChunkId,
		/// The whole chunk on disk
		chunk_range: ByteRange,
		/// The usable payload (sub-identifier included)
		data_range: Option<ByteRange>,
		/// Child chunks, in strict file order
		children: Vec<ChunkNode>,
	},
	/// An `INFO` chunk
	///
	/// The key/value sub-structure is intentionally left unparsed.
	Info {
		/// The whole chunk on disk
		chunk_range: ByteRange,
		/// The usable payload
		data_range: Option<ByteRange>,
	},
	/// Any chunk with no registered decode strategy
	///
	/// Carries identity and ranges only; the payload is never interpreted,
	/// even if it happens to look chunk-like.
	Generic {
		/// The chunk identifier
		id: ChunkId,
		/// The whole chunk on disk
		chunk_range: ByteRange,
		/// The usable payload
		data_range: Option<ByteRange>,
	},
	/// A chunk with a registered typed decoder
	Leaf {
		/// The chunk identifier
		id: ChunkId,
		/// The whole chunk on disk
		chunk_range: ByteRange,
		/// The usable payload
		data_range: Option<ByteRange>,
		/// The decoded payload record
		metadata: Box<dyn ChunkMetadata>,
	},
}

impl ChunkNode {
	/// The chunk identifier
	pub fn id(&self) -> ChunkId {
		match self {
			Self::Container { id, .. } | Self::Generic { id, .. } | Self::Leaf { id, .. } => *id,
			Self::Info { .. } => ChunkId::INFO,
		}
	}

	/// The sub-identifier, for container nodes
	pub fn sub_id(&self) -> Option<ChunkId> {
		match self {
			Self::Container { sub_id, .. } => Some(*sub_id),
			_ => None,
		}
	}

	/// The byte range of the entire chunk, header through padded payload end
	pub fn chunk_range(&self) -> ByteRange {
		match self {
			Self::Container { chunk_range, .. }
			| Self::Info { chunk_range, .. }
			| Self::Generic { chunk_range, .. }
			| Self::Leaf { chunk_range, .. } => *chunk_range,
		}
	}

	/// The byte range of the usable payload, absent for zero-length chunks
	pub fn data_range(&self) -> Option<ByteRange> {
		match self {
			Self::Container { data_range, .. }
			| Self::Info { data_range, .. }
			| Self::Generic { data_range, .. }
			| Self::Leaf { data_range, .. } => *data_range,
		}
	}

	/// The usable payload with the sub-identifier (if any) excluded
	///
	/// This is the region a caller-supplied replacement payload must match,
	/// since the sub-identifier is written by the library, not the caller.
	pub fn data_range_excluding_sub_id(&self) -> Option<ByteRange> {
		let data_range = self.data_range()?;
		if self.sub_id().is_none() {
			return Some(data_range);
		}

		let start = data_range.start + 4;
		(start <= data_range.end).then(|| ByteRange::new(start, data_range.end))
	}

	/// Child chunks, for container nodes
	pub fn children(&self) -> Option<&[ChunkNode]> {
		match self {
			Self::Container { children, .. } => Some(children),
			_ => None,
		}
	}

	/// The decoded payload record, for typed leaf nodes
	pub fn metadata(&self) -> Option<&dyn ChunkMetadata> {
		match self {
			Self::Leaf { metadata, .. } => Some(metadata.as_ref()),
			_ => None,
		}
	}

	/// The decoded payload record, downcast to a concrete type
	///
	/// ```rust,no_run
	/// use riffle::chunk::ChunkId;
	/// use riffle::chunk::ChunksExt;
	/// use riffle::wav::{FmtMetadata, WavFile};
	///
	/// # fn main() -> riffle::error::Result<()> {
	/// let wav = WavFile::read_from_path("recording.wav")?;
	/// let root = &wav.riff().chunks()[0];
	/// if let Some(fmt) = root.children().and_then(|c| c.first_id(ChunkId::FMT)) {
	/// 	let metadata = fmt.metadata_as::<FmtMetadata>().unwrap();
	/// 	println!("{} Hz", metadata.sample_rate);
	/// }
	/// # Ok(())
	/// # }
	/// ```
	pub fn metadata_as<T>(&self) -> Option<&T>
	where
		T: ChunkMetadata + 'static,
	{
		self.metadata()?.as_any().downcast_ref()
	}
}

// Equality is full structural comparison, including leaf payloads. Never
// compare nodes by hash.
impl PartialEq for ChunkNode {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(
				Self::Container {
					id,
					sub_id,
					chunk_range,
					data_range,
					children,
				},
				Self::Container {
					id: other_id,
					sub_id: other_sub_id,
					chunk_range: other_chunk_range,
					data_range: other_data_range,
					children: other_children,
				},
			) => {
				id == other_id
					&& sub_id == other_sub_id
					&& chunk_range == other_chunk_range
					&& data_range == other_data_range
					&& children == other_children
			},
			(
				Self::Info {
					chunk_range,
					data_range,
				},
				Self::Info {
					chunk_range: other_chunk_range,
					data_range: other_data_range,
				},
			) => chunk_range == other_chunk_range && data_range == other_data_range,
			(
				Self::Generic {
					id,
					chunk_range,
					data_range,
				},
				Self::Generic {
					id: other_id,
					chunk_range: other_chunk_range,
					data_range: other_data_range,
				},
			) => {
				id == other_id
					&& chunk_range == other_chunk_range
					&& data_range == other_data_range
			},
			(
				Self::Leaf {
					id,
					chunk_range,
					data_range,
					metadata,
				},
				Self::Leaf {
					id: other_id,
					chunk_range: other_chunk_range,
					data_range: other_data_range,
					metadata: other_metadata,
				},
			) => {
				id == other_id
					&& chunk_range == other_chunk_range
					&& data_range == other_data_range
					&& metadata.eq_metadata(other_metadata.as_ref())
			},
			_ => false,
		}
	}
}

/// Lookup helpers for slices of chunks
///
/// A file may legally contain repeated sibling identifiers (ex. multiple
/// `LIST` chunks); `filter_id` surfaces all of them in file order.
pub trait ChunksExt {
	/// The first chunk matching `id`
	fn first_id(&self, id: ChunkId) -> Option<&ChunkNode>;

	/// All chunks matching `id`, in file order
	fn filter_id(&self, id: ChunkId) -> impl Iterator<Item = &ChunkNode>;
}

impl ChunksExt for [ChunkNode] {
	fn first_id(&self, id: ChunkId) -> Option<&ChunkNode> {
		self.iter().find(|chunk| chunk.id() == id)
	}

	fn filter_id(&self, id: ChunkId) -> impl Iterator<Item = &ChunkNode> {
		self.iter().filter(move |chunk| chunk.id() == id)
	}
}

#[cfg(test)]
mod tests {
	use super::{ChunkNode, ChunksExt};
	use crate::chunk::{ByteRange, ChunkId};

	fn generic(id: &[u8; 4], start: u64, end: u64) -> ChunkNode {
		ChunkNode::Generic {
			id: ChunkId::new(*id),
			chunk_range: ByteRange::new(start, end),
			data_range: None,
		}
	}

	#[test_log::test]
	fn structural_equality() {
		assert_eq!(generic(b"JUNK", 12, 19), generic(b"JUNK", 12, 19));
		assert_ne!(generic(b"JUNK", 12, 19), generic(b"JUNK", 12, 27));
		assert_ne!(generic(b"JUNK", 12, 19), generic(b"pad ", 12, 19));
	}

	#[test_log::test]
	fn leaf_equality_is_structural() {
		let leaf = |value: u32| ChunkNode::Leaf {
			id: ChunkId::new(*b"test"),
			chunk_range: ByteRange::new(12, 19),
			data_range: Some(ByteRange::new(20, 23)),
			metadata: Box::new(value),
		};

		assert_eq!(leaf(42), leaf(42));
		assert_ne!(leaf(42), leaf(43));

		// Same bytes, different concrete type: never equal
		let other_type = ChunkNode::Leaf {
			id: ChunkId::new(*b"test"),
			chunk_range: ByteRange::new(12, 19),
			data_range: Some(ByteRange::new(20, 23)),
			metadata: Box::new(42u64),
		};
		assert_ne!(leaf(42), other_type);
	}

	#[test_log::test]
	fn sub_id_exclusion() {
		let container = ChunkNode::Container {
			id: ChunkId::RIFF,
			sub_id: ChunkId::new(*b"WAVE"),
			chunk_range: ByteRange::new(0, 47),
			data_range: Some(ByteRange::new(8, 47)),
			children: Vec::new(),
		};
		assert_eq!(
			container.data_range_excluding_sub_id(),
			Some(ByteRange::new(12, 47))
		);

		// A container whose payload is only the sub-identifier has nothing left
		let bare = ChunkNode::Container {
			id: ChunkId::LIST,
			sub_id: ChunkId::INFO,
			chunk_range: ByteRange::new(0, 11),
			data_range: Some(ByteRange::new(8, 11)),
			children: Vec::new(),
		};
		assert_eq!(bare.data_range_excluding_sub_id(), None);
	}

	#[test_log::test]
	fn slice_lookup_keeps_duplicates() {
		let chunks = [
			generic(b"LIST", 12, 19),
			generic(b"data", 20, 27),
			generic(b"LIST", 28, 35),
		];

		assert_eq!(
			chunks.first_id(ChunkId::LIST).unwrap().chunk_range(),
			ByteRange::new(12, 19)
		);
		assert_eq!(chunks.filter_id(ChunkId::LIST).count(), 2);
		assert!(chunks.first_id(ChunkId::FMT).is_none());
	}
}
