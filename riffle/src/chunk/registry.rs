use crate::chunk::{ChunkDescriptor, ChunkId, ChunkNode};
use crate::error::Result;
use crate::macros::err;
use crate::riff::Endianness;
use crate::util::io::MediaSource;

use std::collections::HashMap;

/// A decode strategy for one chunk identifier
///
/// The registry dispatches here once the descriptor scanner has recognized the
/// identifier. Implementors turn the raw payload into a [`ChunkNode`]; the
/// reader is positioned at the start of the chunk's data region (past the
/// sub-identifier, when the descriptor carries one) and may be left anywhere.
pub trait ChunkReader: Send + Sync {
	/// Whether chunks of this kind carry a 4-byte sub-identifier and children
	///
	/// Consulted by [`ChunkDescriptor::read`] before the data region is
	/// touched, so a strategy claiming container status changes how the
	/// descriptor itself is scanned.
	fn is_container(&self) -> bool {
		false
	}

	/// Decode the chunk described by `descriptor` into a node
	///
	/// # Errors
	///
	/// Whatever the strategy considers malformed, plus any I/O failure from
	/// the underlying source
	fn read_chunk(
		&self,
		reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		endianness: Endianness,
		registry: &ChunkRegistry,
	) -> Result<ChunkNode>;
}

/// The table of decode strategies the tree parser dispatches through
///
/// A registry is an explicit value threaded through every parse; there is no
/// process-global registration. Callers extend [`ChunkRegistry::standard`]
/// with their own strategies (or build an empty registry from scratch) without
/// affecting any other parse in the process.
///
/// ```rust
/// use riffle::chunk::{ChunkId, ChunkRegistry, ContainerReader};
///
/// // Treat a vendor chunk as a container with RIFF-shaped children
/// let mut registry = ChunkRegistry::standard();
/// registry.register(ChunkId::new(*b"vend"), Box::new(ContainerReader));
/// ```
#[derive(Default)]
pub struct ChunkRegistry {
	kinds: HashMap<ChunkId, Box<dyn ChunkReader>>,
}

impl ChunkRegistry {
	/// An empty registry; every chunk parses as [`ChunkNode::Generic`]
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The standard registry: `RIFF` and `LIST` as containers, `INFO` opaque
	#[must_use]
	pub fn standard() -> Self {
		let mut registry = Self::new();
		registry.register(ChunkId::RIFF, Box::new(ContainerReader));
		registry.register(ChunkId::LIST, Box::new(ContainerReader));
		registry.register(ChunkId::INFO, Box::new(InfoReader));
		registry
	}

	/// The standard registry extended with `additional` strategies
	///
	/// On identifier collision the caller's strategy wins.
	#[must_use]
	pub fn standard_with(
		additional: impl IntoIterator<Item = (ChunkId, Box<dyn ChunkReader>)>,
	) -> Self {
		let mut registry = Self::standard();
		registry.kinds.extend(additional);
		registry
	}

	/// Register a strategy for `id`, replacing any existing one
	pub fn register(&mut self, id: ChunkId, reader: Box<dyn ChunkReader>) {
		self.kinds.insert(id, reader);
	}

	/// Whether `id` has a strategy that reports container status
	pub fn is_container(&self, id: ChunkId) -> bool {
		self.kinds
			.get(&id)
			.is_some_and(|reader| reader.is_container())
	}

	pub(crate) fn reader_for(&self, id: ChunkId) -> Option<&dyn ChunkReader> {
		self.kinds.get(&id).map(Box::as_ref)
	}
}

/// The standard strategy for container-kind chunks (`RIFF`, `LIST`)
///
/// Recursively parses the data region past the sub-identifier as a run of
/// sibling chunks, dispatching each through the same registry.
pub struct ContainerReader;

impl ChunkReader for ContainerReader {
	fn is_container(&self) -> bool {
		true
	}

	fn read_chunk(
		&self,
		reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		endianness: Endianness,
		registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		let Some(sub_id) = descriptor.sub_id else {
			// Unreachable through the descriptor scanner, but a caller can
			// hand us a descriptor it built some other way
			err!(MissingSubId(descriptor.id.as_str().into_owned()));
		};

		let data_range = descriptor.data_range.map(|range| range.usable);

		// Children start after the sub-identifier; a container whose payload
		// is only the sub-identifier simply has none
		let children = match data_range {
			Some(range) => crate::riff::read::parse_subchunks(
				reader,
				range.start + 4,
				descriptor.chunk_range.end,
				endianness,
				registry,
			)?,
			None => Vec::new(),
		};

		Ok(ChunkNode::Container {
			id: descriptor.id,
			sub_id,
			chunk_range: descriptor.chunk_range,
			data_range,
			children,
		})
	}
}

/// The standard strategy for `INFO` chunks
///
/// Records identity and ranges only; the key/value interior stays unparsed.
pub struct InfoReader;

impl ChunkReader for InfoReader {
	fn read_chunk(
		&self,
		_reader: &mut dyn MediaSource,
		descriptor: &ChunkDescriptor,
		_endianness: Endianness,
		_registry: &ChunkRegistry,
	) -> Result<ChunkNode> {
		Ok(ChunkNode::Info {
			chunk_range: descriptor.chunk_range,
			data_range: descriptor.data_range.map(|range| range.usable),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::{ChunkReader, ChunkRegistry, ContainerReader};
	use crate::chunk::ChunkId;

	#[test_log::test]
	fn standard_container_kinds() {
		let registry = ChunkRegistry::standard();

		assert!(registry.is_container(ChunkId::RIFF));
		assert!(registry.is_container(ChunkId::LIST));
		assert!(!registry.is_container(ChunkId::INFO));
		assert!(!registry.is_container(ChunkId::new(*b"data")));
	}

	#[test_log::test]
	fn registered_container_changes_kind_test() {
		let vendor = ChunkId::new(*b"vend");

		let registry = ChunkRegistry::standard();
		assert!(!registry.is_container(vendor));

		let extended = ChunkRegistry::standard_with([(
			vendor,
			Box::new(ContainerReader) as Box<dyn ChunkReader>,
		)]);
		assert!(extended.is_container(vendor));
	}

	#[test_log::test]
	fn empty_registry_has_no_containers() {
		let registry = ChunkRegistry::new();
		assert!(!registry.is_container(ChunkId::RIFF));
	}
}
