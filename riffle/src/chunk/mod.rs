//! Generic RIFF chunk machinery
//!
//! Everything in here is format-agnostic: identifiers, byte ranges, the chunk
//! descriptor scanner, the parsed node tree, and the registry of decode
//! strategies that the tree parser dispatches through.

mod descriptor;
mod id;
mod node;
mod range;
mod registry;

pub use descriptor::{ChunkDescriptor, DataRange};
pub use id::ChunkId;
pub use node::{ChunkMetadata, ChunkNode, ChunksExt};
pub use range::ByteRange;
pub use registry::{ChunkReader, ChunkRegistry, ContainerReader, InfoReader};
