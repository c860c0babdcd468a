//! Parse and rewrite RIFF containers, with a typed layer for WAV chunks.
//!
//! A RIFF file is a tree of length-prefixed chunks. This crate walks that
//! tree into a typed [`ChunkNode`](chunk::ChunkNode) structure, lets callers
//! register their own decode strategies per chunk identifier, and can
//! overwrite a chunk's payload in place as long as the size does not change.
//! `RIFF`, `RIFX` (big-endian), and `RF64` containers are supported.
//!
//! # Examples
//!
//! ## Reading a WAV file
//!
//! ```rust,no_run
//! use riffle::wav::WavFile;
//!
//! # fn main() -> riffle::error::Result<()> {
//! let wav = WavFile::read_from_path("recording.wav")?;
//!
//! if let Some(fmt) = wav.fmt() {
//! 	println!("{} ch @ {} Hz, {}-bit", fmt.channels, fmt.sample_rate, fmt.bit_depth);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Walking the raw chunk tree
//!
//! ```rust,no_run
//! use riffle::riff::RiffFile;
//!
//! # fn main() -> riffle::error::Result<()> {
//! let riff = RiffFile::read_from_path("anything.riff")?;
//!
//! for root in riff.chunks() {
//! 	println!("{} spanning {:?}", root.id(), root.chunk_range());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Registering a custom chunk kind
//!
//! Parsing is driven by a [`ChunkRegistry`](chunk::ChunkRegistry) value, an
//! explicit argument rather than global state. Identifiers without a
//! registered strategy come out as generic nodes; registering a strategy
//! (even a container-kind one) changes how they parse without touching the
//! walker itself.
//!
//! ```rust,no_run
//! use riffle::chunk::{ChunkId, ChunkRegistry, ContainerReader};
//! use riffle::riff::RiffFile;
//!
//! # fn main() -> riffle::error::Result<()> {
//! let mut registry = ChunkRegistry::standard();
//! registry.register(ChunkId::new(*b"vend"), Box::new(ContainerReader));
//!
//! let riff = RiffFile::read_from_path_with("vendor.riff", &registry)?;
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod error;
pub(crate) mod macros;
pub mod riff;
mod util;
pub mod wav;

pub use util::io;
