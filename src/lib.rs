//! Parser for uncompressed RIFF/WAVE audio containers
//!
//! Reads a WAVE file's chunk structure, validates the format descriptor,
//! and exposes the sample payload plus derived metadata (sample format,
//! frequency, channel count, sample count, duration). Supports classic
//! PCM at 8/16/32 bits and IEEE float at 32/64 bits; compressed codecs
//! and WAVEFORMATEXTENSIBLE descriptors are out of scope.
//!
//! # Entry points
//!
//! - [`parse_buffer`] — zero-copy structural parse over caller-owned
//!   bytes; records offsets, allocates nothing.
//! - [`load_stream`] / [`load_path`] — slurp a stream or file into one
//!   allocation and parse it; the result owns the image.
//! - [`load_stream_info`] / [`load_path_info`] — metadata-only: chunk
//!   headers and the format descriptor are read into a small fixed
//!   scratch block and every payload is seeked past.
//!
//! Loaded waves take their single allocation from a pluggable
//! [`Allocator`] (default: the global heap) and hand it back through
//! [`OwnedWave::release`].
//!
//! ```no_run
//! let bytes = std::fs::read("tone.wav")?;
//! let wave = wavparse::parse_buffer(&bytes)?;
//! println!(
//!     "{:?}, {} Hz, {} channels, {:.3}s",
//!     wave.sample_format(),
//!     wave.sample_frequency(),
//!     wave.channel_count(),
//!     wave.length_in_seconds(),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alloc;
pub mod error;
pub mod format;
pub mod parse;
pub mod reader;
pub mod riff;
pub mod stream;
pub mod wave;

#[cfg(test)]
mod test_support;

pub use alloc::{Allocator, HeapAllocator};
pub use error::{WaveError, WaveResult};
pub use format::{SampleFormat, WaveFormat, WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_PCM};
pub use parse::parse_buffer;
pub use reader::ByteReader;
pub use riff::{ChunkHeader, RiffHeader};
pub use stream::{load_path, load_path_info, load_stream, load_stream_info};
pub use wave::{OwnedWave, WaveInfo, WaveView};
