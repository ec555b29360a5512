//! Parsed wave result types and derived queries
//!
//! Two result types replace the single pointer-bearing record a C parser
//! would use: [`WaveView`] borrows the caller's byte slice (zero-copy), and
//! [`OwnedWave`] owns one allocation obtained from an
//! [`Allocator`](crate::Allocator). Both carry a [`WaveInfo`] of byte
//! offsets and a decoded format copy; slices are computed on demand, so no
//! field can dangle or alias.

use crate::alloc::{Allocator, HeapAllocator, OwnedBuffer};
use crate::format::{SampleFormat, WaveFormat};

/// Located sample payload: offsets are absolute within the source bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DataRegion {
    /// Offset of the data ChunkHeader itself
    pub chunk_offset: usize,
    /// Offset of the first payload byte (just past the ChunkHeader)
    pub payload_offset: usize,
    /// Declared payload size in bytes (pad byte excluded)
    pub payload_size: usize,
}

/// Validated format descriptor plus chunk locations
///
/// Shared by both parse modes. All offsets are absolute byte positions in
/// the original source (buffer or stream).
#[derive(Debug, Clone, Copy)]
pub struct WaveInfo {
    pub(crate) format: WaveFormat,
    pub(crate) format_chunk_offset: usize,
    pub(crate) data: Option<DataRegion>,
}

impl WaveInfo {
    /// The decoded 16-byte format descriptor
    pub fn format(&self) -> &WaveFormat {
        &self.format
    }

    /// Sample encoding derived from `(format_tag, bits_per_sample)`
    pub fn sample_format(&self) -> SampleFormat {
        self.format.sample_format()
    }

    /// Samples per second per channel
    pub fn sample_frequency(&self) -> u32 {
        self.format.samples_per_sec
    }

    /// Channel count as reported by the format descriptor
    pub fn channel_count(&self) -> u16 {
        self.format.channels
    }

    /// Total sample count across all channels, not frames
    pub fn sample_count(&self) -> usize {
        let bytes_per_sample = (self.format.bits_per_sample / 8) as usize;
        if bytes_per_sample == 0 {
            return 0;
        }
        self.sample_data_size() / bytes_per_sample
    }

    /// Payload length divided by the data rate, 0.0 when the rate is 0
    pub fn length_in_seconds(&self) -> f32 {
        if self.format.samples_per_sec == 0 {
            return 0.0;
        }
        self.sample_count() as f32 / self.format.samples_per_sec as f32
    }

    /// Declared size of the data payload, 0 when no data chunk was found
    pub fn sample_data_size(&self) -> usize {
        self.data.map_or(0, |d| d.payload_size)
    }

    /// Absolute offset of the first payload byte, when a data chunk exists
    pub fn sample_data_offset(&self) -> Option<usize> {
        self.data.map(|d| d.payload_offset)
    }

    /// Absolute offset of the data ChunkHeader, when present
    pub fn data_chunk_offset(&self) -> Option<usize> {
        self.data.map(|d| d.chunk_offset)
    }

    /// Absolute offset of the `fmt ` ChunkHeader
    pub fn format_chunk_offset(&self) -> usize {
        self.format_chunk_offset
    }
}

/// Zero-copy parse result borrowing the caller's buffer
///
/// Valid only while the backing slice is; the borrow checker enforces what
/// the equivalent C contract can only document. Nothing to release.
#[derive(Debug, Clone, Copy)]
pub struct WaveView<'a> {
    pub(crate) buf: &'a [u8],
    pub(crate) info: WaveInfo,
}

impl<'a> WaveView<'a> {
    /// Chunk locations and the decoded format
    pub fn info(&self) -> &WaveInfo {
        &self.info
    }

    /// The entire backing buffer this view was parsed from
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// The raw sample payload, `None` when the file has no data chunk
    pub fn sample_data(&self) -> Option<&'a [u8]> {
        let region = self.info.data?;
        Some(&self.buf[region.payload_offset..region.payload_offset + region.payload_size])
    }

    pub fn format(&self) -> &WaveFormat {
        self.info.format()
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.info.sample_format()
    }

    pub fn sample_frequency(&self) -> u32 {
        self.info.sample_frequency()
    }

    pub fn channel_count(&self) -> u16 {
        self.info.channel_count()
    }

    pub fn sample_count(&self) -> usize {
        self.info.sample_count()
    }

    pub fn length_in_seconds(&self) -> f32 {
        self.info.length_in_seconds()
    }

    pub fn sample_data_size(&self) -> usize {
        self.info.sample_data_size()
    }

    pub fn sample_data_offset(&self) -> Option<usize> {
        self.info.sample_data_offset()
    }
}

/// Loaded wave owning one allocation from the loader's allocator
///
/// Full loads own the entire file image and expose the payload through
/// [`sample_data`](OwnedWave::sample_data). Metadata-only loads own the
/// fixed scratch block instead; `sample_data` is `None` and callers read
/// payload bytes themselves using [`sample_data_offset`](WaveInfo::sample_data_offset)
/// and [`sample_data_size`](WaveInfo::sample_data_size).
///
/// The allocation must be returned exactly once via
/// [`release`](OwnedWave::release) with the allocator the wave was loaded
/// with. Dropping without releasing leaks the block.
#[derive(Debug)]
pub struct OwnedWave {
    pub(crate) buffer: Option<OwnedBuffer>,
    pub(crate) info: WaveInfo,
    pub(crate) metadata_only: bool,
}

impl OwnedWave {
    /// Chunk locations and the decoded format
    pub fn info(&self) -> &WaveInfo {
        &self.info
    }

    /// True when loaded in metadata-only mode (payload bytes were skipped)
    pub fn is_metadata_only(&self) -> bool {
        self.metadata_only
    }

    /// The owned bytes: the full file image, or the metadata scratch block
    ///
    /// `None` after the wave has been released.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(|b| b.as_slice())
    }

    /// The raw sample payload
    ///
    /// `None` in metadata-only mode, when the file has no data chunk, or
    /// after release.
    pub fn sample_data(&self) -> Option<&[u8]> {
        if self.metadata_only {
            return None;
        }
        let region = self.info.data?;
        let bytes = self.bytes()?;
        Some(&bytes[region.payload_offset..region.payload_offset + region.payload_size])
    }

    /// Re-borrow a full load as a zero-copy view
    ///
    /// `None` in metadata-only mode or after release.
    pub fn view(&self) -> Option<WaveView<'_>> {
        if self.metadata_only {
            return None;
        }
        Some(WaveView {
            buf: self.bytes()?,
            info: self.info,
        })
    }

    /// Return the owned allocation, clearing the handle
    ///
    /// Pass the allocator the wave was loaded with; `None` selects the
    /// default heap pair. Returns false when there is nothing to release,
    /// so a second call is a no-op.
    pub fn release(&mut self, allocator: Option<&dyn Allocator>) -> bool {
        match self.buffer.take() {
            Some(buffer) => {
                buffer.release(allocator.unwrap_or(&HeapAllocator));
                true
            }
            None => false,
        }
    }

    pub fn format(&self) -> &WaveFormat {
        self.info.format()
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.info.sample_format()
    }

    pub fn sample_frequency(&self) -> u32 {
        self.info.sample_frequency()
    }

    pub fn channel_count(&self) -> u16 {
        self.info.channel_count()
    }

    pub fn sample_count(&self) -> usize {
        self.info.sample_count()
    }

    pub fn length_in_seconds(&self) -> f32 {
        self.info.length_in_seconds()
    }

    pub fn sample_data_size(&self) -> usize {
        self.info.sample_data_size()
    }

    pub fn sample_data_offset(&self) -> Option<usize> {
        self.info.sample_data_offset()
    }
}
