//! Stream and path loaders
//!
//! Two ingestion modes over any byte stream:
//!
//! - [`load_stream`] slurps the whole stream into one allocation and runs
//!   the zero-copy parser over it; the result owns the file image.
//! - [`load_stream_info`] reads only the structural records into a fixed
//!   44-byte scratch block and seeks past every payload, so a metadata
//!   query never pulls the sample bytes off disk.
//!
//! Both take an optional [`Allocator`]; `None` selects the default heap
//! pair. The matching path loaders open a file and delegate.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::alloc::{Allocator, HeapAllocator, OwnedBuffer};
use crate::error::{WaveError, WaveResult};
use crate::format::WaveFormat;
use crate::parse::parse_info;
use crate::reader::ByteReader;
use crate::riff::{ChunkHeader, RiffHeader, DATA_ID, FMT_ID};
use crate::wave::{DataRegion, OwnedWave, WaveInfo};

/// Scratch block layout for metadata-only loads: the RiffHeader, one slot
/// for each of the fmt and data chunk headers, and the format descriptor.
pub(crate) const INFO_SCRATCH_SIZE: usize =
    RiffHeader::SIZE + 2 * ChunkHeader::SIZE + WaveFormat::SIZE;

const RIFF_SLOT: usize = 0;
const FMT_CHUNK_SLOT: usize = RiffHeader::SIZE;
const DATA_CHUNK_SLOT: usize = FMT_CHUNK_SLOT + ChunkHeader::SIZE;
const FORMAT_SLOT: usize = DATA_CHUNK_SLOT + ChunkHeader::SIZE;

/// Load and parse a whole wave from a byte stream
///
/// Allocates one buffer of `size` bytes, reads the entire stream into it,
/// and parses in place. A short read fails with
/// [`ShortRead`](WaveError::ShortRead); on any failure the buffer is
/// returned to the allocator before the error surfaces.
pub fn load_stream<R: Read>(
    reader: R,
    size: usize,
    allocator: Option<&dyn Allocator>,
) -> WaveResult<OwnedWave> {
    if size == 0 {
        return Err(WaveError::InvalidArguments);
    }
    let allocator = allocator.unwrap_or(&HeapAllocator);
    let mut buffer = OwnedBuffer::allocate(allocator, size)
        .ok_or(WaveError::AllocationFailed(size))?;

    match slurp_and_parse(reader, buffer.as_mut_slice()) {
        Ok(info) => Ok(OwnedWave {
            buffer: Some(buffer),
            info,
            metadata_only: false,
        }),
        Err(e) => {
            buffer.release(allocator);
            Err(e)
        }
    }
}

fn slurp_and_parse<R: Read>(reader: R, buf: &mut [u8]) -> WaveResult<WaveInfo> {
    ByteReader::new(reader).read_exact(buf)?;
    parse_info(buf)
}

/// Load only the structural metadata of a wave from a byte stream
///
/// Sample bytes are never read; the result owns the fixed scratch block
/// and reports the payload through
/// [`sample_data_offset`](WaveInfo::sample_data_offset) and
/// [`sample_data_size`](WaveInfo::sample_data_size) so the caller can
/// fetch the bytes later.
pub fn load_stream_info<R: Read + Seek>(
    reader: R,
    size: usize,
    allocator: Option<&dyn Allocator>,
) -> WaveResult<OwnedWave> {
    if size == 0 {
        return Err(WaveError::InvalidArguments);
    }
    let allocator = allocator.unwrap_or(&HeapAllocator);
    let mut scratch = OwnedBuffer::allocate(allocator, INFO_SCRATCH_SIZE)
        .ok_or(WaveError::AllocationFailed(INFO_SCRATCH_SIZE))?;

    match scan_stream_info(reader, size, scratch.as_mut_slice()) {
        Ok(info) => Ok(OwnedWave {
            buffer: Some(scratch),
            info,
            metadata_only: true,
        }),
        Err(e) => {
            scratch.release(allocator);
            Err(e)
        }
    }
}

fn scan_stream_info<R: Read + Seek>(
    reader: R,
    size: usize,
    scratch: &mut [u8],
) -> WaveResult<WaveInfo> {
    let mut reader = ByteReader::new(reader);

    reader.read_exact(&mut scratch[RIFF_SLOT..RIFF_SLOT + RiffHeader::SIZE])?;
    let riff = RiffHeader::from_bytes(scratch).ok_or(WaveError::BadRiffHeader)?;
    if !riff.is_valid() {
        return Err(WaveError::BadRiffHeader);
    }

    let mut format_chunk_offset: Option<usize> = None;
    let mut data: Option<DataRegion> = None;

    while reader.position() + (ChunkHeader::SIZE as u64) <= size as u64 {
        let chunk = ChunkHeader::read(&mut reader)?;
        let chunk_offset = (reader.position() as usize) - ChunkHeader::SIZE;

        match chunk.id {
            DATA_ID => {
                scratch[DATA_CHUNK_SLOT..DATA_CHUNK_SLOT + ChunkHeader::SIZE]
                    .copy_from_slice(&chunk.to_bytes());
                data = Some(DataRegion {
                    chunk_offset,
                    payload_offset: reader.position() as usize,
                    payload_size: chunk.size as usize,
                });
                reader.skip(chunk.size as u64)?;
            }
            FMT_ID => {
                scratch[FMT_CHUNK_SLOT..FMT_CHUNK_SLOT + ChunkHeader::SIZE]
                    .copy_from_slice(&chunk.to_bytes());
                format_chunk_offset = Some(chunk_offset);

                // Keep only the classic descriptor; the scratch slot is
                // exactly WaveFormat::SIZE bytes.
                let take = (chunk.size as usize).min(WaveFormat::SIZE);
                if (chunk.size as usize) > WaveFormat::SIZE {
                    log::warn!(
                        "fmt chunk is {} bytes, reading the first {}",
                        chunk.size,
                        WaveFormat::SIZE
                    );
                }
                scratch[FORMAT_SLOT..FORMAT_SLOT + WaveFormat::SIZE].fill(0);
                reader.read_exact(&mut scratch[FORMAT_SLOT..FORMAT_SLOT + take])?;
                reader.skip(chunk.size as u64 - take as u64)?;
            }
            _ => {
                reader.skip(chunk.size as u64)?;
            }
        }

        // Single pad byte after odd payloads, not counted in chunk.size.
        if chunk.size % 2 != 0 {
            reader.skip(1)?;
        }
    }

    let format_chunk_offset = format_chunk_offset.ok_or(WaveError::MissingFormat)?;
    let format = WaveFormat::from_bytes(&scratch[FORMAT_SLOT..FORMAT_SLOT + WaveFormat::SIZE])
        .ok_or(WaveError::MissingFormat)?;
    if !format.is_supported() {
        return Err(WaveError::UnsupportedFormat {
            tag: format.format_tag,
            bits: format.bits_per_sample,
        });
    }

    // The recorded payload must lie inside the declared stream size.
    if let Some(region) = data {
        if region.payload_offset + region.payload_size > size {
            return Err(WaveError::TruncatedChunk);
        }
    }

    Ok(WaveInfo {
        format,
        format_chunk_offset,
        data,
    })
}

/// Load and parse a whole wave from a file path
pub fn load_path(path: &Path, allocator: Option<&dyn Allocator>) -> WaveResult<OwnedWave> {
    let (file, size) = open_with_size(path)?;
    load_stream(file, size, allocator)
}

/// Load only the structural metadata of a wave from a file path
pub fn load_path_info(path: &Path, allocator: Option<&dyn Allocator>) -> WaveResult<OwnedWave> {
    let (file, size) = open_with_size(path)?;
    load_stream_info(file, size, allocator)
}

fn open_with_size(path: &Path) -> WaveResult<(File, usize)> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let size = usize::try_from(len).map_err(|_| WaveError::InvalidArguments)?;
    Ok((file, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{SampleFormat, WAVE_FORMAT_IEEE_FLOAT};
    use crate::test_support::{CountingAllocator, FailingAllocator, WaveBuilder};
    use std::io::Cursor;

    fn pcm16_mono_8k() -> Vec<u8> {
        WaveBuilder::pcm(16, 1, 8000)
            .data(&[0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80, 0x01, 0x00])
            .build()
    }

    #[test]
    fn test_load_stream_full() {
        let bytes = pcm16_mono_8k();
        let mut wave = load_stream(Cursor::new(&bytes), bytes.len(), None).unwrap();

        assert!(!wave.is_metadata_only());
        assert_eq!(wave.sample_format(), SampleFormat::S16);
        assert_eq!(wave.sample_count(), 4);
        assert_eq!(wave.sample_data_offset(), Some(44));
        assert_eq!(
            wave.sample_data().unwrap(),
            &[0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80, 0x01, 0x00]
        );
        assert_eq!(wave.bytes().unwrap(), &bytes[..]);

        assert!(wave.release(None));
        assert!(!wave.release(None));
        assert!(wave.bytes().is_none());
    }

    #[test]
    fn test_load_stream_zero_size() {
        let err = load_stream(Cursor::new(&[][..]), 0, None).unwrap_err();
        assert_eq!(err, WaveError::InvalidArguments);
    }

    #[test]
    fn test_load_stream_short_read_frees_buffer() {
        let bytes = pcm16_mono_8k();
        let alloc = CountingAllocator::new();

        // Claim more bytes than the stream holds.
        let err = load_stream(Cursor::new(&bytes), bytes.len() + 10, Some(&alloc)).unwrap_err();
        assert_eq!(
            err,
            WaveError::ShortRead {
                wanted: bytes.len() + 10,
                got: bytes.len()
            }
        );
        assert_eq!(alloc.live.get(), 0);
    }

    #[test]
    fn test_load_stream_parse_failure_frees_buffer() {
        let mut bytes = pcm16_mono_8k();
        bytes[3] = b'X'; // RIFX
        let alloc = CountingAllocator::new();

        let err = load_stream(Cursor::new(&bytes), bytes.len(), Some(&alloc)).unwrap_err();
        assert_eq!(err, WaveError::BadRiffHeader);
        assert_eq!(alloc.live.get(), 0);
    }

    #[test]
    fn test_load_stream_allocation_failure() {
        let bytes = pcm16_mono_8k();
        let err = load_stream(Cursor::new(&bytes), bytes.len(), Some(&FailingAllocator))
            .unwrap_err();
        assert_eq!(err, WaveError::AllocationFailed(bytes.len()));
    }

    #[test]
    fn test_load_stream_info_skips_payload() {
        let bytes = pcm16_mono_8k();
        let alloc = CountingAllocator::new();
        let mut wave =
            load_stream_info(Cursor::new(&bytes), bytes.len(), Some(&alloc)).unwrap();

        assert!(wave.is_metadata_only());
        assert_eq!(wave.sample_format(), SampleFormat::S16);
        assert_eq!(wave.sample_frequency(), 8000);
        assert_eq!(wave.channel_count(), 1);
        assert_eq!(wave.sample_count(), 4);
        assert_eq!(wave.sample_data_offset(), Some(44));
        assert_eq!(wave.sample_data_size(), 8);
        // Payload bytes are not available in this mode.
        assert!(wave.sample_data().is_none());
        assert_eq!(wave.bytes().unwrap().len(), INFO_SCRATCH_SIZE);

        assert!(wave.release(Some(&alloc)));
        assert_eq!(alloc.live.get(), 0);
        assert!(!wave.release(Some(&alloc)));
    }

    #[test]
    fn test_load_stream_info_matches_buffer_parse() {
        let bytes = WaveBuilder::new()
            .format(WAVE_FORMAT_IEEE_FLOAT, 32, 2, 48000)
            .chunk(*b"LIST", &[0; 9]) // odd payload, pad exercised
            .data(&[0; 16])
            .build();

        let view = crate::parse::parse_buffer(&bytes).unwrap();
        let mut wave = load_stream_info(Cursor::new(&bytes), bytes.len(), None).unwrap();

        assert_eq!(wave.sample_format(), view.sample_format());
        assert_eq!(wave.sample_data_offset(), view.sample_data_offset());
        assert_eq!(wave.sample_data_size(), view.sample_data_size());
        assert_eq!(
            wave.info().format_chunk_offset(),
            view.info().format_chunk_offset()
        );
        assert_eq!(
            wave.info().data_chunk_offset(),
            view.info().data_chunk_offset()
        );
        wave.release(None);
    }

    #[test]
    fn test_load_stream_info_oversized_fmt_chunk() {
        // 20-byte fmt payload: classic descriptor plus 4 extension bytes.
        let mut fmt_payload = Vec::new();
        fmt_payload.extend_from_slice(&WaveBuilder::pcm(16, 2, 44100).build()[20..36]);
        fmt_payload.extend_from_slice(&[0xEE; 4]);

        let bytes = WaveBuilder::new()
            .chunk(*b"fmt ", &fmt_payload)
            .data(&[0; 4])
            .build();
        let mut wave = load_stream_info(Cursor::new(&bytes), bytes.len(), None).unwrap();

        assert_eq!(wave.sample_format(), SampleFormat::S16);
        assert_eq!(wave.channel_count(), 2);
        assert_eq!(wave.sample_count(), 2);
        wave.release(None);
    }

    #[test]
    fn test_load_stream_info_no_data_chunk() {
        let bytes = WaveBuilder::pcm(16, 1, 8000).build();
        let mut wave = load_stream_info(Cursor::new(&bytes), bytes.len(), None).unwrap();

        assert_eq!(wave.sample_data_offset(), None);
        assert_eq!(wave.sample_count(), 0);
        assert_eq!(wave.length_in_seconds(), 0.0);
        wave.release(None);
    }

    #[test]
    fn test_load_stream_info_failures_free_scratch() {
        let alloc = CountingAllocator::new();

        let mut bad = pcm16_mono_8k();
        bad[8..12].copy_from_slice(b"AVI ");
        let err = load_stream_info(Cursor::new(&bad), bad.len(), Some(&alloc)).unwrap_err();
        assert_eq!(err, WaveError::BadRiffHeader);
        assert_eq!(alloc.live.get(), 0);

        let no_fmt = WaveBuilder::new().data(&[0; 4]).build();
        let err = load_stream_info(Cursor::new(&no_fmt), no_fmt.len(), Some(&alloc)).unwrap_err();
        assert_eq!(err, WaveError::MissingFormat);
        assert_eq!(alloc.live.get(), 0);

        let bad_bits = WaveBuilder::pcm(24, 1, 44100).data(&[0; 6]).build();
        let err =
            load_stream_info(Cursor::new(&bad_bits), bad_bits.len(), Some(&alloc)).unwrap_err();
        assert!(matches!(err, WaveError::UnsupportedFormat { bits: 24, .. }));
        assert_eq!(alloc.live.get(), 0);
    }

    #[test]
    fn test_load_stream_info_data_past_stream_end() {
        let mut bytes = WaveBuilder::pcm(16, 1, 8000).data(&[0; 8]).build();
        let data_size_at = bytes.len() - 8 - 4;
        bytes[data_size_at..data_size_at + 4].copy_from_slice(&5000u32.to_le_bytes());

        let err = load_stream_info(Cursor::new(&bytes), bytes.len(), None).unwrap_err();
        assert_eq!(err, WaveError::TruncatedChunk);
    }
}
