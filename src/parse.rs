//! Zero-copy buffer parser
//!
//! Walks the chunks of an in-memory RIFF/WAVE image and records offsets
//! into it; no payload bytes are copied and no memory is allocated.

use crate::error::{WaveError, WaveResult};
use crate::format::WaveFormat;
use crate::riff::{fourcc, ChunkHeader, ChunkWalker, RiffHeader, DATA_ID, FMT_ID};
use crate::wave::{DataRegion, WaveInfo, WaveView};

/// Parse a complete WAVE file image without copying it
///
/// The returned view borrows `buf` and stays valid exactly as long as the
/// borrow does. A `data` chunk is not required; without one the view
/// reports a zero-length payload.
pub fn parse_buffer(buf: &[u8]) -> WaveResult<WaveView<'_>> {
    let info = parse_info(buf)?;
    Ok(WaveView { buf, info })
}

/// Structural parse shared by `parse_buffer` and the full stream loader
pub(crate) fn parse_info(buf: &[u8]) -> WaveResult<WaveInfo> {
    if buf.is_empty() {
        return Err(WaveError::InvalidArguments);
    }

    let riff = RiffHeader::from_bytes(buf).ok_or(WaveError::BadRiffHeader)?;
    if !riff.is_valid() {
        return Err(WaveError::BadRiffHeader);
    }

    // Locate fmt and data; the last occurrence of each wins.
    let mut format_chunk: Option<(usize, ChunkHeader)> = None;
    let mut data_chunk: Option<(usize, ChunkHeader)> = None;
    for (offset, header) in ChunkWalker::new(buf, &riff) {
        match header.id {
            FMT_ID => {
                if format_chunk.is_some() {
                    log::warn!("duplicate fmt chunk at offset {}, keeping the last", offset);
                }
                format_chunk = Some((offset, header));
            }
            DATA_ID => {
                if data_chunk.is_some() {
                    log::warn!("duplicate data chunk at offset {}, keeping the last", offset);
                }
                data_chunk = Some((offset, header));
            }
            other => {
                log::debug!("skipping chunk '{}' ({} bytes)", fourcc(other), header.size);
            }
        }
    }

    let (format_chunk_offset, format_header) = format_chunk.ok_or(WaveError::MissingFormat)?;

    // The classic 16-byte descriptor must fit inside both the chunk and
    // the physical buffer.
    let format_offset = format_chunk_offset + ChunkHeader::SIZE;
    if (format_header.size as usize) < WaveFormat::SIZE {
        return Err(WaveError::TruncatedChunk);
    }
    let format = WaveFormat::from_bytes(&buf[format_offset.min(buf.len())..])
        .ok_or(WaveError::TruncatedChunk)?;
    if format_header.size as usize > WaveFormat::SIZE {
        log::debug!(
            "fmt chunk carries {} trailing bytes, ignored",
            format_header.size as usize - WaveFormat::SIZE
        );
    }

    let data = match data_chunk {
        Some((chunk_offset, header)) => {
            let payload_offset = chunk_offset + ChunkHeader::SIZE;
            let payload_size = header.size as usize;
            // Never surface a payload extending past the buffer.
            if payload_offset + payload_size > buf.len() {
                return Err(WaveError::TruncatedChunk);
            }
            Some(DataRegion {
                chunk_offset,
                payload_offset,
                payload_size,
            })
        }
        None => None,
    };

    if !format.is_supported() {
        return Err(WaveError::UnsupportedFormat {
            tag: format.format_tag,
            bits: format.bits_per_sample,
        });
    }

    Ok(WaveInfo {
        format,
        format_chunk_offset,
        data,
    })
}
