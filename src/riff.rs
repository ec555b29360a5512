//! RIFF container structures and the chunk walker
//!
//! RIFF is a little-endian container of tagged chunks. The outer frame is
//! `'RIFF' <u32 size> 'WAVE'`, followed by `<4-byte id> <u32 size>
//! <payload> [pad]` records. A chunk's `size` counts payload bytes only;
//! odd payloads are followed by a single pad byte not counted in `size`.

use std::io::Read;

use crate::error::WaveResult;
use crate::reader::ByteReader;

// RIFF format constants (little-endian IDs)
pub const RIFF_ID: u32 = 0x46464952; // "RIFF"
pub const WAVE_ID: u32 = 0x45564157; // "WAVE"
pub const FMT_ID: u32 = 0x20746d66; // "fmt "
pub const DATA_ID: u32 = 0x61746164; // "data"

/// Render a chunk id as ASCII for log messages
pub(crate) fn fourcc(id: u32) -> String {
    id.to_le_bytes()
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// Outer RIFF envelope (12 bytes)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RiffHeader {
    pub riff_id: u32,
    pub size: u32,
    pub filetype_id: u32,
}

impl RiffHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 12;

    /// Decode from the first 12 bytes of a buffer, if present
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            riff_id: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            filetype_id: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }

    /// Read from a byte stream
    pub fn read<R: Read>(reader: &mut ByteReader<R>) -> WaveResult<Self> {
        Ok(Self {
            riff_id: reader.read_u32()?,
            size: reader.read_u32()?,
            filetype_id: reader.read_u32()?,
        })
    }

    /// True iff both 4-byte tags match; `size` is not consulted
    pub fn is_valid(&self) -> bool {
        self.riff_id == RIFF_ID && self.filetype_id == WAVE_ID
    }

    /// Re-encode as 12 little-endian bytes
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..4].copy_from_slice(&self.riff_id.to_le_bytes());
        out[4..8].copy_from_slice(&self.size.to_le_bytes());
        out[8..12].copy_from_slice(&self.filetype_id.to_le_bytes());
        out
    }
}

/// Per-chunk header (8 bytes); the payload follows immediately
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: u32,
    pub size: u32,
}

impl ChunkHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 8;

    /// Decode from the first 8 bytes of a buffer, if present
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            id: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Read from a byte stream
    pub fn read<R: Read>(reader: &mut ByteReader<R>) -> WaveResult<Self> {
        Ok(Self {
            id: reader.read_u32()?,
            size: reader.read_u32()?,
        })
    }

    /// Payload size rounded up to the even-byte boundary (pad included)
    pub fn padded_size(&self) -> usize {
        (self.size as usize) + ((self.size & 1) as usize)
    }

    /// Re-encode as 8 little-endian bytes
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&self.id.to_le_bytes());
        out[4..8].copy_from_slice(&self.size.to_le_bytes());
        out
    }
}

/// Validate the outer RIFF envelope and WAVE type tag
pub fn validate_header(buf: &[u8]) -> bool {
    RiffHeader::from_bytes(buf).is_some_and(|h| h.is_valid())
}

/// Iterator over the chunks of an in-memory RIFF body
///
/// Starts at byte 12 and yields `(header_offset, header)` pairs, skipping
/// each payload plus the pad byte after odd payloads. The walk window is
/// bounded by the declared RIFF size clamped to the physical buffer, so a
/// lying `riff.size` never drives reads past the end.
pub struct ChunkWalker<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ChunkWalker<'a> {
    /// Walk the chunks of `buf`, whose first 12 bytes are the RiffHeader
    pub fn new(buf: &'a [u8], riff: &RiffHeader) -> Self {
        // riff.size counts from just past its own field, so the declared
        // end is 8 + riff.size from buffer start; the first 4 of those
        // bytes are the WAVE tag already consumed. Clamped to the buffer
        // since riff.size is untrusted input.
        let declared = RiffHeader::SIZE
            .saturating_add(riff.size as usize)
            .saturating_sub(4);
        Self {
            buf,
            pos: RiffHeader::SIZE,
            end: declared.min(buf.len()),
        }
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = (usize, ChunkHeader);

    fn next(&mut self) -> Option<(usize, ChunkHeader)> {
        if self.pos + ChunkHeader::SIZE > self.end {
            return None;
        }
        let header = ChunkHeader::from_bytes(&self.buf[self.pos..])?;
        let offset = self.pos;
        self.pos += ChunkHeader::SIZE + header.padded_size();
        Some((offset, header))
    }
}
