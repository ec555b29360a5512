//! WAVE format descriptor and sample format mapping
//!
//! Covers the classic 16-byte `fmt ` payload only. Supported encodings:
//! - PCM: 8-bit unsigned, 16-bit and 32-bit signed little-endian
//! - IEEE float: 32-bit and 64-bit little-endian
//!
//! 24-bit PCM and WAVEFORMATEXTENSIBLE descriptors are rejected.

use std::io::Read;

use crate::error::WaveResult;
use crate::reader::ByteReader;

// WAV format tags
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;

/// Numeric encoding of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsupported or not yet parsed
    Unknown,
    /// 8-bit unsigned (0..=255, center 128)
    U8,
    /// 16-bit signed little-endian
    S16,
    /// 32-bit signed little-endian
    S32,
    /// IEEE 754 binary32 little-endian
    F32,
    /// IEEE 754 binary64 little-endian
    F64,
}

impl SampleFormat {
    /// Bytes per sample, 0 for `Unknown`
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::Unknown => 0,
            SampleFormat::U8 => 1,
            SampleFormat::S16 => 2,
            SampleFormat::S32 | SampleFormat::F32 => 4,
            SampleFormat::F64 => 8,
        }
    }
}

/// Classic `fmt ` chunk payload (16 bytes, little-endian)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    /// 1 = PCM, 3 = IEEE float
    pub format_tag: u16,
    /// 1 = mono, 2 = stereo, higher counts pass through as reported
    pub channels: u16,
    /// Samples per second per channel
    pub samples_per_sec: u32,
    /// Average bytes per second, as reported
    pub avg_bytes_per_sec: u32,
    /// Bytes per sample frame, as reported
    pub block_align: u16,
    /// 8, 16, 32, or 64
    pub bits_per_sample: u16,
}

impl WaveFormat {
    /// Encoded size in bytes
    pub const SIZE: usize = 16;

    /// Decode from the first 16 bytes of a `fmt ` payload, if present
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            format_tag: u16::from_le_bytes([buf[0], buf[1]]),
            channels: u16::from_le_bytes([buf[2], buf[3]]),
            samples_per_sec: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            avg_bytes_per_sec: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            block_align: u16::from_le_bytes([buf[12], buf[13]]),
            bits_per_sample: u16::from_le_bytes([buf[14], buf[15]]),
        })
    }

    /// Read from a byte stream
    pub fn read<R: Read>(reader: &mut ByteReader<R>) -> WaveResult<Self> {
        Ok(Self {
            format_tag: reader.read_u16()?,
            channels: reader.read_u16()?,
            samples_per_sec: reader.read_u32()?,
            avg_bytes_per_sec: reader.read_u32()?,
            block_align: reader.read_u16()?,
            bits_per_sample: reader.read_u16()?,
        })
    }

    /// True iff `(format_tag, bits_per_sample)` is an accepted pair
    ///
    /// Other fields are not range-checked; callers read them as reported.
    pub fn is_supported(&self) -> bool {
        self.sample_format() != SampleFormat::Unknown
    }

    /// Map `(format_tag, bits_per_sample)` to a sample format
    pub fn sample_format(&self) -> SampleFormat {
        match (self.format_tag, self.bits_per_sample) {
            (WAVE_FORMAT_PCM, 8) => SampleFormat::U8,
            (WAVE_FORMAT_PCM, 16) => SampleFormat::S16,
            (WAVE_FORMAT_PCM, 32) => SampleFormat::S32,
            (WAVE_FORMAT_IEEE_FLOAT, 32) => SampleFormat::F32,
            (WAVE_FORMAT_IEEE_FLOAT, 64) => SampleFormat::F64,
            _ => SampleFormat::Unknown,
        }
    }

    /// Re-encode as 16 little-endian bytes
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..2].copy_from_slice(&self.format_tag.to_le_bytes());
        out[2..4].copy_from_slice(&self.channels.to_le_bytes());
        out[4..8].copy_from_slice(&self.samples_per_sec.to_le_bytes());
        out[8..12].copy_from_slice(&self.avg_bytes_per_sec.to_le_bytes());
        out[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        out[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out
    }
}
