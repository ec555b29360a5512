//! Byte cursor with typed little-endian reads and relative seeks
//!
//! Wraps any `Read` source (in-memory `Cursor` or a seekable stream) and
//! tracks the absolute position so loaders can record chunk offsets without
//! extra `stream_position` calls.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{WaveError, WaveResult};

/// Cursor over a byte source, counting consumed bytes
pub struct ByteReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> ByteReader<R> {
    /// Create a reader positioned at the start of `inner`
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Absolute byte position from the start of the source
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Fill `buf` completely, failing with `ShortRead` on early EOF
    pub fn read_exact(&mut self, buf: &mut [u8]) -> WaveResult<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.pos += filled as u64;
                    return Err(WaveError::ShortRead {
                        wanted: buf.len(),
                        got: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.pos += filled as u64;
                    return Err(WaveError::Io(e.to_string()));
                }
            }
        }
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self) -> WaveResult<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self) -> WaveResult<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

impl<R: Read + Seek> ByteReader<R> {
    /// Seek forward `n` bytes without reading the payload
    pub fn skip(&mut self, n: u64) -> WaveResult<()> {
        self.inner
            .seek(SeekFrom::Current(n as i64))
            .map_err(|e| WaveError::Io(e.to_string()))?;
        self.pos += n;
        Ok(())
    }
}
