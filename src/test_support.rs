//! Builders and fakes for the unit tests

use std::cell::Cell;
use std::ptr::NonNull;

use crate::alloc::{Allocator, HeapAllocator};
use crate::format::{WaveFormat, WAVE_FORMAT_PCM};

/// Heap allocator that counts outstanding blocks
pub(crate) struct CountingAllocator {
    pub live: Cell<isize>,
    inner: HeapAllocator,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self {
            live: Cell::new(0),
            inner: HeapAllocator,
        }
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let ptr = self.inner.allocate(size)?;
        self.live.set(self.live.get() + 1);
        Some(ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        self.live.set(self.live.get() - 1);
        self.inner.free(ptr, size);
    }
}

/// Allocator that always refuses, for failure-path tests
pub(crate) struct FailingAllocator;

impl Allocator for FailingAllocator {
    fn allocate(&self, _size: usize) -> Option<NonNull<u8>> {
        None
    }

    unsafe fn free(&self, _ptr: NonNull<u8>, _size: usize) {
        unreachable!("nothing was ever allocated");
    }
}

/// Assembles a RIFF/WAVE byte image chunk by chunk
pub(crate) struct WaveBuilder {
    chunks: Vec<u8>,
}

impl WaveBuilder {
    /// Start with no chunks at all
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Start with a classic PCM `fmt ` chunk
    pub fn pcm(bits: u16, channels: u16, rate: u32) -> Self {
        Self::new().format(WAVE_FORMAT_PCM, bits, channels, rate)
    }

    /// Append a 16-byte `fmt ` chunk with derived rate fields
    pub fn format(self, tag: u16, bits: u16, channels: u16, rate: u32) -> Self {
        let block_align = channels * (bits / 8);
        let format = WaveFormat {
            format_tag: tag,
            channels,
            samples_per_sec: rate,
            avg_bytes_per_sec: rate * block_align as u32,
            block_align,
            bits_per_sample: bits,
        };
        self.chunk(*b"fmt ", &format.to_bytes())
    }

    /// Append a `data` chunk with the given payload
    pub fn data(self, payload: &[u8]) -> Self {
        self.chunk(*b"data", payload)
    }

    /// Append an arbitrary chunk, padding odd payloads with one zero byte
    pub fn chunk(mut self, id: [u8; 4], payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(&id);
        self.chunks
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.chunks.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            self.chunks.push(0);
        }
        self
    }

    /// Wrap the chunks in the outer RIFF/WAVE envelope
    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.chunks.len());
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((self.chunks.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&self.chunks);
        out
    }
}
