//! Pluggable allocator used by the stream loaders
//!
//! Loaders acquire exactly one block per wave (the full file image or the
//! small metadata scratch region) and hand it back through
//! [`OwnedWave::release`](crate::OwnedWave::release). `free` always receives
//! the exact byte count originally requested, so arena and bump allocators
//! can implement this trait without tracking sizes themselves.

use std::alloc::Layout;
use std::ptr::NonNull;

/// Allocate/free pair threaded through the stream loaders
pub trait Allocator {
    /// Acquire a zero-initialized block of `size` bytes
    ///
    /// Returns `None` when the allocation cannot be satisfied. `size` is
    /// never zero; loaders reject empty inputs before allocating.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Return a block previously obtained from `allocate`
    ///
    /// # Safety
    /// `ptr` must have come from `allocate` on this same allocator with
    /// this same `size`, and must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize);
}

/// Default allocator backed by the global heap
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let layout = Layout::array::<u8>(size).ok()?;
        if layout.size() == 0 {
            return None;
        }
        // Zeroed so partially filled blocks (capped fmt reads) stay defined.
        NonNull::new(unsafe { std::alloc::alloc_zeroed(layout) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        // Same layout that allocate() built; it was valid then.
        let layout = Layout::from_size_align_unchecked(size, 1);
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

/// A block checked out of an [`Allocator`], with its exact requested size
///
/// Does not free itself on drop: the loaders do not retain the allocator,
/// so the paired release must happen through [`crate::OwnedWave::release`]
/// with the same allocator the wave was loaded with.
#[derive(Debug)]
pub(crate) struct OwnedBuffer {
    ptr: NonNull<u8>,
    size: usize,
}

// The block is uniquely owned heap memory; nothing aliases it.
unsafe impl Send for OwnedBuffer {}
unsafe impl Sync for OwnedBuffer {}

impl OwnedBuffer {
    /// Acquire `size` zeroed bytes from `allocator`
    pub(crate) fn allocate(allocator: &dyn Allocator, size: usize) -> Option<Self> {
        let ptr = allocator.allocate(size)?;
        Some(Self { ptr, size })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // ptr/size come from a successful allocate of exactly size bytes
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }

    /// Return the block to `allocator`, consuming the handle
    pub(crate) fn release(self, allocator: &dyn Allocator) {
        unsafe { allocator.free(self.ptr, self.size) };
    }
}
