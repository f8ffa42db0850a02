//! Scratch memory used while transcoding.
//!
//! Transcoded levels are first written into an aligned scratch allocation, then copied out
//! to wherever the caller wants them. Memory is released when the [`ScratchBuffer`] drops.

use core::alloc::{Layout, LayoutError};
use safe_allocator_api::prelude::AllocError;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated, uninitialized data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let layout = Layout::from_size_align(num_bytes, 64)?;
    Ok(RawAlloc::new(layout)?)
}

/// A zero-initialized, 64-byte aligned buffer of a fixed length.
pub struct ScratchBuffer {
    alloc: RawAlloc,
    len: usize,
}

impl ScratchBuffer {
    /// Allocates `len` zeroed bytes.
    ///
    /// Zero-length buffers cannot be allocated; [`AllocateError::ZeroSized`] is returned instead.
    pub fn new_zeroed(len: usize) -> Result<Self, AllocateError> {
        if len == 0 {
            return Err(AllocateError::ZeroSized);
        }

        let mut alloc = allocate_align_64(len)?;
        // SAFETY: `alloc` owns at least `len` writable bytes.
        unsafe { core::ptr::write_bytes(alloc.as_mut_ptr(), 0, len) };
        Ok(Self { alloc, len })
    }

    /// Number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; zero-length buffers are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The buffer contents.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: The allocation holds `len` initialized bytes and lives as long as `self`.
        unsafe { core::slice::from_raw_parts(self.alloc.as_ptr(), self.len) }
    }

    /// The buffer contents, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: The allocation holds `len` initialized bytes and is uniquely borrowed.
        unsafe { core::slice::from_raw_parts_mut(self.alloc.as_mut_ptr(), self.len) }
    }
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` in `allocate_align_64` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),

    /// A zero-byte allocation was requested.
    #[error("Cannot allocate a zero-sized scratch buffer")]
    ZeroSized,
}
