//! Where transcoded blocks are written.

use crate::error::DestinationError;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ptr::NonNull;

/// A buffer that receives a whole transcoded level in one copy.
///
/// Transcoding checks [`check_len`](TranscodeDestination::check_len) before the decode
/// engine runs, then calls [`write_exact`](TranscodeDestination::write_exact) once on
/// success. A failed transcode never writes the destination.
pub trait TranscodeDestination {
    /// Number of bytes the destination currently holds.
    fn capacity(&self) -> usize;

    /// Whether a level of `required` bytes can be written.
    ///
    /// Fixed size destinations must match exactly.
    fn check_len(&self, required: usize) -> Result<(), DestinationError> {
        let actual = self.capacity();
        if actual != required {
            return Err(DestinationError::SizeMismatch { required, actual });
        }
        Ok(())
    }

    /// Copies all of `bytes` into the destination.
    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), DestinationError>;
}

impl TranscodeDestination for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), DestinationError> {
        self.check_len(bytes.len())?;
        self.copy_from_slice(bytes);
        Ok(())
    }
}

impl<const N: usize> TranscodeDestination for [u8; N] {
    fn capacity(&self) -> usize {
        N
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), DestinationError> {
        self.as_mut_slice().write_exact(bytes)
    }
}

/// Resized to the transcoded length on write.
impl TranscodeDestination for Vec<u8> {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn check_len(&self, _required: usize) -> Result<(), DestinationError> {
        Ok(())
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), DestinationError> {
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Memory owned by foreign code, described by a pointer and a length.
#[derive(Debug)]
pub struct RawDestination<'a> {
    ptr: NonNull<u8>,
    capacity: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl RawDestination<'_> {
    /// Wraps `capacity` bytes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// - `ptr` must be valid for writes of `capacity` bytes for the lifetime of the value
    /// - the memory must not be accessed through any other pointer while the value exists
    pub unsafe fn new(ptr: *mut u8, capacity: usize) -> Result<Self, DestinationError> {
        let ptr = NonNull::new(ptr).ok_or(DestinationError::NullPointer)?;
        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }
}

impl TranscodeDestination for RawDestination<'_> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), DestinationError> {
        self.check_len(bytes.len())?;
        // SAFETY: `new` requires `ptr` to be writable for `capacity` bytes, and
        // `bytes.len() == capacity` was checked above.
        unsafe {
            core::ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.as_ptr(), bytes.len());
        }
        Ok(())
    }
}
