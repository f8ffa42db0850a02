//! Error types for container handle operations.

use basis_transcode_common::allocate::AllocateError;
use basis_transcode_common::UnsupportedFormatError;
use thiserror::Error;

/// Errors returned by metadata queries on a [`BasisFile`](crate::BasisFile).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasisFileError {
    /// The container failed header validation when the handle was created.
    #[error("The container failed header validation.")]
    InvalidHeader,

    /// The handle has been closed.
    #[error("The handle has been closed.")]
    Closed,

    /// The global codebook was not installed before the handle was created.
    #[error("The global codebook is not initialized. Call `initialize()` first.")]
    NotInitialized,

    /// The container has no image with this index.
    #[error("Image {image_index} does not exist.")]
    ImageNotFound {
        /// The requested image
        image_index: u32,
    },

    /// The image has no level with this index.
    #[error("Level {level_index} of image {image_index} does not exist.")]
    LevelNotFound {
        /// The requested image
        image_index: u32,
        /// The requested level
        level_index: u32,
    },

    /// The format code does not name a supported format.
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),
}

/// Errors returned by the transcode protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The handle cannot serve the request.
    #[error(transparent)]
    File(#[from] BasisFileError),

    /// [`start_transcoding`](crate::BasisFile::start_transcoding) has not succeeded on this handle.
    #[error("Transcoding has not been started on this handle.")]
    NotStarted,

    /// The level contains no blocks.
    #[error("The requested level contains no blocks.")]
    EmptyLevel,

    /// The transcoded size does not fit in memory.
    #[error("The transcoded size overflows.")]
    SizeOverflow,

    /// The destination cannot hold exactly the transcoded level.
    #[error("Destination size mismatch: need exactly {required} bytes, but {actual} bytes available.")]
    DestinationSizeMismatch {
        /// The transcoded size in bytes
        required: usize,
        /// The destination size in bytes
        actual: usize,
    },

    /// Writing the destination failed.
    #[error(transparent)]
    Destination(#[from] DestinationError),

    /// Scratch memory could not be allocated.
    #[error("Memory allocation failed: {0}")]
    Allocate(#[from] AllocateError),

    /// The decode engine reported failure.
    #[error("The decode engine failed to transcode the level.")]
    EngineFailed,
}

/// Errors raised by [`TranscodeDestination`](crate::TranscodeDestination) implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// The destination pointer was null.
    #[error("Null destination pointer.")]
    NullPointer,

    /// The bytes do not match the destination size.
    #[error("Destination holds {actual} bytes, cannot write {required}.")]
    SizeMismatch {
        /// Number of bytes being written
        required: usize,
        /// The destination size in bytes
        actual: usize,
    },
}
