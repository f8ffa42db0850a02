#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]

//! # Example
//!
//! ```ignore
//! use basis_transcode_api::{initialize, BasisFile, TranscodeOptions, TranscoderTextureFormat};
//!
//! initialize();
//! let mut file = BasisFile::<MyEngine>::open(&bytes)?;
//! file.start_transcoding()?;
//!
//! let format = TranscoderTextureFormat::Bc1;
//! let mut blocks = vec![0u8; file.transcoded_size(0, 0, format)?];
//! file.transcode_image(blocks.as_mut_slice(), 0, 0, format, TranscodeOptions::new())?;
//! ```

extern crate alloc;

#[cfg(test)]
pub mod test_prelude;

pub mod basis_file;
pub mod destination;
pub mod error;
pub mod host;
pub mod state;
pub mod transcode;

pub use basis_file::BasisFile;
pub use destination::{RawDestination, TranscodeDestination};
pub use error::{BasisFileError, DestinationError, TranscodeError};
pub use host::HostBasisFile;
pub use state::HandleState;
pub use transcode::TranscodeOptions;

// Re-export the types callers need alongside the handle
#[cfg(feature = "std")]
pub use basis_transcode_common::initialize;
pub use basis_transcode_common::{
    DecodeEngine, DecodeFlags, SelectorCodebook, TranscoderTextureFormat, UnsupportedFormatError,
    TOTAL_TEXTURE_FORMATS,
};
