#![doc = include_str!("../README.MD")]
#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_prelude;

pub mod basis;
pub mod engine;
pub mod slice_decoder;

pub use basis::{validate_file_checksums, validate_header, BasisHeader, SliceDesc};
pub use engine::BasisContainerEngine;
pub use slice_decoder::{PaletteSection, SliceDecoder, SliceTranscode};
