#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allocate;
pub mod codebook;
pub mod decode_flags;
pub mod engine;
pub mod format;
pub mod level;

pub use codebook::SelectorCodebook;
#[cfg(feature = "std")]
pub use codebook::{global_codebook, initialize};
pub use decode_flags::DecodeFlags;
pub use engine::DecodeEngine;
pub use format::{TranscoderTextureFormat, UnsupportedFormatError, TOTAL_TEXTURE_FORMATS};
pub use level::{ImageInfo, ImageLevelDesc, ImageLevelInfo};
