//! Common test imports and utilities for API tests
#![allow(unused_imports)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use alloc::{boxed::Box, vec, vec::Vec};

pub use rstest::rstest;

use basis_transcode_common::{
    DecodeEngine, DecodeFlags, ImageInfo, ImageLevelDesc, ImageLevelInfo, SelectorCodebook,
    TranscoderTextureFormat,
};
use core::cell::Cell;

/// A [`DecodeEngine`] that serves metadata from a list of level sizes and counts calls.
///
/// Any non-empty container passes validation unless [`MockEngine::invalid`] is used.
#[derive(Debug)]
pub struct MockEngine {
    images: Vec<Vec<(u32, u32)>>,
    alpha: bool,
    valid: bool,
    pub start_ok: bool,
    pub transcode_ok: bool,
    fill: u8,
    pub query_calls: Cell<u32>,
    pub start_calls: Cell<u32>,
    pub transcode_calls: Cell<u32>,
    /// Block count and flags of the last transcode.
    pub last_transcode: Cell<Option<(u32, DecodeFlags)>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            alpha: false,
            valid: true,
            start_ok: true,
            transcode_ok: true,
            fill: 0xB5,
            query_calls: Cell::new(0),
            start_calls: Cell::new(0),
            transcode_calls: Cell::new(0),
            last_transcode: Cell::new(None),
        }
    }
}

impl MockEngine {
    /// A valid engine with no images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image with one level per `(width, height)` entry.
    pub fn image(mut self, levels: &[(u32, u32)]) -> Self {
        self.images.push(levels.to_vec());
        self
    }

    /// Reports every level as carrying alpha.
    pub fn with_alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    /// Fails header validation.
    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    /// Fails `start_transcoding`.
    pub fn failing_start(mut self) -> Self {
        self.start_ok = false;
        self
    }

    /// Fails every transcode without touching the output.
    pub fn failing_transcode(mut self) -> Self {
        self.transcode_ok = false;
        self
    }

    /// Byte written to every output position on a successful transcode.
    pub fn fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    fn level(&self, image_index: u32, level_index: u32) -> Option<(u32, u32)> {
        self.query_calls.set(self.query_calls.get() + 1);
        self.images
            .get(image_index as usize)?
            .get(level_index as usize)
            .copied()
    }
}

fn blocks(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(4), height.div_ceil(4))
}

impl DecodeEngine for MockEngine {
    fn validate_header(&self, data: &[u8]) -> bool {
        self.valid && !data.is_empty()
    }

    fn total_images(&self, _data: &[u8]) -> u32 {
        self.query_calls.set(self.query_calls.get() + 1);
        self.images.len() as u32
    }

    fn image_info(&self, _data: &[u8], image_index: u32) -> Option<ImageInfo> {
        let (orig_width, orig_height) = self.level(image_index, 0)?;
        let (num_blocks_x, num_blocks_y) = blocks(orig_width, orig_height);
        Some(ImageInfo {
            image_index,
            total_levels: self.images[image_index as usize].len() as u32,
            orig_width,
            orig_height,
            num_blocks_x,
            num_blocks_y,
            total_blocks: num_blocks_x * num_blocks_y,
            alpha_flag: self.alpha,
        })
    }

    fn image_level_info(
        &self,
        _data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelInfo> {
        let (orig_width, orig_height) = self.level(image_index, level_index)?;
        let (num_blocks_x, num_blocks_y) = blocks(orig_width, orig_height);
        Some(ImageLevelInfo {
            image_index,
            level_index,
            orig_width,
            orig_height,
            num_blocks_x,
            num_blocks_y,
            total_blocks: num_blocks_x * num_blocks_y,
            alpha_flag: self.alpha,
        })
    }

    fn image_level_desc(
        &self,
        _data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelDesc> {
        let (orig_width, orig_height) = self.level(image_index, level_index)?;
        let (num_blocks_x, num_blocks_y) = blocks(orig_width, orig_height);
        Some(ImageLevelDesc {
            orig_width,
            orig_height,
            total_blocks: num_blocks_x * num_blocks_y,
        })
    }

    fn start_transcoding(&mut self, _codebook: &SelectorCodebook, _data: &[u8]) -> bool {
        self.start_calls.set(self.start_calls.get() + 1);
        self.start_ok
    }

    fn transcode_image_level(
        &self,
        _codebook: &SelectorCodebook,
        _data: &[u8],
        _image_index: u32,
        _level_index: u32,
        output: &mut [u8],
        output_blocks: u32,
        _format: TranscoderTextureFormat,
        flags: DecodeFlags,
    ) -> bool {
        self.transcode_calls.set(self.transcode_calls.get() + 1);
        self.last_transcode.set(Some((output_blocks, flags)));
        if !self.transcode_ok {
            return false;
        }

        output.fill(self.fill);
        true
    }
}
