//! Descriptors for the images and mip levels stored inside a container.
//!
//! These are computed on demand by a [`DecodeEngine`](crate::DecodeEngine) and are never cached.

/// Dimensions and block count of a single mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageLevelDesc {
    /// Width of the level in pixels, before any block padding.
    pub orig_width: u32,
    /// Height of the level in pixels, before any block padding.
    pub orig_height: u32,
    /// Number of 4x4 blocks the level occupies.
    pub total_blocks: u32,
}

impl ImageLevelDesc {
    /// Size of this level once transcoded into blocks of `bytes_per_block` bytes.
    ///
    /// Returns [`None`] on overflow.
    #[inline]
    pub fn transcoded_size(&self, bytes_per_block: u32) -> Option<u32> {
        self.total_blocks.checked_mul(bytes_per_block)
    }
}

/// Detailed information about one mip level of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageLevelInfo {
    pub image_index: u32,
    pub level_index: u32,
    pub orig_width: u32,
    pub orig_height: u32,
    pub num_blocks_x: u32,
    pub num_blocks_y: u32,
    pub total_blocks: u32,
    /// The level carries alpha data.
    pub alpha_flag: bool,
}

/// Information about an image, taken from its base level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageInfo {
    pub image_index: u32,
    /// Number of mip levels stored for the image.
    pub total_levels: u32,
    pub orig_width: u32,
    pub orig_height: u32,
    pub num_blocks_x: u32,
    pub num_blocks_y: u32,
    pub total_blocks: u32,
    /// The image carries alpha data.
    pub alpha_flag: bool,
}
