//! The contract between a container handle and the engine that decodes it.

use crate::{
    DecodeFlags, ImageInfo, ImageLevelDesc, ImageLevelInfo, SelectorCodebook,
    TranscoderTextureFormat,
};

/// A decode engine understands the layout of an encoded texture container and can
/// transcode its levels into GPU block formats.
///
/// Every method receives the full container bytes; an engine keeps no reference to them.
/// An engine instance belongs to exactly one container handle, so state prepared by
/// [`DecodeEngine::start_transcoding`] is specific to that container.
///
/// Implementations are trusted: the handle does not re-validate what the engine reports.
pub trait DecodeEngine {
    /// Checks that `data` starts with a structurally valid container header.
    fn validate_header(&self, data: &[u8]) -> bool;

    /// Number of images stored in the container. Zero on failure.
    fn total_images(&self, data: &[u8]) -> u32;

    /// Information about an image, or [`None`] if the image does not exist.
    fn image_info(&self, data: &[u8], image_index: u32) -> Option<ImageInfo>;

    /// Information about a single level, or [`None`] if the level does not exist.
    fn image_level_info(
        &self,
        data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelInfo>;

    /// Dimensions and block count of a level, or [`None`] if the level does not exist.
    fn image_level_desc(
        &self,
        data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelDesc>;

    /// Unpacks the shared sections of the container (codebooks, tables) so levels can be
    /// transcoded. Calling this again on the same container is allowed.
    fn start_transcoding(&mut self, codebook: &SelectorCodebook, data: &[u8]) -> bool;

    /// Transcodes one level into `output`, which holds room for `output_blocks` blocks of
    /// `format`.
    #[allow(clippy::too_many_arguments)]
    fn transcode_image_level(
        &self,
        codebook: &SelectorCodebook,
        data: &[u8],
        image_index: u32,
        level_index: u32,
        output: &mut [u8],
        output_blocks: u32,
        format: TranscoderTextureFormat,
        flags: DecodeFlags,
    ) -> bool;
}
