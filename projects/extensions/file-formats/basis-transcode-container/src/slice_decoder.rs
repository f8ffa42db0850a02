//! The bit-level decoding contract used by [`BasisContainerEngine`](crate::BasisContainerEngine).

use crate::basis::SliceDesc;
use basis_transcode_common::{DecodeFlags, SelectorCodebook, TranscoderTextureFormat};

/// A palette section of the file (endpoint or selector codebook).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteSection<'a> {
    /// Number of entries declared by the header.
    pub total_entries: u32,
    /// The compressed section bytes.
    pub data: &'a [u8],
}

/// Everything needed to transcode one image level.
#[derive(Debug, Clone, Copy)]
pub struct SliceTranscode<'a> {
    /// Descriptor of the slice that provides the level's primary data.
    pub slice: SliceDesc,
    /// Compressed bytes of that slice.
    pub slice_data: &'a [u8],
    /// Compressed bytes of the matching alpha slice, when the target format stores alpha
    /// and the file has alpha data.
    pub alpha_data: Option<&'a [u8]>,
    /// Requested output format.
    pub format: TranscoderTextureFormat,
    /// Options forwarded from the caller.
    pub flags: DecodeFlags,
}

/// Decodes the compressed payloads of a `.basis` file.
///
/// A decoder is stateful: [`decode_palettes`](SliceDecoder::decode_palettes) and
/// [`decode_tables`](SliceDecoder::decode_tables) unpack shared sections that every
/// later [`transcode_slice`](SliceDecoder::transcode_slice) call relies on.
pub trait SliceDecoder: Default {
    /// Unpacks the endpoint and selector codebooks.
    fn decode_palettes(
        &mut self,
        codebook: &SelectorCodebook,
        endpoints: PaletteSection<'_>,
        selectors: PaletteSection<'_>,
    ) -> bool;

    /// Unpacks the Huffman tables used by the slice bitstreams.
    fn decode_tables(&mut self, tables: &[u8]) -> bool;

    /// Writes `request.slice.total_blocks()` blocks of `request.format` to the start of
    /// `output`.
    fn transcode_slice(
        &self,
        codebook: &SelectorCodebook,
        request: &SliceTranscode<'_>,
        output: &mut [u8],
    ) -> bool;
}
