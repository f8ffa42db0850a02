//! [`DecodeEngine`] implementation for `.basis` files.

use crate::basis::{
    find_slice, slice_descs, validate_file_checksums, validate_header, validate_header_quick,
    BasisHeader, SliceDesc,
};
use crate::slice_decoder::{PaletteSection, SliceDecoder, SliceTranscode};
use basis_transcode_common::{
    DecodeEngine, DecodeFlags, ImageInfo, ImageLevelDesc, ImageLevelInfo, SelectorCodebook,
    TranscoderTextureFormat,
};

/// Decodes `.basis` files, delegating slice payloads to a [`SliceDecoder`].
///
/// The engine answers all metadata queries from the header and slice descriptors alone.
/// Transcoding additionally requires [`DecodeEngine::start_transcoding`] to have
/// succeeded for the same file.
///
/// Payload checksums are not verified by default. Use
/// [`verifying_checksums`](BasisContainerEngine::verifying_checksums) to also reject files
/// whose data or slice checksums do not match.
#[derive(Debug, Default)]
pub struct BasisContainerEngine<D: SliceDecoder> {
    decoder: D,
    ready: bool,
    verify_checksums: bool,
}

impl<D: SliceDecoder> BasisContainerEngine<D> {
    /// Creates an engine around a fresh decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose header validation also checks the data and slice checksums.
    pub fn verifying_checksums() -> Self {
        Self {
            verify_checksums: true,
            ..Self::default()
        }
    }

    /// The slice decoder this engine delegates to.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Whether the shared sections have been unpacked.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn prepare(&mut self, codebook: &SelectorCodebook, data: &[u8]) -> Option<bool> {
        let header = validate_header_quick(data)?;
        if header.endpoint_cb_file_size == 0
            || header.selector_cb_file_size == 0
            || header.tables_file_size == 0
        {
            return None;
        }

        let endpoints = PaletteSection {
            total_entries: header.total_endpoints,
            data: section(data, header.endpoint_cb_file_ofs, header.endpoint_cb_file_size)?,
        };
        let selectors = PaletteSection {
            total_entries: header.total_selectors,
            data: section(data, header.selector_cb_file_ofs, header.selector_cb_file_size)?,
        };
        let tables = section(data, header.tables_file_ofs, header.tables_file_size)?;

        Some(
            self.decoder.decode_palettes(codebook, endpoints, selectors)
                && self.decoder.decode_tables(tables),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn transcode(
        &self,
        codebook: &SelectorCodebook,
        data: &[u8],
        image_index: u32,
        level_index: u32,
        output: &mut [u8],
        output_blocks: u32,
        format: TranscoderTextureFormat,
        flags: DecodeFlags,
    ) -> Option<bool> {
        let header = validate_header_quick(data)?;
        let (_, colour) = find_slice(data, &header, image_index, level_index, false)?;

        let total_blocks = colour.total_blocks();
        if output_blocks < total_blocks {
            return None;
        }

        let required = total_blocks as usize * format.bytes_per_block() as usize;
        let output = output.get_mut(..required)?;

        let alpha = if header.has_alpha_slices() {
            let (_, alpha) = find_slice(data, &header, image_index, level_index, true)?;
            if alpha.num_blocks_x != colour.num_blocks_x || alpha.num_blocks_y != colour.num_blocks_y
            {
                return None;
            }
            Some(alpha)
        } else {
            None
        };

        let (primary, alpha_data) = match alpha {
            Some(alpha) if format.has_alpha() => (colour, Some(alpha.data(data)?)),
            Some(alpha) if flags.transcode_alpha_to_opaque_formats() => (alpha, None),
            _ => (colour, None),
        };

        let request = SliceTranscode {
            slice: primary,
            slice_data: primary.data(data)?,
            alpha_data,
            format,
            flags,
        };
        Some(self.decoder.transcode_slice(codebook, &request, output))
    }
}

/// Returns the `size` bytes at `ofs`, or [`None`] if they are not inside `data`.
fn section(data: &[u8], ofs: u32, size: u32) -> Option<&[u8]> {
    let start = ofs as usize;
    let end = start.checked_add(size as usize)?;
    data.get(start..end)
}

fn level_info(header: &BasisHeader, slice: &SliceDesc) -> ImageLevelInfo {
    ImageLevelInfo {
        image_index: slice.image_index,
        level_index: slice.level_index,
        orig_width: slice.orig_width,
        orig_height: slice.orig_height,
        num_blocks_x: slice.num_blocks_x,
        num_blocks_y: slice.num_blocks_y,
        total_blocks: slice.total_blocks(),
        alpha_flag: header.has_alpha_slices(),
    }
}

impl<D: SliceDecoder> DecodeEngine for BasisContainerEngine<D> {
    fn validate_header(&self, data: &[u8]) -> bool {
        validate_header(data) && (!self.verify_checksums || validate_file_checksums(data, true))
    }

    fn total_images(&self, data: &[u8]) -> u32 {
        validate_header_quick(data)
            .map(|header| header.total_images)
            .unwrap_or(0)
    }

    fn image_info(&self, data: &[u8], image_index: u32) -> Option<ImageInfo> {
        let header = validate_header_quick(data)?;
        if image_index >= header.total_images {
            return None;
        }

        let (_, base) = find_slice(data, &header, image_index, 0, false)?;
        let total_levels = slice_descs(data, &header)
            .filter(|slice| slice.image_index == image_index && !slice.is_alpha())
            .map(|slice| slice.level_index + 1)
            .max()
            .unwrap_or(0);

        Some(ImageInfo {
            image_index,
            total_levels,
            orig_width: base.orig_width,
            orig_height: base.orig_height,
            num_blocks_x: base.num_blocks_x,
            num_blocks_y: base.num_blocks_y,
            total_blocks: base.total_blocks(),
            alpha_flag: header.has_alpha_slices(),
        })
    }

    fn image_level_info(
        &self,
        data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelInfo> {
        let header = validate_header_quick(data)?;
        let (_, slice) = find_slice(data, &header, image_index, level_index, false)?;
        Some(level_info(&header, &slice))
    }

    fn image_level_desc(
        &self,
        data: &[u8],
        image_index: u32,
        level_index: u32,
    ) -> Option<ImageLevelDesc> {
        let header = validate_header_quick(data)?;
        let (_, slice) = find_slice(data, &header, image_index, level_index, false)?;
        Some(ImageLevelDesc {
            orig_width: slice.orig_width,
            orig_height: slice.orig_height,
            total_blocks: slice.total_blocks(),
        })
    }

    fn start_transcoding(&mut self, codebook: &SelectorCodebook, data: &[u8]) -> bool {
        self.ready = self.prepare(codebook, data).unwrap_or(false);
        self.ready
    }

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
    ) -> bool {
        if !self.ready {
            tracing::warn!("transcode requested before the .basis tables were unpacked");
            return false;
        }

        self.transcode(
            codebook,
            data,
            image_index,
            level_index,
            output,
            output_blocks,
            format,
            flags,
        )
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use rstest::rstest;

    type Engine = BasisContainerEngine<RecordingSliceDecoder>;

    fn started(file: &[u8]) -> Engine {
        let mut engine = Engine::new();
        assert!(engine.start_transcoding(&SelectorCodebook::new(), file));
        engine
    }

    #[test]
    fn reports_counts_and_dimensions() {
        let file = BasisFixture::new()
            .image(&[(64, 32), (32, 16)])
            .image(&[(5, 7)])
            .build();
        let engine = Engine::new();

        assert!(engine.validate_header(&file));
        assert_eq!(engine.total_images(&file), 2);

        let info = engine.image_info(&file, 0).unwrap();
        assert_eq!(info.total_levels, 2);
        assert_eq!((info.orig_width, info.orig_height), (64, 32));
        assert!(!info.alpha_flag);

        let desc = engine.image_level_desc(&file, 1, 0).unwrap();
        assert_eq!((desc.orig_width, desc.orig_height), (5, 7));
        assert_eq!(desc.total_blocks, 2 * 2);

        assert!(engine.image_info(&file, 2).is_none());
        assert!(engine.image_level_desc(&file, 0, 2).is_none());
        assert!(engine.image_level_info(&file, 1, 1).is_none());
    }

    #[test]
    fn alpha_files_count_colour_levels_only() {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(16, 16), (8, 8), (4, 4)])
            .build();
        let engine = Engine::new();

        let info = engine.image_info(&file, 0).unwrap();
        assert_eq!(info.total_levels, 3);
        assert!(info.alpha_flag);
        assert!(engine.image_level_info(&file, 0, 0).unwrap().alpha_flag);
    }

    #[test]
    fn garbage_yields_no_metadata() {
        let engine = Engine::new();
        let garbage = [0xFFu8; 128];
        assert!(!engine.validate_header(&garbage));
        assert_eq!(engine.total_images(&garbage), 0);
        assert!(engine.image_info(&garbage, 0).is_none());
        assert!(engine.image_level_desc(&[], 0, 0).is_none());
    }

    #[test]
    fn start_transcoding_hands_sections_to_decoder() {
        let file = BasisFixture::new().image(&[(4, 4)]).build();
        let engine = started(&file);

        assert!(engine.is_ready());
        let decoder = engine.decoder();
        assert_eq!(decoder.endpoints.as_deref(), Some(ENDPOINT_SECTION.as_slice()));
        assert_eq!(decoder.selectors.as_deref(), Some(SELECTOR_SECTION.as_slice()));
        assert_eq!(decoder.tables.as_deref(), Some(TABLES_SECTION.as_slice()));
    }

    #[test]
    fn start_transcoding_fails_on_missing_sections() {
        let file = BasisFixture::new()
            .image(&[(4, 4)])
            .patch_header(|header| header.tables_file_size = 0)
            .build();
        let mut engine = Engine::new();
        assert!(!engine.start_transcoding(&SelectorCodebook::new(), &file));
        assert!(!engine.is_ready());
    }

    #[test]
    fn start_transcoding_reports_decoder_failure() {
        let file = BasisFixture::new().image(&[(4, 4)]).build();
        let mut engine = Engine::new();
        let codebook = SelectorCodebook::new();
        assert!(engine.start_transcoding(&codebook, &file));

        let broken = BasisFixture::new()
            .image(&[(4, 4)])
            .patch_header(|header| header.total_selectors = 0)
            .build();
        assert!(!engine.start_transcoding(&codebook, &broken));
        assert!(!engine.is_ready());
    }

    #[test]
    fn transcode_requires_start() {
        let file = BasisFixture::new().image(&[(4, 4)]).build();
        let engine = Engine::new();
        let mut output = [0u8; 8];
        assert!(!engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            1,
            TranscoderTextureFormat::Bc1,
            DecodeFlags::default(),
        ));
        assert_eq!(output, [0u8; 8]);
    }

    #[rstest]
    #[case(TranscoderTextureFormat::Etc1)]
    #[case(TranscoderTextureFormat::Bc1)]
    #[case(TranscoderTextureFormat::Bc7M6OpaqueOnly)]
    #[case(TranscoderTextureFormat::Bc3)]
    fn transcode_fills_every_block(#[case] format: TranscoderTextureFormat) {
        let file = BasisFixture::new().image(&[(13, 9)]).build();
        let engine = started(&file);
        let blocks = 4 * 3;
        let mut output = vec![0u8; blocks * format.bytes_per_block() as usize];

        assert!(engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            blocks as u32,
            format,
            DecodeFlags::default(),
        ));
        assert!(output.iter().all(|&b| b == slice_tag(0, 0, false)));
    }

    #[test]
    fn transcode_rejects_small_capacity() {
        let file = BasisFixture::new().image(&[(8, 8)]).build();
        let engine = started(&file);
        let mut output = vec![0u8; 4 * 8];

        assert!(!engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            3,
            TranscoderTextureFormat::Bc1,
            DecodeFlags::default(),
        ));
        assert!(output.iter().all(|&b| b == 0));
    }

    #[rstest]
    #[case::opaque_format_uses_colour(TranscoderTextureFormat::Bc1, false, false, false)]
    #[case::alpha_format_gets_both(TranscoderTextureFormat::Bc3, false, false, true)]
    #[case::alpha_to_opaque(TranscoderTextureFormat::Bc1, true, true, false)]
    #[case::alpha_to_opaque_ignored_for_alpha_formats(TranscoderTextureFormat::Etc2, true, false, true)]
    fn transcode_selects_alpha_slices(
        #[case] format: TranscoderTextureFormat,
        #[case] alpha_to_opaque: bool,
        #[case] expect_primary_alpha: bool,
        #[case] expect_alpha_data: bool,
    ) {
        let file = BasisFixture::new().with_alpha().image(&[(4, 4)]).build();
        let engine = started(&file);
        let mut flags = DecodeFlags::default();
        flags.set_transcode_alpha_to_opaque_formats(alpha_to_opaque);
        let mut output = vec![0u8; format.bytes_per_block() as usize];

        assert!(engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            1,
            format,
            flags,
        ));

        let last = engine.decoder().last_request.get().unwrap();
        assert_eq!(last.primary_is_alpha, expect_primary_alpha);
        assert_eq!(last.had_alpha_data, expect_alpha_data);
        assert_eq!(last.format, format);
    }

    #[rstest]
    #[case::alpha_format(TranscoderTextureFormat::Bc3, false)]
    #[case::alpha_to_opaque(TranscoderTextureFormat::Bc1, true)]
    fn transcode_rejects_alpha_slice_with_other_dimensions(
        #[case] format: TranscoderTextureFormat,
        #[case] alpha_to_opaque: bool,
    ) {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(8, 8)])
            .patch_slice(1, |slice| slice.num_blocks_x = 8)
            .build();
        let engine = started(&file);
        let mut flags = DecodeFlags::default();
        flags.set_transcode_alpha_to_opaque_formats(alpha_to_opaque);
        let mut output = vec![0u8; 4 * format.bytes_per_block() as usize];

        assert!(!engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            4,
            format,
            flags,
        ));
        assert!(output.iter().all(|&b| b == 0));
        assert_eq!(engine.decoder().transcode_calls.get(), 0);
    }

    #[rstest]
    #[case::alpha_format(TranscoderTextureFormat::Bc3, false)]
    #[case::alpha_to_opaque(TranscoderTextureFormat::Bc1, true)]
    #[case::opaque_format(TranscoderTextureFormat::Bc1, false)]
    fn transcode_rejects_missing_alpha_slice(
        #[case] format: TranscoderTextureFormat,
        #[case] alpha_to_opaque: bool,
    ) {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(4, 4)])
            .patch_slice(1, |slice| slice.level_index = 5)
            .build();
        let engine = started(&file);
        let mut flags = DecodeFlags::default();
        flags.set_transcode_alpha_to_opaque_formats(alpha_to_opaque);
        let mut output = vec![0u8; format.bytes_per_block() as usize];

        assert!(!engine.validate_header(&file));
        assert!(!engine.transcode_image_level(
            &SelectorCodebook::new(),
            &file,
            0,
            0,
            &mut output,
            1,
            format,
            flags,
        ));
        assert_eq!(engine.decoder().transcode_calls.get(), 0);
    }

    #[test]
    fn level_count_follows_highest_level_index() {
        let file = BasisFixture::new()
            .image(&[(8, 8), (4, 4)])
            .patch_slice(1, |slice| slice.level_index = 0)
            .build();
        let engine = Engine::new();

        assert!(!engine.validate_header(&file));
        assert_eq!(engine.image_info(&file, 0).unwrap().total_levels, 1);
    }

    #[test]
    fn checksum_verification_is_opt_in() {
        let mut file = BasisFixture::new().image(&[(8, 8)]).build();
        let last = file.len() - 1;
        file[last] ^= 0xFF;

        assert!(Engine::new().validate_header(&file));
        assert!(!Engine::verifying_checksums().validate_header(&file));

        let intact = BasisFixture::new().image(&[(8, 8)]).build();
        assert!(Engine::verifying_checksums().validate_header(&intact));
    }
}
