#![no_main]

// Feeds arbitrary bytes through the host surface. Nothing may panic, and an invalid
// container must answer every query with the zero sentinel.

use basis_transcode_api::{HostBasisFile, SelectorCodebook};
use basis_transcode_container::test_prelude::RecordingSliceDecoder;
use basis_transcode_container::BasisContainerEngine;
use libfuzzer_sys::{arbitrary, fuzz_target};
use std::sync::OnceLock;

type Engine = BasisContainerEngine<RecordingSliceDecoder>;

static CODEBOOK: OnceLock<SelectorCodebook> = OnceLock::new();

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub image_index: u8,
    pub level_index: u8,
    pub format: u8,
    pub bytes: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let codebook = CODEBOOK.get_or_init(SelectorCodebook::new);
    let mut host = HostBasisFile::<Engine>::with_codebook(codebook, &input.bytes);
    let image = input.image_index as u32;
    let level = input.level_index as u32;
    let format = input.format as u32;

    let live = host.file().is_live();
    let images = host.get_num_images();
    let levels = host.get_num_levels(image);
    let size = host.get_image_transcoded_size_in_bytes(image, level, format);
    let _ = host.get_has_alpha();
    let _ = host.get_image_width(image, level);
    let _ = host.get_image_height(image, level);

    if !live {
        assert_eq!(images, 0);
        assert_eq!(levels, 0);
        assert_eq!(size, 0);
    }

    if host.start_transcoding() != 0 && size != 0 {
        let mut output = vec![0u8; size as usize];
        host.transcode_image(output.as_mut_slice(), image, level, format, 0, 0);
    }

    host.close();
    assert_eq!(host.get_num_images(), 0);
});
