#![no_main]

// Builds a valid container, corrupts a few bytes and checks that transcoding either
// fails cleanly or writes exactly the advertised number of bytes.

use basis_transcode_api::{
    BasisFile, SelectorCodebook, TranscodeOptions, TranscoderTextureFormat, TOTAL_TEXTURE_FORMATS,
};
use basis_transcode_container::test_prelude::{BasisFixture, RecordingSliceDecoder};
use basis_transcode_container::BasisContainerEngine;
use libfuzzer_sys::{arbitrary, fuzz_target};

type Engine = BasisContainerEngine<RecordingSliceDecoder>;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub width: u8,
    pub height: u8,
    pub with_alpha: bool,
    pub format: u8,
    pub alpha_for_opaque_formats: bool,
    pub flips: Vec<(u16, u8)>,
}

fuzz_target!(|input: Input| {
    let width = input.width.max(1) as u32;
    let height = input.height.max(1) as u32;
    let mut fixture = BasisFixture::new().image(&[(width, height), (width.div_ceil(2), height.div_ceil(2))]);
    if input.with_alpha {
        fixture = fixture.with_alpha();
    }

    let mut bytes = fixture.build();
    let len = bytes.len();
    for (offset, mask) in input.flips.iter().take(4) {
        bytes[*offset as usize % len] ^= mask;
    }

    let Ok(format) = TranscoderTextureFormat::try_from(input.format as u32 % TOTAL_TEXTURE_FORMATS) else {
        return;
    };
    let codebook = SelectorCodebook::new();
    let mut file = BasisFile::<Engine>::with_codebook(&codebook, &bytes);
    if file.start_transcoding().is_err() {
        return;
    }

    let options = TranscodeOptions::new().alpha_for_opaque_formats(input.alpha_for_opaque_formats);
    for level in 0..2 {
        let Ok(size) = file.transcoded_size(0, level, format) else {
            continue;
        };
        if let Ok(output) = file.transcode_image_to_vec(0, level, format, options) {
            assert_eq!(output.len(), size);
        }
    }
});
