//! Common test imports and `.basis` fixture helpers
//!
//! Enabled for this crate's own tests, and for dependent crates through the `test-utils`
//! feature.
#![allow(unused_imports)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use alloc::{boxed::Box, vec, vec::Vec};

#[cfg(test)]
pub use rstest::rstest;

use crate::basis::constants::*;
use crate::basis::{crc16, BasisHeader, SliceDesc};
use crate::slice_decoder::{PaletteSection, SliceDecoder, SliceTranscode};
use basis_transcode_common::{SelectorCodebook, TranscoderTextureFormat};
use core::cell::Cell;
use endian_writer::{EndianWriter, LittleEndianWriter};

/// Contents of the endpoint codebook section in fixtures.
pub const ENDPOINT_SECTION: [u8; 4] = [0xE0; 4];
/// Contents of the selector codebook section in fixtures.
pub const SELECTOR_SECTION: [u8; 4] = [0x5E; 4];
/// Contents of the Huffman tables section in fixtures.
pub const TABLES_SECTION: [u8; 4] = [0x7A; 4];

/// Byte that fills the payload of the given slice.
pub fn slice_tag(image_index: u32, level_index: u32, alpha: bool) -> u8 {
    (1 + image_index * 32 + level_index * 2 + alpha as u32) as u8
}

/// The payload written for the given slice.
pub fn slice_payload(image_index: u32, level_index: u32, alpha: bool) -> Vec<u8> {
    vec![slice_tag(image_index, level_index, alpha); 4 + level_index as usize]
}

type HeaderPatch = Box<dyn FnOnce(&mut BasisHeader)>;
type SlicePatch = Box<dyn FnOnce(&mut SliceDesc)>;

/// Builds structurally valid `.basis` files with placeholder payloads.
///
/// Layout: header, slice descriptors, endpoint codebook, selector codebook, tables,
/// then slice payloads in descriptor order. All checksums are filled in after patches
/// are applied, so patched files still pass the header checksum.
#[derive(Default)]
pub struct BasisFixture {
    images: Vec<Vec<(u32, u32)>>,
    alpha: bool,
    header_patches: Vec<HeaderPatch>,
    slice_patches: Vec<(usize, SlicePatch)>,
}

impl BasisFixture {
    /// An empty file without alpha slices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image with one level per `(width, height)` entry.
    pub fn image(mut self, levels: &[(u32, u32)]) -> Self {
        self.images.push(levels.to_vec());
        self
    }

    /// Emits an alpha slice after every colour slice.
    pub fn with_alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    /// Modifies the header before it is written.
    pub fn patch_header(mut self, patch: impl FnOnce(&mut BasisHeader) + 'static) -> Self {
        self.header_patches.push(Box::new(patch));
        self
    }

    /// Modifies the slice descriptor at `index` before it is written.
    pub fn patch_slice(
        mut self,
        index: usize,
        patch: impl FnOnce(&mut SliceDesc) + 'static,
    ) -> Self {
        self.slice_patches.push((index, Box::new(patch)));
        self
    }

    /// Lays out the sections and slices, applies the patches and writes every checksum.
    pub fn build(self) -> Vec<u8> {
        let mut slices = Vec::new();
        let mut payloads = Vec::new();
        for (image_index, levels) in self.images.iter().enumerate() {
            for (level_index, &(width, height)) in levels.iter().enumerate() {
                for alpha in [false, true] {
                    if alpha && !self.alpha {
                        continue;
                    }

                    let payload = slice_payload(image_index as u32, level_index as u32, alpha);
                    slices.push(SliceDesc {
                        image_index: image_index as u32,
                        level_index: level_index as u32,
                        flags: if alpha { SLICE_FLAG_IS_ALPHA_DATA } else { 0 },
                        orig_width: width,
                        orig_height: height,
                        num_blocks_x: width.div_ceil(4),
                        num_blocks_y: height.div_ceil(4),
                        file_ofs: 0,
                        file_size: payload.len() as u32,
                        slice_data_crc16: crc16(&payload, 0),
                    });
                    payloads.push(payload);
                }
            }
        }

        let endpoint_ofs = BASIS_HEADER_SIZE + slices.len() * BASIS_SLICE_DESC_SIZE;
        let selector_ofs = endpoint_ofs + ENDPOINT_SECTION.len();
        let tables_ofs = selector_ofs + SELECTOR_SECTION.len();
        let mut payload_ofs = tables_ofs + TABLES_SECTION.len();
        for slice in slices.iter_mut() {
            slice.file_ofs = payload_ofs as u32;
            payload_ofs += slice.file_size as usize;
        }
        let total_len = payload_ofs;

        let mut header = BasisHeader {
            sig: BASIS_SIG,
            version: BASIS_VERSION,
            header_size: BASIS_HEADER_SIZE as u32,
            data_size: (total_len - BASIS_HEADER_SIZE) as u32,
            total_slices: slices.len() as u32,
            total_images: self.images.len() as u32,
            flags: HEADER_FLAG_ETC1S
                | if self.alpha {
                    HEADER_FLAG_HAS_ALPHA_SLICES
                } else {
                    0
                },
            total_endpoints: 1,
            endpoint_cb_file_ofs: endpoint_ofs as u32,
            endpoint_cb_file_size: ENDPOINT_SECTION.len() as u32,
            total_selectors: 1,
            selector_cb_file_ofs: selector_ofs as u32,
            selector_cb_file_size: SELECTOR_SECTION.len() as u32,
            tables_file_ofs: tables_ofs as u32,
            tables_file_size: TABLES_SECTION.len() as u32,
            slice_desc_file_ofs: BASIS_HEADER_SIZE as u32,
            ..Default::default()
        };

        for patch in self.header_patches {
            patch(&mut header);
        }
        for (index, patch) in self.slice_patches {
            patch(&mut slices[index]);
        }

        let mut file = vec![0u8; total_len];
        write_header(&mut file, &header);
        for (index, slice) in slices.iter().enumerate() {
            write_slice_desc(&mut file[BASIS_HEADER_SIZE + index * BASIS_SLICE_DESC_SIZE..], slice);
        }
        file[endpoint_ofs..selector_ofs].copy_from_slice(&ENDPOINT_SECTION);
        file[selector_ofs..tables_ofs].copy_from_slice(&SELECTOR_SECTION);
        file[tables_ofs..tables_ofs + TABLES_SECTION.len()].copy_from_slice(&TABLES_SECTION);

        // Payloads are placed at their original offsets even if a patch moved the descriptor.
        let mut ofs = tables_ofs + TABLES_SECTION.len();
        for payload in &payloads {
            file[ofs..ofs + payload.len()].copy_from_slice(payload);
            ofs += payload.len();
        }

        let data_crc = crc16(&file[BASIS_HEADER_SIZE..], 0);
        write_packed(&mut file, DATA_CRC16_OFFSET, 2, data_crc as u32);
        let header_crc = crc16(&file[HEADER_CRC16_START..BASIS_HEADER_SIZE], 0);
        write_packed(&mut file, HEADER_CRC16_OFFSET, 2, header_crc as u32);
        file
    }
}

fn write_packed(data: &mut [u8], offset: usize, size: usize, value: u32) {
    for (index, byte) in data[offset..offset + size].iter_mut().enumerate() {
        *byte = (value >> (index * 8)) as u8;
    }
}

fn write_header(file: &mut [u8], header: &BasisHeader) {
    assert!(file.len() >= BASIS_HEADER_SIZE);

    write_packed(file, SIG_OFFSET, 2, header.sig);
    write_packed(file, VERSION_OFFSET, 2, header.version);
    write_packed(file, HEADER_SIZE_OFFSET, 2, header.header_size);
    write_packed(file, TOTAL_SLICES_OFFSET, 3, header.total_slices);
    write_packed(file, TOTAL_IMAGES_OFFSET, 3, header.total_images);
    write_packed(file, TEX_FORMAT_OFFSET, 1, header.tex_format);
    write_packed(file, FLAGS_OFFSET, 2, header.flags);
    write_packed(file, TEX_TYPE_OFFSET, 1, header.tex_type);
    write_packed(file, US_PER_FRAME_OFFSET, 3, header.us_per_frame);
    write_packed(file, TOTAL_ENDPOINTS_OFFSET, 2, header.total_endpoints);
    write_packed(file, ENDPOINT_CB_FILE_SIZE_OFFSET, 3, header.endpoint_cb_file_size);
    write_packed(file, TOTAL_SELECTORS_OFFSET, 2, header.total_selectors);
    write_packed(file, SELECTOR_CB_FILE_SIZE_OFFSET, 3, header.selector_cb_file_size);

    let mut writer = unsafe { LittleEndianWriter::new(file.as_mut_ptr()) };
    unsafe {
        writer.write_u32_at(header.data_size, DATA_SIZE_OFFSET as isize);
        writer.write_u32_at(header.userdata0, USERDATA0_OFFSET as isize);
        writer.write_u32_at(header.userdata1, USERDATA1_OFFSET as isize);
        writer.write_u32_at(header.endpoint_cb_file_ofs, ENDPOINT_CB_FILE_OFS_OFFSET as isize);
        writer.write_u32_at(header.selector_cb_file_ofs, SELECTOR_CB_FILE_OFS_OFFSET as isize);
        writer.write_u32_at(header.tables_file_ofs, TABLES_FILE_OFS_OFFSET as isize);
        writer.write_u32_at(header.tables_file_size, TABLES_FILE_SIZE_OFFSET as isize);
        writer.write_u32_at(header.slice_desc_file_ofs, SLICE_DESC_FILE_OFS_OFFSET as isize);
        writer.write_u32_at(header.extended_file_ofs, EXTENDED_FILE_OFS_OFFSET as isize);
        writer.write_u32_at(header.extended_file_size, EXTENDED_FILE_SIZE_OFFSET as isize);
    }
}

fn write_slice_desc(desc: &mut [u8], slice: &SliceDesc) {
    write_packed(desc, SLICE_IMAGE_INDEX_OFFSET, 3, slice.image_index);
    write_packed(desc, SLICE_LEVEL_INDEX_OFFSET, 1, slice.level_index);
    write_packed(desc, SLICE_FLAGS_OFFSET, 1, slice.flags);
    write_packed(desc, SLICE_ORIG_WIDTH_OFFSET, 2, slice.orig_width);
    write_packed(desc, SLICE_ORIG_HEIGHT_OFFSET, 2, slice.orig_height);
    write_packed(desc, SLICE_NUM_BLOCKS_X_OFFSET, 2, slice.num_blocks_x);
    write_packed(desc, SLICE_NUM_BLOCKS_Y_OFFSET, 2, slice.num_blocks_y);
    write_packed(desc, SLICE_FILE_OFS_OFFSET, 4, slice.file_ofs);
    write_packed(desc, SLICE_FILE_SIZE_OFFSET, 4, slice.file_size);
    write_packed(desc, SLICE_DATA_CRC16_OFFSET, 2, slice.slice_data_crc16 as u32);
}

/// What [`RecordingSliceDecoder`] saw on its last transcode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRequest {
    pub image_index: u32,
    pub level_index: u32,
    pub primary_is_alpha: bool,
    pub had_alpha_data: bool,
    pub format: TranscoderTextureFormat,
}

/// A [`SliceDecoder`] that copies the first payload byte into every output byte.
///
/// Palettes with zero entries and empty tables are rejected, mirroring a real decoder.
#[derive(Debug, Default)]
pub struct RecordingSliceDecoder {
    pub endpoints: Option<Vec<u8>>,
    pub selectors: Option<Vec<u8>>,
    pub tables: Option<Vec<u8>>,
    pub last_request: Cell<Option<RecordedRequest>>,
    pub transcode_calls: Cell<u32>,
}

impl SliceDecoder for RecordingSliceDecoder {
    fn decode_palettes(
        &mut self,
        _codebook: &SelectorCodebook,
        endpoints: PaletteSection<'_>,
        selectors: PaletteSection<'_>,
    ) -> bool {
        if endpoints.total_entries == 0 || selectors.total_entries == 0 {
            return false;
        }

        self.endpoints = Some(endpoints.data.to_vec());
        self.selectors = Some(selectors.data.to_vec());
        true
    }

    fn decode_tables(&mut self, tables: &[u8]) -> bool {
        if tables.is_empty() {
            return false;
        }

        self.tables = Some(tables.to_vec());
        true
    }

    fn transcode_slice(
        &self,
        _codebook: &SelectorCodebook,
        request: &SliceTranscode<'_>,
        output: &mut [u8],
    ) -> bool {
        self.transcode_calls.set(self.transcode_calls.get() + 1);
        self.last_request.set(Some(RecordedRequest {
            image_index: request.slice.image_index,
            level_index: request.slice.level_index,
            primary_is_alpha: request.slice.is_alpha(),
            had_alpha_data: request.alpha_data.is_some(),
            format: request.format,
        }));

        let len = request.slice.total_blocks() as usize * request.format.bytes_per_block() as usize;
        let (Some(&fill), Some(output)) = (request.slice_data.first(), output.get_mut(..len))
        else {
            return false;
        };
        output.fill(fill);
        true
    }
}
