use super::constants::*;

/// Reads a little endian packed integer of `size` (1..=4) bytes.
///
/// The caller must ensure `offset + size <= data.len()`.
#[inline]
pub(crate) fn read_packed(data: &[u8], offset: usize, size: usize) -> u32 {
    data[offset..offset + size]
        .iter()
        .rev()
        .fold(0u32, |acc, &byte| (acc << 8) | byte as u32)
}

/// The fixed size header at the start of every `.basis` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasisHeader {
    pub sig: u32,
    pub version: u32,
    pub header_size: u32,
    pub header_crc16: u16,
    pub data_size: u32,
    pub data_crc16: u16,
    pub total_slices: u32,
    pub total_images: u32,
    pub tex_format: u32,
    pub flags: u32,
    pub tex_type: u32,
    pub us_per_frame: u32,
    pub userdata0: u32,
    pub userdata1: u32,
    pub total_endpoints: u32,
    pub endpoint_cb_file_ofs: u32,
    pub endpoint_cb_file_size: u32,
    pub total_selectors: u32,
    pub selector_cb_file_ofs: u32,
    pub selector_cb_file_size: u32,
    pub tables_file_ofs: u32,
    pub tables_file_size: u32,
    pub slice_desc_file_ofs: u32,
    pub extended_file_ofs: u32,
    pub extended_file_size: u32,
}

impl BasisHeader {
    /// Reads the header fields from `data`.
    ///
    /// Returns [`None`] if `data` is too short to hold a header. No field is validated here;
    /// see [`validate_header`](crate::validate_header).
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < BASIS_HEADER_SIZE {
            return None;
        }

        Some(Self {
            sig: read_packed(data, SIG_OFFSET, 2),
            version: read_packed(data, VERSION_OFFSET, 2),
            header_size: read_packed(data, HEADER_SIZE_OFFSET, 2),
            header_crc16: read_packed(data, HEADER_CRC16_OFFSET, 2) as u16,
            data_size: read_packed(data, DATA_SIZE_OFFSET, 4),
            data_crc16: read_packed(data, DATA_CRC16_OFFSET, 2) as u16,
            total_slices: read_packed(data, TOTAL_SLICES_OFFSET, 3),
            total_images: read_packed(data, TOTAL_IMAGES_OFFSET, 3),
            tex_format: read_packed(data, TEX_FORMAT_OFFSET, 1),
            flags: read_packed(data, FLAGS_OFFSET, 2),
            tex_type: read_packed(data, TEX_TYPE_OFFSET, 1),
            us_per_frame: read_packed(data, US_PER_FRAME_OFFSET, 3),
            userdata0: read_packed(data, USERDATA0_OFFSET, 4),
            userdata1: read_packed(data, USERDATA1_OFFSET, 4),
            total_endpoints: read_packed(data, TOTAL_ENDPOINTS_OFFSET, 2),
            endpoint_cb_file_ofs: read_packed(data, ENDPOINT_CB_FILE_OFS_OFFSET, 4),
            endpoint_cb_file_size: read_packed(data, ENDPOINT_CB_FILE_SIZE_OFFSET, 3),
            total_selectors: read_packed(data, TOTAL_SELECTORS_OFFSET, 2),
            selector_cb_file_ofs: read_packed(data, SELECTOR_CB_FILE_OFS_OFFSET, 4),
            selector_cb_file_size: read_packed(data, SELECTOR_CB_FILE_SIZE_OFFSET, 3),
            tables_file_ofs: read_packed(data, TABLES_FILE_OFS_OFFSET, 4),
            tables_file_size: read_packed(data, TABLES_FILE_SIZE_OFFSET, 4),
            slice_desc_file_ofs: read_packed(data, SLICE_DESC_FILE_OFS_OFFSET, 4),
            extended_file_ofs: read_packed(data, EXTENDED_FILE_OFS_OFFSET, 4),
            extended_file_size: read_packed(data, EXTENDED_FILE_SIZE_OFFSET, 4),
        })
    }

    /// The file carries a separate alpha slice after every colour slice.
    #[inline]
    pub fn has_alpha_slices(&self) -> bool {
        (self.flags & HEADER_FLAG_HAS_ALPHA_SLICES) != 0
    }

    /// The image rows are stored bottom-up.
    #[inline]
    pub fn is_y_flipped(&self) -> bool {
        (self.flags & HEADER_FLAG_Y_FLIPPED) != 0
    }

    /// Total file size implied by the header.
    #[inline]
    pub fn expected_file_size(&self) -> u64 {
        BASIS_HEADER_SIZE as u64 + self.data_size as u64
    }
}
