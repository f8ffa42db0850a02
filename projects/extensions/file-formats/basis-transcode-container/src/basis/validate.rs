use super::constants::*;
use super::crc16::crc16;
use super::header::BasisHeader;
use super::slice_desc::{slice_descs, SliceDesc};
use likely_stable::unlikely;

/// Cheap structural checks that only look at the header fields.
///
/// Returns the parsed header if the signature, version, sizes and slice table bounds
/// are consistent with `data`.
pub fn validate_header_quick(data: &[u8]) -> Option<BasisHeader> {
    if data.len() <= BASIS_HEADER_SIZE {
        return None;
    }

    let header = BasisHeader::parse(data)?;
    if header.sig != BASIS_SIG
        || header.version != BASIS_VERSION
        || header.header_size as usize != BASIS_HEADER_SIZE
    {
        return None;
    }

    if (data.len() as u64) < header.expected_file_size() {
        return None;
    }

    if header.total_slices == 0 || header.total_images == 0 {
        return None;
    }

    let slice_table_ofs = header.slice_desc_file_ofs as u64;
    let slice_table_size = header.total_slices as u64 * BASIS_SLICE_DESC_SIZE as u64;
    if slice_table_ofs >= data.len() as u64 || (data.len() as u64 - slice_table_ofs) < slice_table_size
    {
        return None;
    }

    Some(header)
}

/// Full header validation: the quick checks, the header checksum and every slice descriptor.
///
/// The slice payloads themselves are not checksummed; see [`validate_file_checksums`].
pub fn validate_header(data: &[u8]) -> bool {
    let Some(header) = validate_header_quick(data) else {
        return false;
    };

    if crc16(&data[HEADER_CRC16_START..BASIS_HEADER_SIZE], 0) != header.header_crc16 {
        return false;
    }

    let has_alpha = header.has_alpha_slices();
    if has_alpha && (header.total_slices & 1) != 0 {
        return false;
    }

    let mut prev_colour: Option<SliceDesc> = None;
    for (index, slice) in slice_descs(data, &header).enumerate() {
        if unlikely(slice.image_index >= header.total_images) {
            return false;
        }

        if unlikely(slice.num_blocks_x == 0 || slice.num_blocks_y == 0) {
            return false;
        }

        if unlikely(slice.data(data).is_none()) {
            return false;
        }

        // Alpha files interleave slices: colour, alpha, colour, alpha...
        let expect_alpha = has_alpha && (index & 1) != 0;
        if unlikely(slice.is_alpha() != expect_alpha) {
            return false;
        }

        if slice.is_alpha() {
            // An alpha slice describes the same level as the colour slice before it.
            let Some(colour) = prev_colour else {
                return false;
            };
            if unlikely(!same_level(&colour, &slice)) {
                return false;
            }
        } else {
            if unlikely(!follows(prev_colour.as_ref(), &slice)) {
                return false;
            }
            prev_colour = Some(slice);
        }
    }

    true
}

fn same_level(colour: &SliceDesc, alpha: &SliceDesc) -> bool {
    colour.image_index == alpha.image_index
        && colour.level_index == alpha.level_index
        && colour.num_blocks_x == alpha.num_blocks_x
        && colour.num_blocks_y == alpha.num_blocks_y
}

/// Colour slices are stored image by image, each image's levels counting up from zero.
fn follows(prev: Option<&SliceDesc>, slice: &SliceDesc) -> bool {
    match prev {
        None => slice.level_index == 0,
        Some(prev) if slice.image_index == prev.image_index => {
            slice.level_index == prev.level_index + 1
        }
        Some(prev) => slice.image_index > prev.image_index && slice.level_index == 0,
    }
}

/// Verifies the data checksum recorded in the header and, if `full_validation` is set,
/// the checksum of every slice.
pub fn validate_file_checksums(data: &[u8], full_validation: bool) -> bool {
    let Some(header) = validate_header_quick(data) else {
        return false;
    };

    let data_end = BASIS_HEADER_SIZE + header.data_size as usize;
    if crc16(&data[BASIS_HEADER_SIZE..data_end], 0) != header.data_crc16 {
        return false;
    }

    if full_validation {
        for slice in slice_descs(data, &header) {
            let Some(payload) = slice.data(data) else {
                return false;
            };
            if crc16(payload, 0) != slice.slice_data_crc16 {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use rstest::rstest;

    fn single_level() -> Vec<u8> {
        BasisFixture::new().image(&[(16, 16)]).build()
    }

    #[test]
    fn accepts_valid_files() {
        assert!(validate_header(&single_level()));
        assert!(validate_header(
            &BasisFixture::new()
                .with_alpha()
                .image(&[(8, 8), (4, 4)])
                .image(&[(4, 4)])
                .build()
        ));
    }

    #[rstest]
    #[case::signature(SIG_OFFSET)]
    #[case::version(VERSION_OFFSET)]
    #[case::header_size(HEADER_SIZE_OFFSET)]
    #[case::header_crc(HEADER_CRC16_OFFSET)]
    #[case::covered_by_header_crc(USERDATA0_OFFSET)]
    fn rejects_corrupted_header_byte(#[case] offset: usize) {
        let mut file = single_level();
        file[offset] ^= 0x5A;
        assert!(!validate_header(&file));
    }

    #[rstest]
    #[case(0)]
    #[case(BASIS_HEADER_SIZE)]
    #[case(BASIS_HEADER_SIZE + 1)]
    fn rejects_truncated_files(#[case] len: usize) {
        let file = single_level();
        assert!(!validate_header(&file[..len]));
    }

    #[test]
    fn rejects_file_shorter_than_declared_data() {
        let file = single_level();
        assert!(!validate_header(&file[..file.len() - 1]));
    }

    #[test]
    fn rejects_slice_with_out_of_range_image() {
        let file = BasisFixture::new()
            .image(&[(4, 4)])
            .patch_slice(0, |slice| slice.image_index = 3)
            .build();
        assert!(!validate_header(&file));
    }

    #[test]
    fn rejects_slice_with_zero_blocks() {
        let file = BasisFixture::new()
            .image(&[(4, 4)])
            .patch_slice(0, |slice| slice.num_blocks_x = 0)
            .build();
        assert!(!validate_header(&file));
    }

    #[test]
    fn rejects_slice_pointing_outside_file() {
        let file = BasisFixture::new()
            .image(&[(4, 4)])
            .patch_slice(0, |slice| slice.file_size = 0x10000)
            .build();
        assert!(!validate_header(&file));
    }

    #[test]
    fn rejects_misordered_alpha_slices() {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(4, 4)])
            .patch_slice(1, |slice| slice.flags = 0)
            .build();
        assert!(!validate_header(&file));
    }

    #[rstest]
    #[case::blocks_x(|slice: &mut SliceDesc| slice.num_blocks_x = 1)]
    #[case::blocks_y(|slice: &mut SliceDesc| slice.num_blocks_y = 1)]
    #[case::level(|slice: &mut SliceDesc| slice.level_index = 5)]
    #[case::image(|slice: &mut SliceDesc| slice.image_index = 1)]
    fn rejects_alpha_slice_not_matching_colour(#[case] patch: fn(&mut SliceDesc)) {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(8, 8)])
            .image(&[(8, 8)])
            .patch_slice(1, patch)
            .build();
        assert!(!validate_header(&file));
    }

    #[rstest]
    #[case::duplicate_level(1, 0)]
    #[case::skipped_level(1, 2)]
    #[case::first_level_not_zero(0, 1)]
    fn rejects_out_of_sequence_levels(#[case] slice_index: usize, #[case] level_index: u32) {
        let file = BasisFixture::new()
            .image(&[(8, 8), (4, 4)])
            .patch_slice(slice_index, move |slice| slice.level_index = level_index)
            .build();
        assert!(!validate_header(&file));
    }

    #[test]
    fn rejects_images_out_of_order() {
        let file = BasisFixture::new()
            .image(&[(4, 4)])
            .image(&[(4, 4)])
            .patch_slice(0, |slice| slice.image_index = 1)
            .patch_slice(1, |slice| slice.image_index = 0)
            .build();
        assert!(!validate_header(&file));
    }

    #[test]
    fn checksums_detect_payload_corruption() {
        let mut file = single_level();
        assert!(validate_file_checksums(&file, true));

        let last = file.len() - 1;
        file[last] ^= 0xFF;
        // The header itself is still fine.
        assert!(validate_header(&file));
        assert!(!validate_file_checksums(&file, false));
        assert!(!validate_file_checksums(&file, true));
    }
}
