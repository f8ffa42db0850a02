use super::constants::*;
use super::header::{read_packed, BasisHeader};

/// Describes one slice: the colour or alpha bitstream of a single image level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceDesc {
    pub image_index: u32,
    pub level_index: u32,
    pub flags: u32,
    pub orig_width: u32,
    pub orig_height: u32,
    pub num_blocks_x: u32,
    pub num_blocks_y: u32,
    pub file_ofs: u32,
    pub file_size: u32,
    pub slice_data_crc16: u16,
}

impl SliceDesc {
    /// Reads the descriptor starting at `offset`.
    ///
    /// Returns [`None`] if the descriptor would extend past the end of `data`.
    pub fn parse(data: &[u8], offset: usize) -> Option<Self> {
        let end = offset.checked_add(BASIS_SLICE_DESC_SIZE)?;
        if end > data.len() {
            return None;
        }

        let desc = &data[offset..end];
        Some(Self {
            image_index: read_packed(desc, SLICE_IMAGE_INDEX_OFFSET, 3),
            level_index: read_packed(desc, SLICE_LEVEL_INDEX_OFFSET, 1),
            flags: read_packed(desc, SLICE_FLAGS_OFFSET, 1),
            orig_width: read_packed(desc, SLICE_ORIG_WIDTH_OFFSET, 2),
            orig_height: read_packed(desc, SLICE_ORIG_HEIGHT_OFFSET, 2),
            num_blocks_x: read_packed(desc, SLICE_NUM_BLOCKS_X_OFFSET, 2),
            num_blocks_y: read_packed(desc, SLICE_NUM_BLOCKS_Y_OFFSET, 2),
            file_ofs: read_packed(desc, SLICE_FILE_OFS_OFFSET, 4),
            file_size: read_packed(desc, SLICE_FILE_SIZE_OFFSET, 4),
            slice_data_crc16: read_packed(desc, SLICE_DATA_CRC16_OFFSET, 2) as u16,
        })
    }

    /// The slice holds alpha data rather than colour data.
    #[inline]
    pub fn is_alpha(&self) -> bool {
        (self.flags & SLICE_FLAG_IS_ALPHA_DATA) != 0
    }

    /// Number of 4x4 blocks in the slice.
    #[inline]
    pub fn total_blocks(&self) -> u32 {
        self.num_blocks_x * self.num_blocks_y
    }

    /// The slice's compressed bytes, or [`None`] if they lie outside `data`.
    pub fn data<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.file_ofs as usize;
        let end = start.checked_add(self.file_size as usize)?;
        data.get(start..end)
    }
}

/// Iterates over all slice descriptors declared by `header`.
///
/// Stops early if a descriptor would extend past the end of `data`.
pub fn slice_descs<'a>(
    data: &'a [u8],
    header: &BasisHeader,
) -> impl Iterator<Item = SliceDesc> + 'a {
    let base = header.slice_desc_file_ofs as usize;
    (0..header.total_slices as usize).map_while(move |index| {
        let offset = base.checked_add(index.checked_mul(BASIS_SLICE_DESC_SIZE)?)?;
        SliceDesc::parse(data, offset)
    })
}

/// Finds the slice index holding the colour (or alpha) data of an image level.
pub fn find_slice(
    data: &[u8],
    header: &BasisHeader,
    image_index: u32,
    level_index: u32,
    alpha: bool,
) -> Option<(usize, SliceDesc)> {
    slice_descs(data, header).enumerate().find(|(_, slice)| {
        slice.image_index == image_index
            && slice.level_index == level_index
            && slice.is_alpha() == alpha
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn parse_rejects_truncated_descriptor() {
        let data = [0u8; BASIS_SLICE_DESC_SIZE];
        assert!(SliceDesc::parse(&data, 0).is_some());
        assert!(SliceDesc::parse(&data, 1).is_none());
        assert!(SliceDesc::parse(&data, usize::MAX).is_none());
    }

    #[test]
    fn slice_descs_lists_levels_in_order() {
        let file = BasisFixture::new()
            .image(&[(64, 32), (32, 16), (16, 8)])
            .build();
        let header = BasisHeader::parse(&file).unwrap();

        let slices: Vec<SliceDesc> = slice_descs(&file, &header).collect();
        assert_eq!(slices.len(), 3);
        for (level, slice) in slices.iter().enumerate() {
            assert_eq!(slice.image_index, 0);
            assert_eq!(slice.level_index, level as u32);
            assert!(!slice.is_alpha());
        }
        assert_eq!(slices[0].orig_width, 64);
        assert_eq!(slices[0].orig_height, 32);
        assert_eq!(slices[0].total_blocks(), 16 * 8);
        assert_eq!(slices[2].total_blocks(), 4 * 2);
    }

    #[test]
    fn find_slice_distinguishes_alpha() {
        let file = BasisFixture::new()
            .with_alpha()
            .image(&[(8, 8), (4, 4)])
            .build();
        let header = BasisHeader::parse(&file).unwrap();

        let (colour_index, colour) = find_slice(&file, &header, 0, 1, false).unwrap();
        let (alpha_index, alpha) = find_slice(&file, &header, 0, 1, true).unwrap();
        assert_eq!(colour_index, 2);
        assert_eq!(alpha_index, 3);
        assert!(!colour.is_alpha());
        assert!(alpha.is_alpha());
        assert!(find_slice(&file, &header, 0, 2, false).is_none());
        assert!(find_slice(&file, &header, 1, 0, false).is_none());
    }

    #[test]
    fn data_returns_slice_payload() {
        let file = BasisFixture::new().image(&[(4, 4)]).build();
        let header = BasisHeader::parse(&file).unwrap();
        let (_, slice) = find_slice(&file, &header, 0, 0, false).unwrap();

        assert_eq!(slice.data(&file), Some(slice_payload(0, 0, false).as_slice()));

        let out_of_bounds = SliceDesc {
            file_ofs: file.len() as u32,
            file_size: 1,
            ..slice
        };
        assert!(out_of_bounds.data(&file).is_none());
    }
}
