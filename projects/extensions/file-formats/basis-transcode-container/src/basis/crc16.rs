/// Computes the 16-bit CRC used by `.basis` headers and slices.
///
/// `crc` is the running value; pass `0` to start a new checksum.
#[inline]
pub fn crc16(data: &[u8], crc: u16) -> u16 {
    let mut crc = !crc;
    for &byte in data {
        let q = (byte as u16) ^ (crc >> 8);
        let k = (q >> 4) ^ q;
        crc = (crc << 8) ^ k ^ (k << 5) ^ (k << 12);
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_of_empty_input_is_zero() {
        assert_eq!(crc16(&[], 0), 0);
    }

    #[test]
    fn crc16_matches_ccitt_check_value() {
        // CRC-16/GENIBUS check value for "123456789".
        assert_eq!(crc16(b"123456789", 0), 0xD64E);
    }

    #[test]
    fn crc16_can_be_computed_incrementally() {
        let whole = crc16(b"basis universal", 0);
        let partial = crc16(b" universal", crc16(b"basis", 0));
        assert_eq!(whole, partial);
    }

    #[test]
    fn crc16_detects_single_bit_flip() {
        let original = crc16(&[0x12, 0x34, 0x56, 0x78], 0);
        let flipped = crc16(&[0x12, 0x34, 0x57, 0x78], 0);
        assert_ne!(original, flipped);
    }
}
