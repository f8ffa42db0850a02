//! Parsing and validation of the `.basis` container layout.

pub mod constants;
pub mod crc16;
pub mod header;
pub mod slice_desc;
pub mod validate;

pub use constants::{BASIS_HEADER_SIZE, BASIS_SLICE_DESC_SIZE};
pub use crc16::crc16;
pub use header::BasisHeader;
pub use slice_desc::{find_slice, slice_descs, SliceDesc};
pub use validate::{validate_file_checksums, validate_header, validate_header_quick};
