//! The shared selector codebook.
//!
//! Every decode engine reads from one read-only [`SelectorCodebook`]. The codebook is built
//! once for the whole process with [`initialize`] and lives until the process exits.
//!
//! Callers that cannot use the global (e.g. `no_std` targets) may build their own with
//! [`SelectorCodebook::new`] and pass it to each handle explicitly.

use alloc::boxed::Box;

/// Number of distinct packed selector bytes (4 selectors × 2 bits).
pub const PACKED_SELECTOR_COMBINATIONS: usize = 256;

/// Number of ETC1 intensity tables.
pub const ETC1_INTENSITY_TABLES: usize = 8;

/// ETC1 intensity modifier table, indexed by `[table][linear selector]`.
pub const ETC1_INTENSITY_MODIFIERS: [[i16; 4]; ETC1_INTENSITY_TABLES] = [
    [-8, -2, 2, 8],
    [-17, -5, 5, 17],
    [-29, -9, 9, 29],
    [-42, -13, 13, 42],
    [-60, -18, 18, 60],
    [-80, -24, 24, 80],
    [-106, -33, 33, 106],
    [-183, -47, 47, 183],
];

/// Maps an ETC1 selector (MSB/LSB pair) to its position in the modifier row.
pub const ETC1_TO_LINEAR_SELECTOR: [u8; 4] = [2, 3, 1, 0];

/// Maps a linear selector back to the ETC1 selector encoding.
pub const LINEAR_TO_ETC1_SELECTOR: [u8; 4] = [3, 2, 0, 1];

/// Read-only lookup tables shared by every decode engine in the process.
#[derive(Debug)]
pub struct SelectorCodebook {
    /// Packed byte of four ETC1 selectors (lowest bits first) -> four linear selectors.
    unpacked: Box<[[u8; 4]; PACKED_SELECTOR_COMBINATIONS]>,
}

impl SelectorCodebook {
    /// Builds the codebook tables.
    pub fn new() -> Self {
        let mut unpacked = Box::new([[0u8; 4]; PACKED_SELECTOR_COMBINATIONS]);
        for (packed, entry) in unpacked.iter_mut().enumerate() {
            for (x, selector) in entry.iter_mut().enumerate() {
                let etc1 = (packed >> (x * 2)) & 3;
                *selector = ETC1_TO_LINEAR_SELECTOR[etc1];
            }
        }

        Self { unpacked }
    }

    /// Unpacks four ETC1 selectors stored in a single byte into linear selector order.
    #[inline]
    pub fn unpack_selectors(&self, packed: u8) -> [u8; 4] {
        self.unpacked[packed as usize]
    }

    /// Returns the intensity modifier applied for the given table and linear selector.
    ///
    /// Returns [`None`] if either index is out of range.
    #[inline]
    pub fn intensity_modifier(&self, table: usize, linear_selector: usize) -> Option<i16> {
        ETC1_INTENSITY_MODIFIERS
            .get(table)
            .and_then(|row| row.get(linear_selector))
            .copied()
    }
}

impl Default for SelectorCodebook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
static GLOBAL_CODEBOOK: std::sync::OnceLock<SelectorCodebook> = std::sync::OnceLock::new();

/// Installs the process-wide [`SelectorCodebook`], returning it.
///
/// The first call builds the codebook; every call after that is a no-op returning the
/// same instance. Safe to call from multiple threads.
#[cfg(feature = "std")]
pub fn initialize() -> &'static SelectorCodebook {
    GLOBAL_CODEBOOK.get_or_init(|| {
        tracing::debug!("installing global selector codebook");
        SelectorCodebook::new()
    })
}

/// Returns the process-wide codebook, or [`None`] if [`initialize`] was never called.
#[cfg(feature = "std")]
pub fn global_codebook() -> Option<&'static SelectorCodebook> {
    GLOBAL_CODEBOOK.get()
}
