//! Target formats a texture level can be transcoded into.

use derive_enum_all_values::AllValues;
use thiserror::Error;

/// Number of supported transcoder texture formats.
///
/// Any format code greater than or equal to this value is unsupported.
pub const TOTAL_TEXTURE_FORMATS: u32 = TranscoderTextureFormat::all_values().len() as u32;

/// A GPU-native compressed texture format that a level can be transcoded into.
///
/// The discriminants are the format codes used on the host boundary.
/// All formats are organised in 4x4 pixel blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u32)]
pub enum TranscoderTextureFormat {
    /// ETC1 RGB.
    Etc1 = 0,
    /// BC1 (a.k.a. DXT1) RGB.
    Bc1 = 1,
    /// BC4 single channel.
    Bc4 = 2,
    /// PVRTC1 4bpp, opaque only.
    Pvrtc1_4OpaqueOnly = 3,
    /// BC7 mode 6, opaque only.
    Bc7M6OpaqueOnly = 4,
    /// ETC2 RGBA (EAC alpha block followed by an ETC1 colour block).
    Etc2 = 5,
    /// BC3 (a.k.a. DXT5) RGBA.
    Bc3 = 6,
    /// BC5 two channel.
    Bc5 = 7,
}

impl TranscoderTextureFormat {
    /// Size of a single 4x4 block of this format, in bytes.
    #[inline]
    pub const fn bytes_per_block(self) -> u32 {
        match self {
            Self::Etc1 | Self::Bc1 | Self::Bc4 | Self::Pvrtc1_4OpaqueOnly => 8,
            Self::Bc7M6OpaqueOnly | Self::Etc2 | Self::Bc3 | Self::Bc5 => 16,
        }
    }

    /// Whether the format stores a second (alpha) channel fed from the alpha slices.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Etc2 | Self::Bc3 | Self::Bc5)
    }

    /// The host boundary code for this format.
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// A format code outside of the supported [`TranscoderTextureFormat`] range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unsupported transcoder texture format code: {0}")]
pub struct UnsupportedFormatError(pub u32);

impl TryFrom<u32> for TranscoderTextureFormat {
    type Error = UnsupportedFormatError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        TranscoderTextureFormat::all_values()
            .get(code as usize)
            .copied()
            .ok_or(UnsupportedFormatError(code))
    }
}
