//! Options passed through to the decode engine when transcoding a level.

use bitfield::bitfield;

bitfield! {
    /// Packed decode options understood by decode engines.
    ///
    /// Bit layout:
    /// - Bit 0: Use wrap addressing when transcoding to PVRTC1 (1 bit)
    /// - Bit 1: Transcode alpha slices into opaque-only formats (1 bit)
    /// - Bits 2-31: Reserved for future use (30 bits)
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecodeFlags(u32);
    impl Debug;
    u32;

    /// PVRTC1 textures wrap at their edges instead of clamping.
    pub pvrtc_wrap_addressing, set_pvrtc_wrap_addressing: 0;
    /// Opaque formats receive the alpha slice data instead of the colour data.
    pub transcode_alpha_to_opaque_formats, set_transcode_alpha_to_opaque_formats: 1;
    /// Reserved bits for future use.
    pub reserved, _: 31, 2;
}

impl DecodeFlags {
    /// Creates the flags from the two host boundary toggles.
    ///
    /// Any non-zero value counts as set.
    pub fn from_host(pvrtc_wrap_addressing: u32, alpha_for_opaque_formats: u32) -> Self {
        let mut flags = Self::default();
        flags.set_pvrtc_wrap_addressing(pvrtc_wrap_addressing != 0);
        flags.set_transcode_alpha_to_opaque_formats(alpha_for_opaque_formats != 0);
        flags
    }

    /// Raw packed representation.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }
}
