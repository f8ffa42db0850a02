//! The two phase transcode protocol.

use crate::basis_file::BasisFile;
use crate::destination::TranscodeDestination;
use crate::error::{BasisFileError, TranscodeError};
use alloc::vec::Vec;
use basis_transcode_common::allocate::ScratchBuffer;
use basis_transcode_common::{DecodeEngine, DecodeFlags, TranscoderTextureFormat};

/// Options forwarded to the decode engine for a single transcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeOptions {
    pvrtc_wrap_addressing: bool,
    alpha_for_opaque_formats: bool,
}

impl TranscodeOptions {
    /// Both options disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use wrap addressing when decoding PVRTC1 blocks.
    pub fn pvrtc_wrap_addressing(mut self, enabled: bool) -> Self {
        self.pvrtc_wrap_addressing = enabled;
        self
    }

    /// Transcode the alpha slices instead of the colour slices when the target format has no
    /// alpha channel.
    pub fn alpha_for_opaque_formats(mut self, enabled: bool) -> Self {
        self.alpha_for_opaque_formats = enabled;
        self
    }
}

impl From<TranscodeOptions> for DecodeFlags {
    fn from(options: TranscodeOptions) -> Self {
        let mut flags = DecodeFlags::default();
        flags.set_pvrtc_wrap_addressing(options.pvrtc_wrap_addressing);
        flags.set_transcode_alpha_to_opaque_formats(options.alpha_for_opaque_formats);
        flags
    }
}

impl From<DecodeFlags> for TranscodeOptions {
    fn from(flags: DecodeFlags) -> Self {
        Self::new()
            .pvrtc_wrap_addressing(flags.pvrtc_wrap_addressing())
            .alpha_for_opaque_formats(flags.transcode_alpha_to_opaque_formats())
    }
}

impl<E: DecodeEngine> BasisFile<'_, E> {
    /// Prepares the engine's shared decode tables. Must succeed before
    /// [`transcode_image`](BasisFile::transcode_image). Calling it again is allowed.
    pub fn start_transcoding(&mut self) -> Result<(), TranscodeError> {
        self.state.check()?;
        if self.bytes.is_empty() {
            return Err(BasisFileError::InvalidHeader.into());
        }

        self.transcoding_started = self.engine.start_transcoding(self.codebook, &self.bytes);
        if !self.transcoding_started {
            tracing::warn!("decode engine failed to prepare the container's tables");
            return Err(TranscodeError::EngineFailed);
        }

        tracing::debug!(len = self.bytes.len(), "transcoding started");
        Ok(())
    }

    /// Whether the last [`start_transcoding`](BasisFile::start_transcoding) succeeded.
    pub fn is_transcoding_started(&self) -> bool {
        self.transcoding_started
    }

    /// Size in bytes of a level once transcoded to `format`.
    pub fn transcoded_size(
        &self,
        image_index: u32,
        level_index: u32,
        format: TranscoderTextureFormat,
    ) -> Result<usize, TranscodeError> {
        let desc = self.image_level_desc(image_index, level_index)?;
        desc.transcoded_size(format.bytes_per_block())
            .map(|size| size as usize)
            .ok_or(TranscodeError::SizeOverflow)
    }

    /// Transcodes one level into `destination` and returns the number of bytes written.
    ///
    /// The destination must hold exactly [`transcoded_size`](BasisFile::transcoded_size)
    /// bytes (a [`Vec`] is resized). It is left untouched on any error.
    pub fn transcode_image<D: TranscodeDestination + ?Sized>(
        &self,
        destination: &mut D,
        image_index: u32,
        level_index: u32,
        format: TranscoderTextureFormat,
        options: TranscodeOptions,
    ) -> Result<usize, TranscodeError> {
        let data = self.live_data()?;
        if !self.transcoding_started {
            return Err(TranscodeError::NotStarted);
        }

        let desc = self.image_level_desc(image_index, level_index)?;
        let required = desc
            .transcoded_size(format.bytes_per_block())
            .ok_or(TranscodeError::SizeOverflow)? as usize;
        if required == 0 {
            return Err(TranscodeError::EmptyLevel);
        }

        if destination.check_len(required).is_err() {
            return Err(TranscodeError::DestinationSizeMismatch {
                required,
                actual: destination.capacity(),
            });
        }

        let mut scratch = ScratchBuffer::new_zeroed(required)?;
        let ok = self.engine.transcode_image_level(
            self.codebook,
            data,
            image_index,
            level_index,
            scratch.as_mut_slice(),
            desc.total_blocks,
            format,
            options.into(),
        );
        if !ok {
            tracing::warn!(image_index, level_index, ?format, "decode engine failed to transcode level");
            return Err(TranscodeError::EngineFailed);
        }

        destination.write_exact(scratch.as_slice())?;
        tracing::debug!(image_index, level_index, ?format, bytes = required, "transcoded level");
        Ok(required)
    }

    /// Transcodes one level into a newly allocated buffer.
    pub fn transcode_image_to_vec(
        &self,
        image_index: u32,
        level_index: u32,
        format: TranscoderTextureFormat,
        options: TranscodeOptions,
    ) -> Result<Vec<u8>, TranscodeError> {
        let mut output = Vec::new();
        self.transcode_image(&mut output, image_index, level_index, format, options)?;
        Ok(output)
    }
}
