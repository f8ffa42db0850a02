//! The sentinel returning surface used by host language bindings.
//!
//! Every call returns a `u32`. `0` means failure of any kind: an inert or closed handle,
//! an out of range index, an unsupported format code, or a decode engine failure.

use crate::basis_file::BasisFile;
use crate::destination::TranscodeDestination;
use crate::error::{BasisFileError, TranscodeError};
use crate::transcode::TranscodeOptions;
use basis_transcode_common::{DecodeEngine, DecodeFlags, SelectorCodebook, TranscoderTextureFormat};

/// A [`BasisFile`] behind the host binding protocol.
pub struct HostBasisFile<'c, E: DecodeEngine> {
    file: BasisFile<'c, E>,
}

#[cfg(feature = "std")]
impl<E: DecodeEngine + Default> HostBasisFile<'static, E> {
    /// Copies `source` and binds it to the global codebook.
    ///
    /// Fails only if [`initialize`](basis_transcode_common::initialize) has not been called.
    pub fn new(source: &[u8]) -> Result<Self, BasisFileError> {
        BasisFile::new(source).map(Self::from)
    }
}

impl<'c, E: DecodeEngine + Default> HostBasisFile<'c, E> {
    /// Copies `source` and binds it to `codebook`. An invalid container gives an inert handle.
    pub fn with_codebook(codebook: &'c SelectorCodebook, source: &[u8]) -> Self {
        BasisFile::with_codebook(codebook, source).into()
    }
}

impl<'c, E: DecodeEngine> From<BasisFile<'c, E>> for HostBasisFile<'c, E> {
    fn from(file: BasisFile<'c, E>) -> Self {
        Self { file }
    }
}

impl<'c, E: DecodeEngine> HostBasisFile<'c, E> {
    /// The typed handle underneath.
    pub fn file(&self) -> &BasisFile<'c, E> {
        &self.file
    }

    /// Releases the file bytes. Every later call returns `0`.
    pub fn close(&mut self) {
        self.file.close();
    }

    /// `1` if the file carries alpha slices.
    pub fn get_has_alpha(&self) -> u32 {
        self.file.has_alpha().map(u32::from).unwrap_or(0)
    }

    /// Number of images in the file.
    pub fn get_num_images(&self) -> u32 {
        self.file.image_count().unwrap_or(0)
    }

    /// Number of mipmap levels of `image_index`.
    pub fn get_num_levels(&self, image_index: u32) -> u32 {
        self.file.level_count(image_index).unwrap_or(0)
    }

    /// Original width in pixels of the given level.
    pub fn get_image_width(&self, image_index: u32, level_index: u32) -> u32 {
        self.file.level_width(image_index, level_index).unwrap_or(0)
    }

    /// Original height in pixels of the given level.
    pub fn get_image_height(&self, image_index: u32, level_index: u32) -> u32 {
        self.file.level_height(image_index, level_index).unwrap_or(0)
    }

    /// Bytes needed to hold the level transcoded to the format with code `format`.
    ///
    /// Also `0` if the size does not fit in a `u32`.
    pub fn get_image_transcoded_size_in_bytes(
        &self,
        image_index: u32,
        level_index: u32,
        format: u32,
    ) -> u32 {
        self.transcoded_size(image_index, level_index, format)
            .unwrap_or(0)
    }

    /// Unpacks the shared codebooks and tables. Must return `1` before
    /// [`transcode_image`](Self::transcode_image) can succeed.
    pub fn start_transcoding(&mut self) -> u32 {
        self.file.start_transcoding().is_ok() as u32
    }

    /// Transcodes a level into `destination`, which must hold exactly the transcoded size.
    ///
    /// `pvrtc_wrap_addressing` and `alpha_for_opaque_formats` are booleans; any non-zero
    /// value enables the option.
    pub fn transcode_image<D: TranscodeDestination + ?Sized>(
        &self,
        destination: &mut D,
        image_index: u32,
        level_index: u32,
        format: u32,
        pvrtc_wrap_addressing: u32,
        alpha_for_opaque_formats: u32,
    ) -> u32 {
        let options = TranscodeOptions::from(DecodeFlags::from_host(
            pvrtc_wrap_addressing,
            alpha_for_opaque_formats,
        ));

        TranscoderTextureFormat::try_from(format)
            .map_err(|e| TranscodeError::from(BasisFileError::from(e)))
            .and_then(|format| {
                self.file
                    .transcode_image(destination, image_index, level_index, format, options)
            })
            .is_ok() as u32
    }

    fn transcoded_size(&self, image_index: u32, level_index: u32, format: u32) -> Option<u32> {
        let format = TranscoderTextureFormat::try_from(format).ok()?;
        let size = self
            .file
            .transcoded_size(image_index, level_index, format)
            .ok()?;
        u32::try_from(size).ok()
    }
}
