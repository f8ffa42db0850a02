//! The container handle and its metadata queries.

use crate::error::BasisFileError;
use crate::state::HandleState;
use alloc::vec::Vec;
use basis_transcode_common::{
    DecodeEngine, ImageInfo, ImageLevelDesc, ImageLevelInfo, SelectorCodebook,
};

/// A private copy of a texture container, bound to a decode engine and a codebook.
///
/// A handle whose container fails validation is still returned by [`BasisFile::new`] and
/// [`BasisFile::with_codebook`], but every query on it fails with
/// [`BasisFileError::InvalidHeader`]. Use [`BasisFile::open`] to reject such input up front.
pub struct BasisFile<'c, E: DecodeEngine> {
    pub(crate) bytes: Vec<u8>,
    pub(crate) codebook: &'c SelectorCodebook,
    pub(crate) engine: E,
    pub(crate) state: HandleState,
    pub(crate) transcoding_started: bool,
}

#[cfg(feature = "std")]
impl<E: DecodeEngine + Default> BasisFile<'static, E> {
    /// Copies `source` and binds it to the global codebook.
    ///
    /// Fails only if [`initialize`](basis_transcode_common::initialize) has not been called.
    /// An invalid container yields an inert handle.
    pub fn new(source: &[u8]) -> Result<Self, BasisFileError> {
        let codebook =
            basis_transcode_common::global_codebook().ok_or(BasisFileError::NotInitialized)?;
        Ok(Self::with_codebook(codebook, source))
    }

    /// Like [`BasisFile::new`], but fails if the container is invalid.
    pub fn open(source: &[u8]) -> Result<Self, BasisFileError> {
        let file = Self::new(source)?;
        file.state.check()?;
        Ok(file)
    }
}

impl<'c, E: DecodeEngine + Default> BasisFile<'c, E> {
    /// Copies `source` and binds it to `codebook`.
    pub fn with_codebook(codebook: &'c SelectorCodebook, source: &[u8]) -> Self {
        Self::with_engine(codebook, E::default(), source)
    }
}

impl<'c, E: DecodeEngine> BasisFile<'c, E> {
    /// Copies `source` and binds it to `codebook`, using an already constructed engine.
    pub fn with_engine(codebook: &'c SelectorCodebook, engine: E, source: &[u8]) -> Self {
        let mut file = Self {
            bytes: source.to_vec(),
            codebook,
            engine,
            state: HandleState::Invalid,
            transcoding_started: false,
        };

        if file.engine.validate_header(&file.bytes) {
            file.state = HandleState::Live;
        } else {
            tracing::warn!(len = source.len(), "rejected container with an invalid header");
            file.bytes = Vec::new();
        }

        file
    }

    /// Releases the container bytes. Every later query fails with [`BasisFileError::Closed`].
    pub fn close(&mut self) {
        self.bytes = Vec::new();
        self.state = HandleState::Closed;
        self.transcoding_started = false;
    }

    /// Whether the handle is live, held an invalid container, or was closed.
    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Shorthand for `state() == HandleState::Live`.
    pub fn is_live(&self) -> bool {
        self.state == HandleState::Live
    }

    /// The owned container bytes. Empty unless the handle is live.
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    /// The decode engine this handle queries.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The selector codebook handed to the engine.
    pub fn codebook(&self) -> &'c SelectorCodebook {
        self.codebook
    }

    pub(crate) fn live_data(&self) -> Result<&[u8], BasisFileError> {
        self.state.check()?;
        if self.bytes.is_empty() {
            return Err(BasisFileError::InvalidHeader);
        }
        Ok(&self.bytes)
    }

    /// Whether the base level of the first image carries alpha.
    pub fn has_alpha(&self) -> Result<bool, BasisFileError> {
        Ok(self.image_level_info(0, 0)?.alpha_flag)
    }

    /// Number of images in the container.
    pub fn image_count(&self) -> Result<u32, BasisFileError> {
        let data = self.live_data()?;
        Ok(self.engine.total_images(data))
    }

    /// Number of mip levels of an image.
    pub fn level_count(&self, image_index: u32) -> Result<u32, BasisFileError> {
        Ok(self.image_info(image_index)?.total_levels)
    }

    /// Original pixel width of a level.
    pub fn level_width(&self, image_index: u32, level_index: u32) -> Result<u32, BasisFileError> {
        Ok(self.image_level_desc(image_index, level_index)?.orig_width)
    }

    /// Original pixel height of a level.
    pub fn level_height(&self, image_index: u32, level_index: u32) -> Result<u32, BasisFileError> {
        Ok(self.image_level_desc(image_index, level_index)?.orig_height)
    }

    /// Level count, base dimensions and alpha flag of an image.
    pub fn image_info(&self, image_index: u32) -> Result<ImageInfo, BasisFileError> {
        let data = self.live_data()?;
        self.engine
            .image_info(data, image_index)
            .ok_or(BasisFileError::ImageNotFound { image_index })
    }

    /// Full descriptor of a single level.
    pub fn image_level_info(
        &self,
        image_index: u32,
        level_index: u32,
    ) -> Result<ImageLevelInfo, BasisFileError> {
        let data = self.live_data()?;
        self.engine
            .image_level_info(data, image_index, level_index)
            .ok_or(BasisFileError::LevelNotFound {
                image_index,
                level_index,
            })
    }

    /// Dimensions and block count of a level.
    pub fn image_level_desc(
        &self,
        image_index: u32,
        level_index: u32,
    ) -> Result<ImageLevelDesc, BasisFileError> {
        let data = self.live_data()?;
        self.engine
            .image_level_desc(data, image_index, level_index)
            .ok_or(BasisFileError::LevelNotFound {
                image_index,
                level_index,
            })
    }
}
