use crate::error::BasisFileError;

/// Lifecycle of a [`BasisFile`](crate::BasisFile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// The container passed validation and its bytes are held.
    Live,
    /// The container failed validation. The handle is inert.
    Invalid,
    /// [`close`](crate::BasisFile::close) was called.
    Closed,
}

impl HandleState {
    /// Succeeds only for [`HandleState::Live`].
    #[inline]
    pub fn check(self) -> Result<(), BasisFileError> {
        match self {
            HandleState::Live => Ok(()),
            HandleState::Invalid => Err(BasisFileError::InvalidHeader),
            HandleState::Closed => Err(BasisFileError::Closed),
        }
    }
}
