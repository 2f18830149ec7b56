/// Digest operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    // General errors
    #[error("memory allocation failed")]
    MemAllocFail,
    #[error("invalid algorithm id")]
    InvalidAlgId,
    #[error("invalid argument")]
    InvalidArg,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // Primitive errors
    #[error("hash primitive failure")]
    PrimitiveFail,
}

impl CryptoError {
    /// The output length the caller must supply, when the error carries one.
    pub fn required_len(&self) -> Option<usize> {
        match self {
            Self::BufferTooSmall { need, .. } => Some(*need),
            _ => None,
        }
    }
}
