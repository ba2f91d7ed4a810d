//! Rendering error types.

use thiserror::Error;

use gridscope_core::GridscopeError;

/// Errors reported by a rendering backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The buffer handle was never created or has been deleted.
    #[error("unknown buffer handle {0}")]
    UnknownBuffer(u32),

    /// The texture handle was never created or has been deleted.
    #[error("unknown texture handle {0}")]
    UnknownTexture(u32),

    /// A vertex buffer was used where an index buffer is expected, or the
    /// other way round.
    #[error("buffer {handle} is not a {expected} buffer")]
    BufferKindMismatch { handle: u32, expected: &'static str },

    /// Texture data does not match its dimensions.
    #[error("texture data has {actual} bytes, expected {expected}")]
    TextureSizeMismatch { expected: usize, actual: usize },

    /// Buffer creation failed.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// Texture creation failed.
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for GridscopeError {
    fn from(error: RenderError) -> Self {
        GridscopeError::RenderError(error.to_string())
    }
}
