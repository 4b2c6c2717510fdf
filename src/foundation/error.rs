use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy for loading, rendering and exporting animations.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The document payload was absent, unreadable or malformed.
    #[error("load error: {0}")]
    Load(String),

    /// An operation needed a loaded document with a non-zero canvas.
    #[error("animation not loaded (no document, or canvas size is zero)")]
    NotLoaded,

    /// The effective frame rate was zero, negative or not finite.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Frame iteration was requested on a document without frames.
    #[error("animation has no frames")]
    EmptySequence,

    /// An export resolved to an empty frame list.
    #[error("no frames to export")]
    EmptyFrameSet,

    /// The codec returned successfully but the output file is missing.
    #[error("{format} not written: '{}' does not exist", path.display())]
    WriteVerification {
        /// Container format name (`GIF`, `WebP`, `APNG`).
        format: &'static str,
        /// Destination that was expected to exist.
        path: PathBuf,
    },

    /// Failure inside the rasterizer backend.
    #[error("raster error: {0}")]
    Raster(String),

    /// Failure inside the container codec.
    #[error("codec error: {0}")]
    Codec(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build an [`ExportError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build an [`ExportError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
