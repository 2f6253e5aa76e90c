/// Convenience result type used across the crate.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by layout, rendering and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Invalid user-provided configuration or project data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source image with a zero (or non-finite) side; it can never be fitted.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidImageDimensions {
        /// Reported source width.
        width: f64,
        /// Reported source height.
        height: f64,
    },

    /// The measurement oracle could not produce a width (font not loaded, shaping failure).
    #[error("unmeasurable text: {0}")]
    UnmeasurableText(String),

    /// Image bytes in a container format the decoder does not understand.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Image bytes in a known format that failed to decode.
    #[error("corrupt image: {0}")]
    CorruptImage(String),

    /// Errors while encoding a rendered surface.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors while assembling a batch archive.
    #[error("archive error: {0}")]
    Archive(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build a [`OverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`OverlayError::UnmeasurableText`] value.
    pub fn unmeasurable(msg: impl Into<String>) -> Self {
        Self::UnmeasurableText(msg.into())
    }

    /// Build a [`OverlayError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`OverlayError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`OverlayError::InvalidImageDimensions`] value.
    pub fn invalid_dimensions(width: f64, height: f64) -> Self {
        Self::InvalidImageDimensions { width, height }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
