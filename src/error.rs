//! Error taxonomy for filter operations.
//!
//! Every variant is a local precondition violation detected before any
//! output buffer is allocated, so a failed call never yields partial output.
//! None of them are transient: retrying with the same inputs fails the same way.

use thiserror::Error;

/// Errors raised by the filter operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The operation needs a specific channel layout (e.g. `rgb_to_gray`
    /// needs 3, edge operators need 1), or a buffer was built with a
    /// channel count other than 1 or 3.
    #[error("expected {expected} channel(s), got {actual}")]
    InvalidChannelCount {
        expected: &'static str,
        actual: usize,
    },

    /// Two inputs that must share a shape do not.
    /// Shapes are reported as `(height, width, channels)`.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },

    /// A raw sample buffer does not match its declared dimensions.
    #[error("buffer holds {actual} samples, dimensions require {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("kernel size must be at least 1, got {0}")]
    InvalidKernelSize(usize),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The Canny backend only supports a 3x3 Sobel aperture.
    #[error("unsupported Canny aperture size {0}")]
    UnsupportedAperture(u8),
}

impl FilterError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for all fallible filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
