//! Error types for spectral operations.

use fmask_core::Orientation;
use thiserror::Error;

/// Error type for spectral operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Input image is empty or has a zero dimension.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Mask and spectrum sizes differ.
    #[error("dimension mismatch: mask {mask_width}x{mask_height} vs spectrum {spectrum_width}x{spectrum_height}")]
    DimensionMismatch {
        /// Mask width
        mask_width: usize,
        /// Mask height
        mask_height: usize,
        /// Spectrum width
        spectrum_width: usize,
        /// Spectrum height
        spectrum_height: usize,
    },

    /// Grid is in the wrong orientation for the operation.
    #[error("orientation mismatch: expected {expected:?}, got {actual:?}")]
    OrientationMismatch {
        /// Orientation the operation requires
        expected: Orientation,
        /// Orientation of the grid passed in
        actual: Orientation,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration or event script could not be read.
    #[error("config error: {0}")]
    Config(String),

    /// Display sink failed to deliver a frame.
    #[error("display sink: {0}")]
    Sink(String),

    /// Grid-level failure.
    #[error(transparent)]
    Core(#[from] fmask_core::Error),
}

impl OpsError {
    /// Creates an [`OpsError::DimensionMismatch`] from `(width, height)` pairs.
    pub fn dimension_mismatch(mask: (usize, usize), spectrum: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            mask_width: mask.0,
            mask_height: mask.1,
            spectrum_width: spectrum.0,
            spectrum_height: spectrum.1,
        }
    }
}

/// Result type for spectral operations.
pub type OpsResult<T> = Result<T, OpsError>;
