//! Error types for fmask-core operations.
//!
//! The [`Error`] enum covers failure modes of grid construction and access:
//! bounds checks, region extraction and dimension agreement between grids.
//!
//! # Usage
//!
//! ```rust
//! use fmask_core::{Error, Result};
//!
//! fn check(x: usize, y: usize, width: usize, height: usize) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or accessing grids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sample coordinates are outside grid bounds.
    #[error("sample ({x}, {y}) out of bounds for grid {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: usize,
        /// Y coordinate that was out of bounds
        y: usize,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// Region extends beyond grid bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds grid bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: usize,
        /// Region Y origin
        ry: usize,
        /// Region width
        rw: usize,
        /// Region height
        rh: usize,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// Two grids that must agree in size do not.
    ///
    /// Returned when a mask is applied to a spectrum of a different size,
    /// or when two grids are combined element-wise.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First grid width
        a_width: usize,
        /// First grid height
        a_height: usize,
        /// Second grid width
        b_width: usize,
        /// Second grid height
        b_height: usize,
    },

    /// Buffer length or requested size is not usable.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(
        rx: usize,
        ry: usize,
        rw: usize,
        rh: usize,
        width: usize,
        height: usize,
    ) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (usize, usize), b: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}
