//! # fmask-core
//!
//! Core types for frequency-domain mask filtering.
//!
//! This crate provides the foundational types used throughout fmask:
//!
//! - [`Grid`] - Row-major 2D buffer used for images, masks and spectra
//! - [`Orientation`] - Where the zero frequency lives in a grid
//! - [`shift`] - Quadrant shift between [`Orientation::Centered`] and
//!   [`Orientation::CornerOrigin`], exact for odd dimensions
//!
//! ## Crate Structure
//!
//! ```text
//! fmask-core (this crate)
//!    ^
//!    |
//!    +-- fmask-ops (transform, masks, editor, reconstruction)
//!    +-- fmask-io (image loading, frame output)
//!    +-- fmask-cli
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fmask_core::{Grid, shift};
//!
//! let grid = Grid::from_fn(5, 3, |x, y| (y * 5 + x) as u8);
//! let corner = shift::to_corner_origin(&grid);
//! assert_eq!(shift::to_centered(&corner), grid);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod grid;
pub mod shift;

pub use error::{Error, Result};
pub use grid::Grid;
pub use shift::Orientation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::Grid;
    pub use crate::shift::{reorient, to_centered, to_corner_origin, Orientation};
}
