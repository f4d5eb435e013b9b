//! # fmask-ops
//!
//! Frequency-domain mask filtering of grayscale images.
//!
//! An image is transformed once into a [`Spectrum`]. A [`Mask`] then selects
//! which frequency bins survive, and the masked spectrum is transformed back
//! into a displayable image. Masks are either swept disks of growing radius
//! or painted interactively with a pointer.
//!
//! # Modules
//!
//! - [`fft`] - Forward/inverse 2D transform, padding sizes, normalization
//! - [`spectrum`] - Spectrum container and mask application
//! - [`mask`] - Disk masks, brush stamps, sweep schedules
//! - [`editor`] - Pointer state machine that paints a mask
//! - [`reconstruct`] - Sweep and interactive reconstruction loops
//! - [`config`] - YAML session config and event scripts
//!
//! # Example
//!
//! ```rust
//! use fmask_core::Grid;
//! use fmask_ops::{Mask, Reconstructor};
//!
//! let image = Grid::from_fn(30, 20, |x, y| ((x ^ y) * 8 % 256) as u8);
//! let rec = Reconstructor::from_image(&image).unwrap();
//! let (w, h) = rec.dims();
//!
//! // Low-pass: keep a small disk around DC
//! let frame = rec.reconstruct(&Mask::disk(w, h, 6)).unwrap();
//! assert_eq!(frame.dims(), (30, 20));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod editor;
pub mod fft;
pub mod mask;
pub mod reconstruct;
pub mod spectrum;

pub use config::{EventScript, SessionConfig};
pub use editor::{MaskEditor, PointerAction, PointerEvent};
pub use error::{OpsError, OpsResult};
pub use mask::{Mask, SweepSchedule};
pub use reconstruct::{Advance, DisplaySink, EventSource, Frame, PaintSession, Reconstructor, StopSignal};
pub use spectrum::Spectrum;
