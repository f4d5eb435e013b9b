//! # fmask-io
//!
//! Image input and frame output for fmask.
//!
//! - [`load_gray`] - Load a PNG or JPEG as an 8-bit luma [`Grid`]
//! - [`save_gray`] / [`save_frame`] - Write 8-bit grayscale PNGs
//! - [`list_images`] - Enumerate candidate images in a directory
//! - [`FrameWriter`] - [`DisplaySink`](fmask_ops::DisplaySink) writing numbered frames
//!
//! # Example
//!
//! ```rust,ignore
//! use fmask_io::{load_gray, FrameWriter};
//! use fmask_ops::{Reconstructor, SweepSchedule};
//!
//! let image = load_gray("imgs/lena.png")?;
//! let rec = Reconstructor::from_image(&image)?;
//! let mut sink = FrameWriter::new("out")?;
//! rec.run_sweep(&SweepSchedule::default(), &mut sink)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convert;
pub mod jpeg;
pub mod list;
pub mod png;
pub mod writer;

use std::io::Read;
use std::path::Path;

use fmask_core::Grid;
use tracing::{debug, trace};

pub use error::{IoError, IoResult};
pub use list::{list_images, select_image};
pub use writer::FrameWriter;

/// Image formats [`load_gray`] understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

impl Format {
    /// Guesses from the file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detects from leading magic bytes.
    pub fn from_header(header: &[u8]) -> Option<Self> {
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }
}

/// Loads a PNG or JPEG file as 8-bit luma.
///
/// The format comes from the file header, falling back to the extension.
///
/// # Errors
///
/// - [`IoError::NotFound`] if `path` does not exist
/// - [`IoError::UnsupportedFormat`] for anything but PNG/JPEG
/// - [`IoError::DecodeError`] for corrupt files
pub fn load_gray<P: AsRef<Path>>(path: P) -> IoResult<Grid<u8>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }

    let mut header = [0u8; 8];
    let n = std::fs::File::open(path)?.read(&mut header)?;
    let format = Format::from_header(&header[..n])
        .or_else(|| Format::from_extension(path))
        .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))?;
    trace!(path = %path.display(), ?format, "load_gray");

    let image = match format {
        Format::Png => crate::png::read_gray(path)?,
        Format::Jpeg => crate::jpeg::read_gray(path)?,
    };
    debug!(width = image.width(), height = image.height(), "Loaded {}", path.display());
    Ok(image)
}

/// Writes an 8-bit grid as a grayscale PNG.
pub fn save_gray<P: AsRef<Path>>(path: P, image: &Grid<u8>) -> IoResult<()> {
    crate::png::write_gray(path, image)
}

/// Writes a `[0, 1]` frame as a grayscale PNG.
pub fn save_frame<P: AsRef<Path>>(path: P, frame: &Grid<f32>) -> IoResult<()> {
    crate::png::write_gray(path, &convert::frame_to_gray(frame))
}
