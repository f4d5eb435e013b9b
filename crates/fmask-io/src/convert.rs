//! Pixel conversions between decoded images, grids and display frames.

use fmask_core::Grid;

/// ITU-R BT.601 luma of an 8-bit RGB pixel, rounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((y + 500) / 1000) as u8
}

/// Quantizes a `[0, 1]` frame to 8 bits. Values outside the range clamp;
/// NaN becomes 0.
pub fn frame_to_gray(frame: &Grid<f32>) -> Grid<u8> {
    frame.map(|v| {
        if v.is_nan() {
            0
        } else {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    })
}
