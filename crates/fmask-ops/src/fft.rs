//! Forward and inverse 2D discrete Fourier transform.
//!
//! The forward transform pads a real image to a size the FFT handles
//! efficiently and produces a complex [`Spectrum`] with DC at `[0, 0]`.
//! The inverse takes a (possibly masked) spectrum back to a real image.
//!
//! # Operations
//!
//! - [`optimal_dft_size`] - Padding size (smallest 2·3·5-smooth size)
//! - [`forward`] - Image to spectrum
//! - [`inverse`] - Spectrum to real image, scaled by `1 / (w * h)`
//! - [`normalize`] - Min-max rescale for display
//!
//! # Example
//!
//! ```rust
//! use fmask_core::Grid;
//! use fmask_ops::fft::{forward, inverse};
//!
//! let image = Grid::from_fn(13, 11, |x, y| ((x * y) % 7) as u8);
//! let spectrum = forward(&image).unwrap();
//! assert_eq!(spectrum.dims(), (15, 12));
//!
//! let back = inverse(&spectrum).unwrap();
//! assert!((back.get(3, 4).unwrap() - 5.0).abs() < 1e-3);
//! ```

use std::sync::Arc;

use fmask_core::{Grid, Orientation};
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};
use tracing::{debug, trace};

use crate::spectrum::Spectrum;
use crate::{OpsError, OpsResult};

/// Returns the smallest `m >= n` whose only prime factors are 2, 3 and 5.
///
/// `0` and `1` map to themselves. The result never decreases as `n` grows.
pub fn optimal_dft_size(n: usize) -> usize {
    if n <= 1 {
        return n;
    }
    (n..).find(|&m| is_smooth(m)).unwrap_or(n)
}

fn is_smooth(mut m: usize) -> bool {
    for p in [2, 3, 5] {
        while m % p == 0 {
            m /= p;
        }
    }
    m == 1
}

/// Row and column FFT plans for one grid size and direction pair.
///
/// Planning is the expensive part of a small transform, so the
/// reconstruction loop keeps one of these for the whole session.
#[derive(Clone)]
pub struct Fft2d {
    width: usize,
    height: usize,
    row_forward: Arc<dyn Fft<f32>>,
    col_forward: Arc<dyn Fft<f32>>,
    row_inverse: Arc<dyn Fft<f32>>,
    col_inverse: Arc<dyn Fft<f32>>,
}

impl Fft2d {
    /// Plans transforms for a `width x height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            width,
            height,
            row_forward: planner.plan_fft(width, FftDirection::Forward),
            col_forward: planner.plan_fft(height, FftDirection::Forward),
            row_inverse: planner.plan_fft(width, FftDirection::Inverse),
            col_inverse: planner.plan_fft(height, FftDirection::Inverse),
        }
    }

    /// `(width, height)` this plan was built for.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Unscaled forward transform of a padded image.
    pub fn forward(&self, padded: &Grid<f32>) -> OpsResult<Grid<Complex<f32>>> {
        self.check_dims(padded.dims())?;
        let mut bins = padded.map(|v| Complex::new(v, 0.0));
        self.process(bins.as_mut_slice(), &self.row_forward, &self.col_forward);
        Ok(bins)
    }

    /// Inverse transform scaled by `1 / (w * h)`, real part only.
    pub fn inverse(&self, bins: &Grid<Complex<f32>>) -> OpsResult<Grid<f32>> {
        self.check_dims(bins.dims())?;
        let mut data = bins.clone();
        self.process(data.as_mut_slice(), &self.row_inverse, &self.col_inverse);
        let scale = 1.0 / (self.width * self.height) as f32;
        Ok(data.map(|c| c.re * scale))
    }

    fn check_dims(&self, dims: (usize, usize)) -> OpsResult<()> {
        if dims != self.dims() {
            return Err(fmask_core::Error::dimension_mismatch(dims, self.dims()).into());
        }
        Ok(())
    }

    /// Rows in place, transpose, columns as rows, transpose back.
    fn process(&self, data: &mut [Complex<f32>], row: &Arc<dyn Fft<f32>>, col: &Arc<dyn Fft<f32>>) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }

        data.par_chunks_mut(w).for_each_init(
            || vec![Complex::new(0.0, 0.0); row.get_inplace_scratch_len()],
            |scratch, line| row.process_with_scratch(line, scratch),
        );

        let mut transposed = vec![Complex::new(0.0, 0.0); w * h];
        for y in 0..h {
            for x in 0..w {
                transposed[x * h + y] = data[y * w + x];
            }
        }

        transposed.par_chunks_mut(h).for_each_init(
            || vec![Complex::new(0.0, 0.0); col.get_inplace_scratch_len()],
            |scratch, line| col.process_with_scratch(line, scratch),
        );

        for y in 0..h {
            for x in 0..w {
                data[y * w + x] = transposed[x * h + y];
            }
        }
    }
}

/// Computes the spectrum of a single-channel image.
///
/// The image is zero-padded at the right and bottom to
/// [`optimal_dft_size`] in each dimension. The result is unscaled and in
/// [`Orientation::CornerOrigin`].
///
/// # Errors
///
/// [`OpsError::InvalidInput`] if the image has a zero dimension.
pub fn forward<T: Copy + Into<f32>>(image: &Grid<T>) -> OpsResult<Spectrum> {
    let (w, h) = image.dims();
    if w == 0 || h == 0 {
        return Err(OpsError::InvalidInput(format!("empty image {}x{}", w, h)));
    }

    let pw = optimal_dft_size(w);
    let ph = optimal_dft_size(h);
    trace!(w, h, pw, ph, "fft::forward");

    let padded = image.map(|v| Into::<f32>::into(v)).pad_to(pw, ph, 0.0)?;
    let bins = Fft2d::new(pw, ph).forward(&padded)?;

    debug!(width = pw, height = ph, "Spectrum computed");
    Ok(Spectrum::new(bins, (w, h), Orientation::CornerOrigin))
}

/// Inverse transform of a spectrum over its full padded size.
///
/// # Errors
///
/// [`OpsError::OrientationMismatch`] unless the spectrum is in
/// [`Orientation::CornerOrigin`].
pub fn inverse(spectrum: &Spectrum) -> OpsResult<Grid<f32>> {
    let (w, h) = spectrum.dims();
    inverse_with(&Fft2d::new(w, h), spectrum)
}

/// [`inverse`] with a caller-owned plan.
pub fn inverse_with(plan: &Fft2d, spectrum: &Spectrum) -> OpsResult<Grid<f32>> {
    spectrum.expect_orientation(Orientation::CornerOrigin)?;
    plan.inverse(spectrum.bins())
}

/// Linearly rescales `grid` so its samples span `[lo, hi]`.
///
/// A constant (or empty) grid maps to all `lo`. Non-finite samples are
/// ignored when finding the range and map to `lo`.
pub fn normalize(grid: &Grid<f32>, lo: f32, hi: f32) -> Grid<f32> {
    let (min, max) = grid
        .as_slice()
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(mn, mx), &v| (mn.min(v), mx.max(v)));

    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return grid.map(|_| lo);
    }
    let scale = (hi - lo) / range;
    grid.map(|v| if v.is_finite() { lo + (v - min) * scale } else { lo })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_optimal_dft_size() {
        assert_eq!(optimal_dft_size(0), 0);
        assert_eq!(optimal_dft_size(1), 1);
        assert_eq!(optimal_dft_size(7), 8);
        assert_eq!(optimal_dft_size(11), 12);
        assert_eq!(optimal_dft_size(13), 15);
        assert_eq!(optimal_dft_size(97), 100);
        assert_eq!(optimal_dft_size(511), 512);
        assert_eq!(optimal_dft_size(512), 512);
        assert_eq!(optimal_dft_size(513), 540);
    }

    #[test]
    fn test_optimal_dft_size_monotonic() {
        let mut prev = 0;
        for n in 0..2000 {
            let m = optimal_dft_size(n);
            assert!(m >= n);
            assert!(m >= prev);
            prev = m;
        }
    }

    #[test]
    fn test_forward_rejects_empty() {
        let empty: Grid<u8> = Grid::new(0, 10);
        assert!(matches!(forward(&empty), Err(OpsError::InvalidInput(_))));
        let empty: Grid<u8> = Grid::new(10, 0);
        assert!(matches!(forward(&empty), Err(OpsError::InvalidInput(_))));
    }

    #[test]
    fn test_forward_dc_is_sum() {
        let image = Grid::filled(6, 5, 2u8);
        let spectrum = forward(&image).unwrap();
        assert_eq!(spectrum.dims(), (6, 5));
        let dc = spectrum.bins().get(0, 0).unwrap();
        assert_abs_diff_eq!(dc.re, 60.0, epsilon = 1e-3);
        assert_abs_diff_eq!(dc.im, 0.0, epsilon = 1e-3);
        // Constant image has no other frequencies
        let energy: f32 = spectrum.bins().as_slice()[1..].iter().map(|c| c.norm()).sum();
        assert!(energy < 1e-2);
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let image = Grid::from_fn(9, 7, |x, y| ((x * 31 + y * 17) % 255) as u8);
        let spectrum = forward(&image).unwrap();
        assert_eq!(spectrum.dims(), (9, 8));
        let back = inverse(&spectrum).unwrap();
        for y in 0..8 {
            for x in 0..9 {
                let expected = image.get(x, y).map(f32::from).unwrap_or(0.0);
                assert_abs_diff_eq!(back.get(x, y).unwrap(), expected, epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn test_inverse_requires_corner_origin() {
        let spectrum = forward(&Grid::filled(4, 4, 1u8)).unwrap();
        let centered = spectrum.reoriented(Orientation::Centered);
        assert!(matches!(
            inverse(&centered),
            Err(OpsError::OrientationMismatch { .. })
        ));
    }

    #[test]
    fn test_plan_rejects_wrong_size() {
        let plan = Fft2d::new(8, 8);
        let grid: Grid<f32> = Grid::new(8, 7);
        assert!(plan.forward(&grid).is_err());
    }

    #[test]
    fn test_normalize() {
        let grid = Grid::from_vec(2, 2, vec![-1.0, 0.0, 1.0, 3.0]).unwrap();
        let out = normalize(&grid, 0.0, 1.0);
        assert_eq!(out.as_slice(), &[0.0, 0.25, 0.5, 1.0]);

        let flat = Grid::filled(3, 3, 7.0f32);
        assert!(normalize(&flat, 0.0, 1.0).as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_normalize_non_finite() {
        let grid = Grid::from_vec(5, 1, vec![2.0, f32::NAN, 4.0, f32::INFINITY, 6.0]).unwrap();
        let out = normalize(&grid, 0.0, 1.0);
        assert_eq!(out.as_slice(), &[0.0, 0.0, 0.5, 0.0, 1.0]);
        assert!(out.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
