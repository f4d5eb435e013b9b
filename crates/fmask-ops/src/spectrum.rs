//! Complex spectrum of a padded image and mask application.

use fmask_core::{shift, Grid, Orientation};
use rustfft::num_complex::Complex;
use tracing::trace;

use crate::fft::normalize;
use crate::mask::Mask;
use crate::{OpsError, OpsResult};

/// Fourier spectrum of a zero-padded image.
///
/// Holds the complex bins, the size of the image before padding and the
/// orientation of the bins. Produced once per session by
/// [`fft::forward`](crate::fft::forward) and never modified afterwards:
/// masking returns a new spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Grid<Complex<f32>>,
    source_dims: (usize, usize),
    orientation: Orientation,
}

impl Spectrum {
    /// Wraps complex bins.
    pub fn new(
        bins: Grid<Complex<f32>>,
        source_dims: (usize, usize),
        orientation: Orientation,
    ) -> Self {
        Self {
            bins,
            source_dims,
            orientation,
        }
    }

    /// Builds a spectrum from separate real and imaginary planes.
    ///
    /// # Errors
    ///
    /// [`OpsError::Core`] with a dimension mismatch if the planes differ in size.
    pub fn from_planes(
        re: &Grid<f32>,
        im: &Grid<f32>,
        source_dims: (usize, usize),
        orientation: Orientation,
    ) -> OpsResult<Self> {
        re.ensure_same_dims(im)?;
        let data = re
            .as_slice()
            .iter()
            .zip(im.as_slice())
            .map(|(&r, &i)| Complex::new(r, i))
            .collect();
        let bins = Grid::from_vec(re.width(), re.height(), data)?;
        Ok(Self::new(bins, source_dims, orientation))
    }

    /// Padded `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.bins.dims()
    }

    /// Size of the image before padding.
    pub fn source_dims(&self) -> (usize, usize) {
        self.source_dims
    }

    /// Where DC currently lives.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The complex bins.
    pub fn bins(&self) -> &Grid<Complex<f32>> {
        &self.bins
    }

    /// Splits the bins into `(real, imaginary)` planes.
    pub fn planes(&self) -> (Grid<f32>, Grid<f32>) {
        (self.bins.map(|c| c.re), self.bins.map(|c| c.im))
    }

    /// Returns a copy with DC moved to `orientation`.
    pub fn reoriented(&self, orientation: Orientation) -> Spectrum {
        Spectrum {
            bins: shift::reorient(&self.bins, self.orientation, orientation),
            source_dims: self.source_dims,
            orientation,
        }
    }

    pub(crate) fn expect_orientation(&self, expected: Orientation) -> OpsResult<()> {
        if self.orientation != expected {
            return Err(OpsError::OrientationMismatch {
                expected,
                actual: self.orientation,
            });
        }
        Ok(())
    }

    /// Keeps bins where the mask is nonzero and zeroes the rest.
    ///
    /// The mask must have the spectrum's size and orientation; callers
    /// convert centered masks with [`Mask::to_orientation`] first.
    ///
    /// # Errors
    ///
    /// - [`OpsError::DimensionMismatch`] if sizes differ. Nothing is
    ///   truncated or wrapped.
    /// - [`OpsError::OrientationMismatch`] if orientations differ.
    pub fn apply_mask(&self, mask: &Mask) -> OpsResult<Spectrum> {
        if mask.dims() != self.dims() {
            return Err(OpsError::dimension_mismatch(mask.dims(), self.dims()));
        }
        if mask.orientation() != self.orientation {
            return Err(OpsError::OrientationMismatch {
                expected: self.orientation,
                actual: mask.orientation(),
            });
        }
        trace!(nonzero = mask.count_nonzero(), "Spectrum::apply_mask");

        let zero = Complex::new(0.0, 0.0);
        let data = self
            .bins
            .as_slice()
            .iter()
            .zip(mask.grid().as_slice())
            .map(|(&bin, &m)| if m != 0 { bin } else { zero })
            .collect();
        Ok(Spectrum {
            bins: Grid::from_vec(self.bins.width(), self.bins.height(), data)?,
            source_dims: self.source_dims,
            orientation: self.orientation,
        })
    }

    /// Centered `ln(1 + |z|)` view scaled to `[0, 1]` for display.
    pub fn log_magnitude(&self) -> Grid<f32> {
        let magnitude = self.bins.map(|c| c.norm().ln_1p());
        let centered = shift::reorient(&magnitude, self.orientation, Orientation::Centered);
        normalize(&centered, 0.0, 1.0)
    }
}
