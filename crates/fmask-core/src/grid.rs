//! Row-major 2D sample buffer.
//!
//! [`Grid`] is the one container used for every 2D quantity in fmask:
//! 8-bit source images, float frames, masks and complex spectra.
//!
//! # Memory Layout
//!
//! Samples are stored top-to-bottom, one row after another, with no padding:
//!
//! ```text
//! index(x, y) = y * width + x
//! ```
//!
//! # Example
//!
//! ```rust
//! use fmask_core::Grid;
//!
//! let mut grid: Grid<f32> = Grid::new(4, 3);
//! grid.set(1, 2, 0.5).unwrap();
//! assert_eq!(grid.get(1, 2), Some(0.5));
//! assert_eq!(grid.row(2), &[0.0, 0.5, 0.0, 0.0]);
//! ```

use crate::{Error, Result};

/// Owned row-major 2D buffer of `width * height` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Grid width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in samples.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks that `other` has the same dimensions.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] naming both sizes.
    pub fn ensure_same_dims<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(Error::dimension_mismatch(self.dims(), other.dims()));
        }
        Ok(())
    }
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T: Copy> Grid<T> {
    /// Creates a grid with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "size overflows usize"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` for every sample.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Assembles a grid from a buffer whose length the caller has already
    /// established.
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns the sample at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes the sample at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.data[y * self.width + x] = value;
        Ok(())
    }

    /// Row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Row `y` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// All samples in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// All samples in row-major order, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Applies `f` to every sample, producing a grid of the same size.
    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Copies the `w x h` region at `(x, y)` into a new grid.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if the region leaves the grid.
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Grid<T>> {
        let fits = x.checked_add(w).is_some_and(|r| r <= self.width)
            && y.checked_add(h).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(Error::invalid_region(x, y, w, h, self.width, self.height));
        }
        let mut data = Vec::with_capacity(w * h);
        for row in y..y + h {
            data.extend_from_slice(&self.row(row)[x..x + w]);
        }
        Ok(Grid::from_parts(w, h, data))
    }

    /// Extends the grid to `width x height`, filling new samples at the
    /// right and bottom with `fill`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if the target is smaller than the grid.
    pub fn pad_to(&self, width: usize, height: usize, fill: T) -> Result<Grid<T>> {
        if width < self.width || height < self.height {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("cannot pad {}x{} down", self.width, self.height),
            ));
        }
        let mut out = Grid::filled(width, height, fill);
        for y in 0..self.height {
            out.row_mut(y)[..self.width].copy_from_slice(self.row(y));
        }
        Ok(out)
    }
}
