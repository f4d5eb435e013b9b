//! Spectral masks: swept disks and painted buffers.
//!
//! A [`Mask`] is an 8-bit grid the size of the spectrum. `0` blocks a
//! frequency bin and any nonzero value passes it; painting uses the full
//! `0..=255` range so soft brushes can build up gradually.
//!
//! Masks are authored in [`Orientation::Centered`], where a disk around the
//! grid center selects a band of low frequencies.
//!
//! # Example
//!
//! ```rust
//! use fmask_ops::mask::{Mask, BrushProfile, Paint};
//!
//! // Sweep mode: one independent disk per radius
//! let disk = Mask::disk(64, 64, 10);
//! assert!(disk.passes(32, 32));
//! assert!(!disk.passes(0, 0));
//!
//! // Paint mode: stamps accumulate on one buffer
//! let mut mask = Mask::new(64, 64);
//! mask.stamp(10, 10, 5, Paint::White, BrushProfile::Hard);
//! mask.stamp(10, 10, 2, Paint::Black, BrushProfile::Hard);
//! assert!(!mask.passes(10, 10));
//! assert!(mask.passes(14, 10));
//! ```

use fmask_core::{shift, Grid, Orientation};
use serde::{Deserialize, Serialize};

use crate::{OpsError, OpsResult};

/// Fully passing mask value.
pub const WHITE: u8 = u8::MAX;

/// Fully blocking mask value.
pub const BLACK: u8 = 0;

/// Largest radius [`Mask::stamp`] rasterizes; bigger radii are clamped.
pub const MAX_STAMP_RADIUS: u32 = 1 << 30;

/// Direction of a paint stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Adds toward [`WHITE`].
    White,
    /// Subtracts toward [`BLACK`].
    Black,
}

/// Footprint of a paint stamp.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BrushProfile {
    /// Full strength everywhere inside the disk.
    #[default]
    Hard,
    /// Gaussian falloff from the center, `255 * exp(-d² / 2σ²)`.
    /// Sigma below 1 is treated as 1.
    Soft {
        /// Standard deviation in pixels.
        sigma: f32,
    },
}

impl BrushProfile {
    #[inline]
    fn strength(self, d2: i64) -> u8 {
        match self {
            Self::Hard => WHITE,
            Self::Soft { sigma } => {
                let sigma = f64::from(sigma.max(1.0));
                let w = (-(d2 as f64) / (2.0 * sigma * sigma)).exp();
                (w * f64::from(WHITE)).round() as u8
            }
        }
    }
}

/// Single-channel spectral mask with an orientation tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    grid: Grid<u8>,
    orientation: Orientation,
}

impl Mask {
    /// All-black centered mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::filled(width, height, BLACK),
            orientation: Orientation::Centered,
        }
    }

    /// Centered disk of [`WHITE`] on black, as used by the radius sweep.
    ///
    /// The disk is centered at `(width / 2, height / 2)` and covers every
    /// sample with `dx² + dy² <= radius²`. Radius 0 marks only the center.
    pub fn disk(width: usize, height: usize, radius: u32) -> Self {
        let mut mask = Self::new(width, height);
        mask.stamp(
            (width / 2) as i64,
            (height / 2) as i64,
            radius,
            Paint::White,
            BrushProfile::Hard,
        );
        mask
    }

    /// `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        self.grid.dims()
    }

    /// Where DC is assumed to be.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Underlying samples.
    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    /// Underlying samples, mutable.
    pub fn grid_mut(&mut self) -> &mut Grid<u8> {
        &mut self.grid
    }

    /// `true` if the sample at `(x, y)` is nonzero.
    pub fn passes(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y).is_some_and(|v| v != BLACK)
    }

    /// Number of passing samples.
    pub fn count_nonzero(&self) -> usize {
        self.grid.as_slice().iter().filter(|&&v| v != BLACK).count()
    }

    /// `true` if every sample equals `value`.
    pub fn is_all(&self, value: u8) -> bool {
        self.grid.as_slice().iter().all(|&v| v == value)
    }

    /// Sets every sample to white or black.
    pub fn fill(&mut self, paint: Paint) {
        self.grid.fill(match paint {
            Paint::White => WHITE,
            Paint::Black => BLACK,
        });
    }

    /// Returns a copy moved to `orientation` by quadrant shift.
    pub fn to_orientation(&self, orientation: Orientation) -> Mask {
        Mask {
            grid: shift::reorient(&self.grid, self.orientation, orientation),
            orientation,
        }
    }

    /// Mask as a `[0, 1]` float frame for display.
    pub fn to_frame(&self) -> Grid<f32> {
        self.grid.map(|v| f32::from(v) / f32::from(WHITE))
    }

    /// Draws a filled disk at `(cx, cy)` onto the mask.
    ///
    /// White stamps add the profile strength and black stamps subtract it,
    /// saturating at `0` and `255`. The disk is clipped to the grid, so
    /// centers outside it are allowed and simply draw less (or nothing).
    /// Radii above [`MAX_STAMP_RADIUS`] are clamped to it.
    pub fn stamp(&mut self, cx: i64, cy: i64, radius: u32, paint: Paint, profile: BrushProfile) {
        let (w, h) = self.grid.dims();
        if w == 0 || h == 0 {
            return;
        }
        let r = i64::from(radius.min(MAX_STAMP_RADIUS));
        let r2 = r * r;

        let y0 = cy.saturating_sub(r).max(0);
        let y1 = cy.saturating_add(r).min(h as i64 - 1);
        for y in y0..=y1 {
            let dy = y - cy;
            let span = isqrt(r2 - dy * dy);
            let x0 = cx.saturating_sub(span).max(0);
            let x1 = cx.saturating_add(span).min(w as i64 - 1);
            if x0 > x1 {
                continue;
            }
            let row = &mut self.grid.row_mut(y as usize)[x0 as usize..=x1 as usize];
            for (x, sample) in (x0..=x1).zip(row.iter_mut()) {
                let dx = x - cx;
                let strength = profile.strength(dx * dx + dy * dy);
                *sample = match paint {
                    Paint::White => sample.saturating_add(strength),
                    Paint::Black => sample.saturating_sub(strength),
                };
            }
        }
    }
}

/// Largest `s` with `s * s <= n`, for `n >= 0`.
fn isqrt(n: i64) -> i64 {
    let mut s = (n as f64).sqrt() as i64;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}

/// Radii visited by the disk sweep: `start, start + step, ...` below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSchedule {
    /// First radius.
    pub start: u32,
    /// Increment between radii.
    pub step: u32,
    /// Exclusive upper bound.
    pub end: u32,
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            start: 0,
            step: 5,
            end: 4000,
        }
    }
}

impl SweepSchedule {
    /// Checks that the schedule advances.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] for a zero step.
    pub fn validate(&self) -> OpsResult<()> {
        if self.step == 0 {
            return Err(OpsError::InvalidParameter("sweep step must be > 0".into()));
        }
        Ok(())
    }

    /// Iterates the radii in increasing order.
    pub fn radii(&self) -> impl Iterator<Item = u32> + use<> {
        (self.start..self.end).step_by(self.step.max(1) as usize)
    }

    /// Number of radii in the schedule.
    pub fn len(&self) -> usize {
        self.radii().count()
    }

    /// `true` if the schedule visits no radius.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(x: usize, y: usize, cx: usize, cy: usize, r: u32) -> bool {
        let dx = x as i64 - cx as i64;
        let dy = y as i64 - cy as i64;
        dx * dx + dy * dy <= i64::from(r) * i64::from(r)
    }

    #[test]
    fn test_disk_matches_distance_rule() {
        for &(w, h) in &[(32usize, 32usize), (31, 20), (17, 33)] {
            for r in [1u32, 3, 7, 12] {
                let mask = Mask::disk(w, h, r);
                for y in 0..h {
                    for x in 0..w {
                        assert_eq!(
                            mask.passes(x, y),
                            inside(x, y, w / 2, h / 2, r),
                            "{}x{} r={} at ({}, {})",
                            w,
                            h,
                            r,
                            x,
                            y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_disk_radius_zero_is_center_pixel() {
        let mask = Mask::disk(9, 6, 0);
        assert_eq!(mask.count_nonzero(), 1);
        assert!(mask.passes(4, 3));
    }

    #[test]
    fn test_disk_large_radius_is_all_white() {
        let mask = Mask::disk(20, 13, 20);
        assert!(mask.is_all(WHITE));
        let mask = Mask::disk(7, 7, 4000);
        assert!(mask.is_all(WHITE));
    }

    #[test]
    fn test_disk_values_are_binary() {
        let mask = Mask::disk(40, 40, 9);
        assert!(mask.grid().as_slice().iter().all(|&v| v == WHITE || v == BLACK));
        assert_eq!(mask.orientation(), Orientation::Centered);
    }

    #[test]
    fn test_stamp_clips_outside_grid() {
        let mut mask = Mask::new(10, 10);
        mask.stamp(-3, 5, 4, Paint::White, BrushProfile::Hard);
        assert!(mask.passes(0, 5));
        assert!(!mask.passes(2, 5));

        let mut far = Mask::new(10, 10);
        far.stamp(1_000, -1_000, 5, Paint::White, BrushProfile::Hard);
        far.stamp(i64::MIN, i64::MAX, u32::MAX, Paint::Black, BrushProfile::Hard);
        assert!(far.is_all(BLACK));
    }

    #[test]
    fn test_stamp_saturates() {
        let mut mask = Mask::new(8, 8);
        mask.stamp(4, 4, 2, Paint::Black, BrushProfile::Hard);
        assert!(mask.is_all(BLACK));
        mask.stamp(4, 4, 2, Paint::White, BrushProfile::Hard);
        mask.stamp(4, 4, 2, Paint::White, BrushProfile::Hard);
        assert_eq!(mask.grid().get(4, 4), Some(WHITE));
    }

    #[test]
    fn test_soft_brush_falls_off() {
        let mut mask = Mask::new(41, 41);
        let soft = BrushProfile::Soft { sigma: 4.0 };
        mask.stamp(20, 20, 15, Paint::White, soft);
        let center = mask.grid().get(20, 20).unwrap();
        let near = mask.grid().get(24, 20).unwrap();
        let far = mask.grid().get(32, 20).unwrap();
        assert_eq!(center, WHITE);
        assert!(near < center && far < near);
        // Outside the disk nothing is touched
        assert_eq!(mask.grid().get(20, 36), Some(BLACK));

        // Repeated soft stamps build up and stay clamped
        for _ in 0..10 {
            mask.stamp(20, 20, 15, Paint::White, soft);
        }
        assert_eq!(mask.grid().get(24, 20), Some(WHITE));
        for _ in 0..20 {
            mask.stamp(20, 20, 15, Paint::Black, soft);
        }
        assert_eq!(mask.grid().get(20, 20), Some(BLACK));
    }

    #[test]
    fn test_fill_and_orientation() {
        let mut mask = Mask::new(5, 3);
        mask.fill(Paint::White);
        assert!(mask.is_all(WHITE));
        let corner = mask.to_orientation(Orientation::CornerOrigin);
        assert_eq!(corner.orientation(), Orientation::CornerOrigin);
        assert_eq!(corner.to_orientation(Orientation::Centered), mask);
    }

    #[test]
    fn test_sweep_schedule() {
        let schedule = SweepSchedule {
            start: 0,
            step: 5,
            end: 21,
        };
        assert_eq!(schedule.radii().collect::<Vec<_>>(), vec![0, 5, 10, 15, 20]);
        assert_eq!(schedule.len(), 5);
        assert_eq!(SweepSchedule::default().len(), 800);

        let stuck = SweepSchedule {
            step: 0,
            ..SweepSchedule::default()
        };
        assert!(matches!(stuck.validate(), Err(OpsError::InvalidParameter(_))));
    }
}
