//! Quadrant shift between centered and corner-origin spectra.
//!
//! A forward DFT places the zero frequency (DC) at index `[0, 0]`
//! ([`Orientation::CornerOrigin`]). Masks are easier to author with DC at the
//! geometric center ([`Orientation::Centered`]), where a disk around the
//! center selects a frequency band. This module converts between the two.
//!
//! # Algorithm
//!
//! With `cx = width / 2` and `cy = height / 2` (rounded down), the grid is
//! split into four blocks and reassembled diagonally:
//!
//! ```text
//!   source (split at cx, cy)        to_corner_origin
//!   +------+---------+              +---------+------+
//!   |  TL  |   TR    |              |   BR    |  BL  |
//!   +------+---------+      =>      +---------+------+
//!   |  BL  |   BR    |              |   TR    |  TL  |
//!   +------+---------+              +---------+------+
//! ```
//!
//! [`to_centered`] uses the same assembly with the split at
//! `(width - cx, height - cy)`. For even sizes both splits coincide and the
//! operation is its own inverse; for odd sizes the blocks are unequal and
//! only the paired split points make the two directions exact inverses.
//! Neither direction crops or duplicates a row or column, so the highest
//! frequency bin of an odd-sized spectrum survives the round trip.
//!
//! The shift is generic over the sample type, so masks (`u8`), real planes
//! (`f32`) and complex spectra (both planes at once) share one code path.

use crate::Grid;

/// Location of the zero-frequency sample in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// DC at `(width / 2, height / 2)`. Masks are authored this way.
    #[default]
    Centered,
    /// DC at `[0, 0]`, as produced by the forward transform.
    CornerOrigin,
}

/// Moves DC from the center to `[0, 0]`.
pub fn to_corner_origin<T: Copy>(grid: &Grid<T>) -> Grid<T> {
    let (w, h) = grid.dims();
    assemble(grid, w / 2, h / 2)
}

/// Moves DC from `[0, 0]` to the center. Exact inverse of [`to_corner_origin`].
pub fn to_centered<T: Copy>(grid: &Grid<T>) -> Grid<T> {
    let (w, h) = grid.dims();
    assemble(grid, w - w / 2, h - h / 2)
}

/// Converts `grid` from orientation `from` to orientation `to`.
///
/// Returns an unchanged copy when the orientations already agree.
pub fn reorient<T: Copy>(grid: &Grid<T>, from: Orientation, to: Orientation) -> Grid<T> {
    match (from, to) {
        (Orientation::Centered, Orientation::CornerOrigin) => to_corner_origin(grid),
        (Orientation::CornerOrigin, Orientation::Centered) => to_centered(grid),
        _ => grid.clone(),
    }
}

/// Builds `[BR | BL]` over `[TR | TL]` for a split at `(sx, sy)`.
///
/// Row by row this is: take source rows `sy..h` then `0..sy`, and within
/// each row columns `sx..w` then `0..sx`.
fn assemble<T: Copy>(grid: &Grid<T>, sx: usize, sy: usize) -> Grid<T> {
    let (w, h) = grid.dims();
    let mut out = Vec::with_capacity(grid.len());
    for src_y in (sy..h).chain(0..sy) {
        let row = grid.row(src_y);
        out.extend_from_slice(&row[sx..]);
        out.extend_from_slice(&row[..sx]);
    }
    debug_assert_eq!(out.len(), grid.len(), "quadrant shift changed element count");
    Grid::from_parts(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SIZES: &[(usize, usize)] = &[
        (1, 1),
        (2, 2),
        (4, 4),
        (8, 6),
        (3, 3),
        (5, 7),
        (4, 5),
        (7, 4),
        (1, 9),
        (9, 1),
        (16, 15),
        (33, 32),
    ];

    fn random_grid(rng: &mut StdRng, w: usize, h: usize) -> Grid<u8> {
        Grid::from_fn(w, h, |_, _| rng.gen_range(0..=u8::MAX))
    }

    fn sorted(grid: &Grid<u8>) -> Vec<u8> {
        let mut v = grid.as_slice().to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_even_shift_is_diagonal_swap() {
        // 4x4: quadrants of 2x2
        let grid = Grid::from_fn(4, 4, |x, y| (y * 4 + x) as u8);
        let shifted = to_corner_origin(&grid);
        #[rustfmt::skip]
        let expected = [
            10, 11,  8,  9,
            14, 15, 12, 13,
             2,  3,  0,  1,
             6,  7,  4,  5,
        ];
        assert_eq!(shifted.as_slice(), &expected);
        // Even sizes: both directions agree
        assert_eq!(to_centered(&grid), shifted);
    }

    #[test]
    fn test_odd_shift_assembly_order() {
        // 3x3, cx = cy = 1: BR is 2x2, BL 2x1, TR 1x2, TL 1x1
        let grid = Grid::from_fn(3, 3, |x, y| (y * 3 + x) as u8);
        let corner = to_corner_origin(&grid);
        assert_eq!(corner.as_slice(), &[4, 5, 3, 7, 8, 6, 1, 2, 0]);
        let centered = to_centered(&grid);
        assert_eq!(centered.as_slice(), &[8, 6, 7, 2, 0, 1, 5, 3, 4]);
    }

    #[test]
    fn test_dc_moves_to_corner() {
        for &(w, h) in SIZES {
            let mut grid: Grid<u8> = Grid::new(w, h);
            grid.set(w / 2, h / 2, 1).unwrap();
            let corner = to_corner_origin(&grid);
            assert_eq!(corner.get(0, 0), Some(1), "{}x{}", w, h);
            assert_eq!(to_centered(&corner), grid, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_shift_involution_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for &(w, h) in SIZES {
            for _ in 0..4 {
                let grid = random_grid(&mut rng, w, h);
                assert_eq!(to_centered(&to_corner_origin(&grid)), grid, "{}x{}", w, h);
                assert_eq!(to_corner_origin(&to_centered(&grid)), grid, "{}x{}", w, h);
            }
        }
    }

    #[test]
    fn test_shift_involution_constant() {
        for &(w, h) in SIZES {
            for value in [0u8, u8::MAX] {
                let grid = Grid::filled(w, h, value);
                assert_eq!(to_centered(&to_corner_origin(&grid)), grid);
                assert_eq!(to_corner_origin(&grid), grid);
            }
        }
    }

    #[test]
    fn test_shift_conserves_elements() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(w, h) in SIZES {
            let grid = random_grid(&mut rng, w, h);
            for shifted in [to_corner_origin(&grid), to_centered(&grid)] {
                assert_eq!(shifted.dims(), grid.dims());
                assert_eq!(shifted.len(), grid.len());
                assert_eq!(sorted(&shifted), sorted(&grid));
            }
        }
    }

    #[test]
    fn test_shift_complex_planes_independently() {
        // Shifting (re, im) pairs equals shifting each plane on its own
        let grid = Grid::from_fn(5, 4, |x, y| (x as f32, -(y as f32)));
        let shifted = to_corner_origin(&grid);
        let re = to_corner_origin(&grid.map(|(r, _)| r));
        let im = to_corner_origin(&grid.map(|(_, i)| i));
        assert_eq!(shifted.map(|(r, _)| r), re);
        assert_eq!(shifted.map(|(_, i)| i), im);
    }

    #[test]
    fn test_reorient_dispatch() {
        let grid = Grid::from_fn(5, 3, |x, y| (y * 5 + x) as u8);
        use Orientation::*;
        assert_eq!(reorient(&grid, Centered, Centered), grid);
        assert_eq!(reorient(&grid, CornerOrigin, CornerOrigin), grid);
        assert_eq!(reorient(&grid, Centered, CornerOrigin), to_corner_origin(&grid));
        assert_eq!(reorient(&grid, CornerOrigin, Centered), to_centered(&grid));
    }

    #[test]
    fn test_shift_empty_grid() {
        let grid: Grid<u8> = Grid::new(0, 3);
        assert_eq!(to_corner_origin(&grid).dims(), (0, 3));
        let grid: Grid<u8> = Grid::new(3, 0);
        assert_eq!(to_centered(&grid).dims(), (3, 0));
    }
}
