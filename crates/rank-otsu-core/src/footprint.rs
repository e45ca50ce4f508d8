//! Structuring elements ("footprints") for neighbourhood filters.
//!
//! A footprint is a binary mask anchored at `(width / 2, height / 2)`.
//! Offsets are reported relative to that anchor, so a `disk(r)` yields
//! offsets in `-r..=r` on both axes.

use serde::{Deserialize, Serialize};

/// Largest radius accepted by [`Footprint::disk`] and [`Footprint::diamond`].
pub const MAX_RADIUS: u32 = 4096;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FootprintError {
    #[error("footprint has zero size ({width}x{height})")]
    ZeroSize { width: usize, height: usize },
    #[error("footprint mask has {got} entries, expected {expected}")]
    InvalidMask { expected: usize, got: usize },
    #[error("footprint has no active pixels")]
    Empty,
    #[error("footprint radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: u32, max: u32 },
    #[error("footprint size {width}x{height} overflows")]
    TooLarge { width: usize, height: usize },
}

fn mask_len(width: usize, height: usize) -> Result<usize, FootprintError> {
    width
        .checked_mul(height)
        .ok_or(FootprintError::TooLarge { width, height })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    width: usize,
    height: usize,
    mask: Vec<bool>, // row-major
}

impl Footprint {
    /// Build a footprint from a row-major mask.
    pub fn from_mask(width: usize, height: usize, mask: Vec<bool>) -> Result<Self, FootprintError> {
        if width == 0 || height == 0 {
            return Err(FootprintError::ZeroSize { width, height });
        }
        let expected = mask_len(width, height)?;
        if mask.len() != expected {
            return Err(FootprintError::InvalidMask {
                expected,
                got: mask.len(),
            });
        }
        if !mask.iter().any(|&m| m) {
            return Err(FootprintError::Empty);
        }
        Ok(Self {
            width,
            height,
            mask,
        })
    }

    /// Square mask of side `2r + 1`, keeping the offsets `keep` accepts.
    fn symmetric(radius: u32, keep: impl Fn(i64, i64) -> bool) -> Result<Self, FootprintError> {
        if radius > MAX_RADIUS {
            return Err(FootprintError::RadiusTooLarge {
                radius,
                max: MAX_RADIUS,
            });
        }
        let r = i64::from(radius);
        let side = 2 * radius as usize + 1;
        let mut mask = Vec::with_capacity(mask_len(side, side)?);
        for y in -r..=r {
            for x in -r..=r {
                mask.push(keep(x, y));
            }
        }
        Ok(Self {
            width: side,
            height: side,
            mask,
        })
    }

    /// Disk of the given radius: `x² + y² <= r²`, side `2r + 1`.
    pub fn disk(radius: u32) -> Result<Self, FootprintError> {
        let r2 = i64::from(radius) * i64::from(radius);
        Self::symmetric(radius, |x, y| x * x + y * y <= r2)
    }

    /// Diamond of the given radius: `|x| + |y| <= r`.
    pub fn diamond(radius: u32) -> Result<Self, FootprintError> {
        let r = i64::from(radius);
        Self::symmetric(radius, |x, y| x.abs() + y.abs() <= r)
    }

    pub fn square(width: usize) -> Result<Self, FootprintError> {
        Self::rectangle(width, width)
    }

    pub fn rectangle(width: usize, height: usize) -> Result<Self, FootprintError> {
        Self::from_mask(width, height, vec![true; mask_len(width, height)?])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Anchor pixel inside the mask.
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x]
    }

    /// Number of active pixels.
    pub fn area(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Active pixels as `(dx, dy)` offsets from the anchor, row-major.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        self.offsets_where(|_, _| true)
    }

    /// Offsets that enter the window when it moves one pixel to the right:
    /// active pixels whose right-hand neighbour is inactive.
    pub fn leading_edge(&self) -> Vec<(isize, isize)> {
        self.offsets_where(|x, y| !self.contains(x + 1, y))
    }

    /// Offsets that leave the window when it moves one pixel to the right,
    /// expressed relative to the anchor *before* the move: active pixels
    /// whose left-hand neighbour is inactive.
    pub fn trailing_edge(&self) -> Vec<(isize, isize)> {
        self.offsets_where(|x, y| x == 0 || !self.contains(x - 1, y))
    }

    fn offsets_where(&self, pred: impl Fn(usize, usize) -> bool) -> Vec<(isize, isize)> {
        let (cx, cy) = self.center();
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.mask[y * self.width + x] && pred(x, y) {
                    out.push((x as isize - cx as isize, y as isize - cy as isize));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fp: &Footprint) -> Vec<String> {
        (0..fp.height())
            .map(|y| {
                (0..fp.width())
                    .map(|x| if fp.contains(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn disk_radius_two_matches_reference_mask() {
        let fp = Footprint::disk(2).expect("disk");
        assert_eq!(
            render(&fp),
            vec![
                "..#..", //
                ".###.", //
                "#####", //
                ".###.", //
                "..#..",
            ]
        );
        assert_eq!(fp.area(), 13);
        assert_eq!(fp.center(), (2, 2));
    }

    #[test]
    fn disk_zero_is_single_pixel() {
        let fp = Footprint::disk(0).expect("disk");
        assert_eq!(fp.offsets(), vec![(0, 0)]);
    }

    #[test]
    fn disk_fifteen_has_expected_side() {
        let fp = Footprint::disk(15).expect("disk");
        assert_eq!(fp.width(), 31);
        assert_eq!(fp.height(), 31);
        assert!(fp.contains(15, 0));
        assert!(!fp.contains(0, 0));
    }

    #[test]
    fn diamond_radius_one_is_a_cross() {
        let fp = Footprint::diamond(1).expect("diamond");
        assert_eq!(render(&fp), vec![".#.", "###", ".#."]);
    }

    #[test]
    fn edges_of_square_are_single_columns() {
        let fp = Footprint::square(3).expect("square");
        assert_eq!(fp.leading_edge(), vec![(1, -1), (1, 0), (1, 1)]);
        assert_eq!(fp.trailing_edge(), vec![(-1, -1), (-1, 0), (-1, 1)]);
    }

    #[test]
    fn disk_edges_cover_one_pixel_per_row() {
        let fp = Footprint::disk(3).expect("disk");
        assert_eq!(fp.leading_edge().len(), fp.height());
        assert_eq!(fp.trailing_edge().len(), fp.height());
    }

    #[test]
    fn invalid_masks_are_rejected() {
        assert_eq!(
            Footprint::from_mask(2, 2, vec![true; 3]),
            Err(FootprintError::InvalidMask {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(
            Footprint::from_mask(1, 1, vec![false]),
            Err(FootprintError::Empty)
        );
        assert!(matches!(
            Footprint::rectangle(0, 4),
            Err(FootprintError::ZeroSize { .. })
        ));
    }

    #[test]
    fn oversized_footprints_are_rejected() {
        assert_eq!(
            Footprint::disk(1u32 << 31),
            Err(FootprintError::RadiusTooLarge {
                radius: 1 << 31,
                max: MAX_RADIUS
            })
        );
        assert!(matches!(
            Footprint::diamond(u32::MAX),
            Err(FootprintError::RadiusTooLarge { .. })
        ));
        assert!(matches!(
            Footprint::rectangle(usize::MAX, 2),
            Err(FootprintError::TooLarge { .. })
        ));
        let fp = Footprint::disk(MAX_RADIUS).expect("largest disk");
        assert_eq!(fp.width(), 2 * MAX_RADIUS as usize + 1);
    }
}
