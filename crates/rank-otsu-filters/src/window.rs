//! Row-wise sliding histogram over a footprint.
//!
//! Each row starts from a freshly built histogram at `x = 0`; moving right
//! removes the footprint's trailing edge and adds its leading edge. Source
//! pixels outside the image, or masked out, are never counted, so the
//! population shrinks near borders.

use rank_otsu_core::{Footprint, GrayImageView, Histogram};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

struct WindowShape {
    full: Vec<(isize, isize)>,
    leading: Vec<(isize, isize)>,
    trailing: Vec<(isize, isize)>,
}

struct Source<'a> {
    img: GrayImageView<'a>,
    mask: Option<GrayImageView<'a>>,
}

impl Source<'_> {
    #[inline]
    fn sample(&self, x: isize, y: isize) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.img.width as isize || y >= self.img.height as isize {
            return None;
        }
        let idx = y as usize * self.img.width + x as usize;
        if let Some(mask) = &self.mask {
            if mask.data[idx] == 0 {
                return None;
            }
        }
        Some(self.img.data[idx])
    }
}

fn filter_row<K>(src: &Source<'_>, shape: &WindowShape, y: usize, out: &mut [u8], kernel: &K)
where
    K: Fn(&Histogram, u8) -> u8,
{
    let y = y as isize;
    let row = src.img.row(y as usize);
    let mut hist = Histogram::new();

    for &(dx, dy) in &shape.full {
        if let Some(v) = src.sample(dx, y + dy) {
            hist.add(v);
        }
    }
    out[0] = kernel(&hist, row[0]);

    for x in 1..row.len() {
        let xi = x as isize;
        for &(dx, dy) in &shape.trailing {
            if let Some(v) = src.sample(xi - 1 + dx, y + dy) {
                hist.remove(v);
            }
        }
        for &(dx, dy) in &shape.leading {
            if let Some(v) = src.sample(xi + dx, y + dy) {
                hist.add(v);
            }
        }
        out[x] = kernel(&hist, row[x]);
    }
}

/// Apply `kernel(histogram, centre_value)` at every pixel of `img`.
///
/// `mask`, when given, must have the same shape as `img` (checked by the
/// caller). `out` must hold `img.width * img.height` values.
pub(crate) fn apply<K>(
    img: GrayImageView<'_>,
    mask: Option<GrayImageView<'_>>,
    footprint: &Footprint,
    out: &mut [u8],
    kernel: K,
) where
    K: Fn(&Histogram, u8) -> u8 + Sync,
{
    if img.width == 0 || img.height == 0 {
        return;
    }
    let shape = WindowShape {
        full: footprint.offsets(),
        leading: footprint.leading_edge(),
        trailing: footprint.trailing_edge(),
    };
    let src = Source { img, mask };

    #[cfg(feature = "rayon")]
    out.par_chunks_mut(img.width)
        .enumerate()
        .for_each(|(y, row)| filter_row(&src, &shape, y, row, &kernel));

    #[cfg(not(feature = "rayon"))]
    out.chunks_mut(img.width)
        .enumerate()
        .for_each(|(y, row)| filter_row(&src, &shape, y, row, &kernel));
}
