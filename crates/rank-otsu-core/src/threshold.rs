//! Global Otsu threshold and binarization helpers.

use crate::histogram::{between_class_variance, Histogram};
use crate::image::{GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Value written for pixels on the bright side of a threshold.
pub const FOREGROUND: u8 = 255;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("cannot threshold an empty image")]
    EmptyImage,
}

/// Compute the global Otsu threshold of an image.
///
/// Candidate levels run over `min..max` of the image; class one is
/// `{v <= t}`. Ties resolve to the lowest level. A single-valued image
/// returns that value.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width, height = img.height))
)]
pub fn threshold_otsu(img: &GrayImageView<'_>) -> Result<u8, ThresholdError> {
    let (min_v, max_v) = img.min_max().ok_or(ThresholdError::EmptyImage)?;
    if min_v == max_v {
        log::debug!("single-valued image, threshold = {min_v}");
        return Ok(min_v);
    }

    let hist = Histogram::from_samples(img.data);
    let bins = hist.bins();
    let pop = hist.population() as u64;
    let sum_total = hist.weighted_sum();

    let mut best_t = min_v;
    let mut best_var = f64::NEG_INFINITY;
    let mut n1 = 0u64;
    let mut s1 = 0u64;

    for t in min_v..max_v {
        let h = bins[t as usize] as u64;
        n1 += h;
        s1 += t as u64 * h;
        let var = between_class_variance(n1, s1, pop, sum_total);
        if var > best_var {
            best_var = var;
            best_t = t;
        }
    }

    log::debug!("global otsu threshold = {best_t} (between-class variance {best_var:.3})");
    Ok(best_t)
}

/// `FOREGROUND` where `v >= threshold`, `0` elsewhere.
pub fn binarize(img: &GrayImageView<'_>, threshold: u8) -> GrayImage {
    GrayImage {
        width: img.width,
        height: img.height,
        data: img
            .data
            .iter()
            .map(|&v| if v >= threshold { FOREGROUND } else { 0 })
            .collect(),
    }
}

/// Per-pixel binarization: `FOREGROUND` where `img >= map`.
pub fn binarize_map(
    img: &GrayImageView<'_>,
    map: &GrayImageView<'_>,
) -> Result<GrayImage, ImageError> {
    img.same_shape(map)?;
    Ok(GrayImage {
        width: img.width,
        height: img.height,
        data: img
            .data
            .iter()
            .zip(map.data)
            .map(|(&v, &t)| if v >= t { FOREGROUND } else { 0 })
            .collect(),
    })
}

/// Share of non-zero pixels; `0.0` for an empty image.
pub fn foreground_fraction(img: &GrayImageView<'_>) -> f64 {
    if img.data.is_empty() {
        return 0.0;
    }
    let on = img.data.iter().filter(|&&v| v != 0).count();
    on as f64 / img.data.len() as f64
}
