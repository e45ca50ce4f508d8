//! Rank-order filters over arbitrary structuring elements.
//!
//! Every filter maintains a 256-bin histogram of the pixels under the
//! footprint and reduces it to one output value per pixel. The local Otsu
//! threshold is the filter this workspace is built around:
//!
//! ```
//! use rank_otsu_core::{binarize_map, Footprint, GrayImage};
//! use rank_otsu_filters::otsu;
//!
//! let img = GrayImage::from_raw(4, 1, vec![10, 12, 200, 210]).unwrap();
//! let local = otsu(&img.view(), &Footprint::disk(2).unwrap()).unwrap();
//! let mask = binarize_map(&img.view(), &local.view()).unwrap();
//! assert_eq!((mask.width, mask.height), (img.width, img.height));
//! ```
//!
//! Only 8-bit images are supported; convert wider data with the
//! `rank_otsu_core::ubyte_from_*` helpers first.

mod window;

use rank_otsu_core::{Footprint, GrayImage, GrayImageView, Histogram, ImageError, FOREGROUND};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by the rank filters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("mask shape {mask_w}x{mask_h} does not match image {width}x{height}")]
    MaskShape {
        width: usize,
        height: usize,
        mask_w: usize,
        mask_h: usize,
    },
}

/// Reduction applied to the neighbourhood histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOp {
    /// Local Otsu threshold.
    Otsu,
    /// Mean, rounded down.
    Mean,
    /// Upper median (`rank = population / 2`).
    Median,
    Minimum,
    Maximum,
    /// `FOREGROUND` where the centre pixel exceeds the local mean.
    Threshold,
}

impl RankOp {
    /// Reduce a neighbourhood. An empty neighbourhood (fully masked) yields `0`.
    #[inline]
    pub fn reduce(self, hist: &Histogram, center: u8) -> u8 {
        if hist.is_empty() {
            return 0;
        }
        match self {
            RankOp::Otsu => hist.otsu_threshold(),
            RankOp::Mean => hist.mean().map_or(0, |m| m.floor() as u8),
            RankOp::Median => hist.rank_value(hist.population() / 2).unwrap_or(0),
            RankOp::Minimum => hist.min_value().unwrap_or(0),
            RankOp::Maximum => hist.max_value().unwrap_or(0),
            RankOp::Threshold => match hist.mean() {
                Some(m) if center as f64 > m => FOREGROUND,
                _ => 0,
            },
        }
    }
}

/// Run `op` over `footprint` at every pixel.
///
/// With `mask`, only source pixels where the mask is non-zero enter the
/// neighbourhood histograms; every output pixel is still computed.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, footprint, mask),
        fields(width = img.width, height = img.height, footprint = footprint.width())
    )
)]
pub fn rank_filter(
    img: &GrayImageView<'_>,
    footprint: &Footprint,
    op: RankOp,
    mask: Option<&GrayImageView<'_>>,
) -> Result<GrayImage, RankError> {
    GrayImageView::new(img.width, img.height, img.data)?;
    if let Some(mask) = mask {
        GrayImageView::new(mask.width, mask.height, mask.data)?;
        if mask.width != img.width || mask.height != img.height {
            return Err(RankError::MaskShape {
                width: img.width,
                height: img.height,
                mask_w: mask.width,
                mask_h: mask.height,
            });
        }
    }

    log::debug!(
        "rank filter {:?} on {}x{} with {}x{} footprint ({} px)",
        op,
        img.width,
        img.height,
        footprint.width(),
        footprint.height(),
        footprint.area()
    );
    let mut out = GrayImage::new(img.width, img.height);
    window::apply(*img, mask.copied(), footprint, &mut out.data, |h, c| {
        op.reduce(h, c)
    });
    Ok(out)
}

/// Local Otsu threshold map: one threshold per pixel, computed from the
/// neighbourhood covered by `footprint`.
pub fn otsu(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Otsu, None)
}

pub fn mean(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Mean, None)
}

pub fn median(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Median, None)
}

pub fn minimum(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Minimum, None)
}

pub fn maximum(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Maximum, None)
}

/// Binary local-mean threshold (`FOREGROUND` where pixel > local mean).
pub fn threshold(img: &GrayImageView<'_>, footprint: &Footprint) -> Result<GrayImage, RankError> {
    rank_filter(img, footprint, RankOp::Threshold, None)
}
