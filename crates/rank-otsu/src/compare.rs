use rank_otsu_core::{
    binarize, binarize_map, foreground_fraction, threshold_otsu, ConvertError, Footprint,
    FootprintError, GrayImage, GrayImageView, ImageError, ThresholdError,
};
use rank_otsu_filters::RankError;
use rank_otsu_plot::{Colormap, Figure, FigureConfig, Norm, Orientation, PlotError};
use serde::{Deserialize, Serialize};

use crate::io::ConfigIoError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the comparison pipeline and its I/O helpers.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Footprint(#[from] FootprintError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Config(#[from] ConfigIoError),

    #[error("failed to read image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Local (disk neighbourhood) and global Otsu thresholds of one image.
#[derive(Clone, Debug)]
pub struct LocalOtsuComparison {
    pub original: GrayImage,
    pub radius: u32,
    /// Active pixels of `disk(radius)`.
    pub footprint_area: usize,
    /// Per-pixel threshold, same shape as `original`.
    pub local_threshold: GrayImage,
    pub global_threshold: u8,
    /// `original >= local_threshold`.
    pub local_binary: GrayImage,
    /// `original >= global_threshold`.
    pub global_binary: GrayImage,
}

/// Scalar summary of a comparison, suitable for reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub width: usize,
    pub height: usize,
    pub radius: u32,
    pub footprint_area: usize,
    pub global_threshold: u8,
    pub local_threshold_min: u8,
    pub local_threshold_max: u8,
    pub local_foreground_fraction: f64,
    pub global_foreground_fraction: f64,
}

impl LocalOtsuComparison {
    /// Threshold `img` locally over `disk(radius)` and globally.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(img), fields(width = img.width, height = img.height))
    )]
    pub fn compute(img: &GrayImageView<'_>, radius: u32) -> Result<Self, CompareError> {
        let footprint = Footprint::disk(radius)?;
        let local_threshold = rank_otsu_filters::otsu(img, &footprint)?;
        let global_threshold = threshold_otsu(img)?;
        let local_binary = binarize_map(img, &local_threshold.view())?;
        let global_binary = binarize(img, global_threshold);

        log::info!(
            "radius {} ({} px footprint): global threshold {}, local foreground {:.3}, global foreground {:.3}",
            radius,
            footprint.area(),
            global_threshold,
            foreground_fraction(&local_binary.view()),
            foreground_fraction(&global_binary.view()),
        );

        Ok(Self {
            original: GrayImage {
                width: img.width,
                height: img.height,
                data: img.data.to_vec(),
            },
            radius,
            footprint_area: footprint.area(),
            local_threshold,
            global_threshold,
            local_binary,
            global_binary,
        })
    }

    pub fn local_title(&self) -> String {
        format!("Local Otsu (radius={})", self.radius)
    }

    pub fn global_title(&self) -> String {
        format!("Global Otsu (threshold = {})", self.global_threshold)
    }

    /// Four-panel figure: original, local threshold map (both with
    /// horizontal colour bars), local binarization, global binarization.
    pub fn figure(&self, config: &FigureConfig) -> Result<Figure, PlotError> {
        let binary = Norm::new(0.0, 255.0);
        let mut fig = Figure::subplots(2, 2, config.clone())?;
        fig.tight_layout();

        fig.axes_mut(0)?
            .imshow(self.original.clone(), Colormap::Gray)
            .set_title("Original")
            .axis_off();
        fig.colorbar(0, Orientation::Horizontal)?;

        fig.axes_mut(1)?
            .imshow(self.local_threshold.clone(), Colormap::Gray)
            .set_title(self.local_title())
            .axis_off();
        fig.colorbar(1, Orientation::Horizontal)?;

        fig.axes_mut(2)?
            .imshow(self.local_binary.clone(), Colormap::Gray)
            .with_norm(binary)
            .set_title("Original >= Local Otsu")
            .axis_off();

        fig.axes_mut(3)?
            .imshow(self.global_binary.clone(), Colormap::Gray)
            .with_norm(binary)
            .set_title(self.global_title())
            .axis_off();

        Ok(fig)
    }

    pub fn summary(&self) -> ComparisonSummary {
        let (lo, hi) = self.local_threshold.min_max().unwrap_or((0, 0));
        ComparisonSummary {
            width: self.original.width,
            height: self.original.height,
            radius: self.radius,
            footprint_area: self.footprint_area,
            global_threshold: self.global_threshold,
            local_threshold_min: lo,
            local_threshold_max: hi,
            local_foreground_fraction: foreground_fraction(&self.local_binary.view()),
            global_foreground_fraction: foreground_fraction(&self.global_binary.view()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use rank_otsu_core::FOREGROUND;

    fn strip_fraction(img: &GrayImage, x0: usize, x1: usize, pred: impl Fn(usize) -> bool) -> f64 {
        let idx: Vec<usize> = (0..img.height)
            .flat_map(|y| (x0..x1).map(move |x| y * img.width + x))
            .filter(|&i| pred(i))
            .collect();
        let on = idx.iter().filter(|&&i| img.data[i] == FOREGROUND).count();
        on as f64 / idx.len() as f64
    }

    #[test]
    fn shapes_match_the_source() {
        let img = data::page();
        let cmp = LocalOtsuComparison::compute(&img.view(), 15).expect("compare");
        for out in [&cmp.local_threshold, &cmp.local_binary, &cmp.global_binary] {
            assert_eq!((out.width, out.height), (img.width, img.height));
        }
        assert_eq!(cmp.original, img);
    }

    #[test]
    fn global_threshold_loses_the_shaded_side() {
        let page = data::page_with_ink();
        let cmp = LocalOtsuComparison::compute(&page.image.view(), 15).expect("compare");
        let left = page.image.width / 5;

        let global_left = strip_fraction(&cmp.global_binary, 0, left, |_| true);
        assert!(global_left < 0.05, "global foreground on dark side: {global_left}");

        let local_left = strip_fraction(&cmp.local_binary, 0, left, |_| true);
        assert!(local_left > 0.3, "local foreground on dark side: {local_left}");

        // Most ink on the dark side stays below its local threshold.
        let ink = &page.ink.data;
        let ink_kept_as_foreground = strip_fraction(&cmp.local_binary, 0, left, |i| ink[i] != 0);
        assert!(
            ink_kept_as_foreground < 0.5,
            "ink classified as paper: {ink_kept_as_foreground}"
        );
    }

    #[test]
    fn titles_carry_parameters() {
        let img = data::page();
        let cmp = LocalOtsuComparison::compute(&img.view(), 7).expect("compare");
        assert_eq!(cmp.local_title(), "Local Otsu (radius=7)");
        assert_eq!(
            cmp.global_title(),
            format!("Global Otsu (threshold = {})", cmp.global_threshold)
        );
    }

    #[test]
    fn figure_has_four_labelled_panels() {
        let img = data::page();
        let cmp = LocalOtsuComparison::compute(&img.view(), 15).expect("compare");
        let fig = cmp.figure(&FigureConfig::default()).expect("figure");
        assert_eq!(fig.len(), 4);
        let titles: Vec<&str> = (0..4)
            .map(|i| fig.axes(i).expect("axes").title().expect("title"))
            .collect();
        assert_eq!(titles[0], "Original");
        assert_eq!(titles[1], "Local Otsu (radius=15)");
        assert_eq!(titles[2], "Original >= Local Otsu");
        assert!(titles[3].starts_with("Global Otsu (threshold = "));
        for i in 0..4 {
            let axes = fig.axes(i).expect("axes");
            assert!(!axes.axis_visible());
            assert_eq!(axes.colorbar().is_some(), i < 2);
        }
        let canvas = fig.render().expect("render");
        assert_eq!(canvas.dimensions(), (800, 500));
    }

    #[test]
    fn summary_reflects_results() {
        let img = data::page();
        let cmp = LocalOtsuComparison::compute(&img.view(), 15).expect("compare");
        let s = cmp.summary();
        assert_eq!(s.radius, 15);
        assert_eq!(s.footprint_area, Footprint::disk(15).expect("disk").area());
        assert_eq!(s.global_threshold, cmp.global_threshold);
        assert!(s.local_threshold_min <= s.local_threshold_max);
        assert!((0.0..=1.0).contains(&s.local_foreground_fraction));
    }

    #[test]
    fn oversized_radius_is_an_error() {
        let img = data::page();
        let err = LocalOtsuComparison::compute(&img.view(), u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            CompareError::Footprint(FootprintError::RadiusTooLarge { .. })
        ));
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = GrayImage::new(0, 0);
        let err = LocalOtsuComparison::compute(&img.view(), 3).unwrap_err();
        assert!(matches!(err, CompareError::Threshold(ThresholdError::EmptyImage)));
    }
}
