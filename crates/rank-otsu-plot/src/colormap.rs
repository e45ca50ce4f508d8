use image::Rgb;
use rank_otsu_core::GrayImageView;
use serde::{Deserialize, Serialize};

/// Colour map applied to normalised intensities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    #[default]
    Gray,
    /// White for low values, black for high values.
    GrayReversed,
}

impl Colormap {
    /// Colour for `t` in `[0, 1]`; out-of-range input is clamped.
    pub fn color(self, t: f32) -> Rgb<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let v = match self {
            Colormap::Gray => t,
            Colormap::GrayReversed => 1.0 - t,
        };
        let g = (v * 255.0).round() as u8;
        Rgb([g, g, g])
    }
}

/// Linear intensity normalisation `v -> (v - vmin) / (vmax - vmin)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    pub vmin: f32,
    pub vmax: f32,
}

impl Norm {
    pub fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Data range of the image; `0..1` when empty.
    pub fn autoscale(img: &GrayImageView<'_>) -> Self {
        match img.min_max() {
            Some((lo, hi)) => Self::new(lo as f32, hi as f32),
            None => Self::new(0.0, 1.0),
        }
    }

    /// Normalised value; a degenerate range maps everything to `0`.
    pub fn apply(&self, v: f32) -> f32 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((v - self.vmin) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rank_otsu_core::GrayImage;

    #[test]
    fn gray_endpoints() {
        assert_eq!(Colormap::Gray.color(0.0), Rgb([0, 0, 0]));
        assert_eq!(Colormap::Gray.color(1.0), Rgb([255, 255, 255]));
        assert_eq!(Colormap::Gray.color(2.0), Rgb([255, 255, 255]));
        assert_eq!(Colormap::GrayReversed.color(0.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn autoscale_uses_data_range() {
        let img = GrayImage::from_raw(3, 1, vec![20, 70, 120]).expect("valid");
        let norm = Norm::autoscale(&img.view());
        assert_relative_eq!(norm.apply(20.0), 0.0);
        assert_relative_eq!(norm.apply(70.0), 0.5);
        assert_relative_eq!(norm.apply(200.0), 1.0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let norm = Norm::new(5.0, 5.0);
        assert_relative_eq!(norm.apply(5.0), 0.0);
        assert_relative_eq!(norm.apply(9.0), 0.0);
    }

    #[test]
    fn colormap_names_round_trip_through_json() {
        let json = serde_json::to_string(&Colormap::GrayReversed).expect("serialize");
        assert_eq!(json, "\"gray_reversed\"");
    }
}
