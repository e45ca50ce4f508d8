//! Grid figures of image panels.
//!
//! A [`Figure`] is a `rows x cols` grid of [`Axes`]. Each axes may hold one
//! grayscale image (drawn through a [`Colormap`] and [`Norm`]), a title, an
//! axis frame and a colour bar. Rendering produces an RGB canvas of
//! `figsize * dpi` pixels; images keep their aspect ratio and are scaled
//! with nearest-neighbour sampling.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rank_otsu_core::GrayImage;
use serde::{Deserialize, Serialize};

use crate::colormap::{Colormap, Norm};
use crate::font;

#[cfg(feature = "tracing")]
use tracing::instrument;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Largest canvas side, and largest dpi, a figure accepts.
pub const MAX_CANVAS_PX: f32 = 32768.0;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("figure grid must be non-empty (rows={rows}, cols={cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("invalid figure size {width_in}x{height_in} in at {dpi} dpi")]
    InvalidSize {
        width_in: f32,
        height_in: f32,
        dpi: f32,
    },
    #[error("font size {font_size} pt does not fit the figure")]
    InvalidFontSize { font_size: f32 },
    #[error("axes index {index} out of range (figure has {len} axes)")]
    AxesOutOfRange { index: usize, len: usize },
    #[error("axes {index} has no image to attach a colour bar to")]
    NoImage { index: usize },
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

fn default_width_in() -> f32 {
    8.0
}

fn default_height_in() -> f32 {
    5.0
}

fn default_dpi() -> f32 {
    100.0
}

fn default_font_size() -> f32 {
    9.0
}

fn default_share_axes() -> bool {
    true
}

/// Figure-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Figure width in inches.
    #[serde(default = "default_width_in")]
    pub width_in: f32,
    /// Figure height in inches.
    #[serde(default = "default_height_in")]
    pub height_in: f32,
    /// Pixels per inch of the rendered canvas.
    #[serde(default = "default_dpi")]
    pub dpi: f32,
    /// Text size in points; titles and tick labels scale with it.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Draw every image panel at the same scale.
    #[serde(default = "default_share_axes")]
    pub share_axes: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            font_size: default_font_size(),
            share_axes: default_share_axes(),
        }
    }
}

impl FigureConfig {
    /// Canvas size in pixels.
    ///
    /// Also checks that the settings can be laid out: each side is at most
    /// [`MAX_CANVAS_PX`], and a line of text must fit the canvas height.
    pub fn pixel_size(&self) -> Result<(u32, u32), PlotError> {
        let w = self.width_in * self.dpi;
        let h = self.height_in * self.dpi;
        let in_range = |v: f32| v.is_finite() && (1.0..=MAX_CANVAS_PX).contains(&v);
        if !(in_range(w) && in_range(h) && in_range(self.dpi)) {
            return Err(PlotError::InvalidSize {
                width_in: self.width_in,
                height_in: self.height_in,
                dpi: self.dpi,
            });
        }
        let (w, h) = (w.round() as u32, h.round() as u32);
        let font_ok = self.font_size.is_finite() && self.font_size > 0.0;
        if !font_ok || font::text_height(self.text_scale()) > h {
            return Err(PlotError::InvalidFontSize {
                font_size: self.font_size,
            });
        }
        Ok((w, h))
    }

    /// Integer scale of the bitmap font.
    pub fn text_scale(&self) -> u32 {
        font::scale_for(self.font_size, self.dpi)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One panel of a figure.
#[derive(Clone, Debug)]
pub struct Axes {
    image: Option<GrayImage>,
    colormap: Colormap,
    norm: Option<Norm>,
    title: Option<String>,
    axis_visible: bool,
    colorbar: Option<Orientation>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            image: None,
            colormap: Colormap::Gray,
            norm: None,
            title: None,
            axis_visible: true,
            colorbar: None,
        }
    }
}

impl Axes {
    /// Show `image` through `colormap`, autoscaled to its data range unless a
    /// norm is set.
    pub fn imshow(&mut self, image: GrayImage, colormap: Colormap) -> &mut Self {
        self.image = Some(image);
        self.colormap = colormap;
        self
    }

    /// Fix the intensity range instead of autoscaling.
    pub fn with_norm(&mut self, norm: Norm) -> &mut Self {
        self.norm = Some(norm);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Hide the frame around the image.
    pub fn axis_off(&mut self) -> &mut Self {
        self.axis_visible = false;
        self
    }

    pub fn axis_on(&mut self) -> &mut Self {
        self.axis_visible = true;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn image(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    pub fn colorbar(&self) -> Option<Orientation> {
        self.colorbar
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_visible
    }

    /// Effective intensity range.
    pub fn norm(&self) -> Norm {
        match (self.norm, &self.image) {
            (Some(n), _) => n,
            (None, Some(img)) => Norm::autoscale(&img.view()),
            (None, None) => Norm::new(0.0, 1.0),
        }
    }
}

/// Pixel rectangle on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// Where one axes lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    pub cell: Rect,
    /// Image area; `None` for axes without an image.
    pub image: Option<Rect>,
    pub title_origin: Option<(i64, i64)>,
    pub colorbar: Option<Rect>,
}

/// Sizes derived from the config, shared by every panel.
struct Metrics {
    pad: u32,
    gap: u32,
    text_scale: u32,
    text_h: u32,
    bar: u32,
    tick: u32,
}

impl Metrics {
    fn new(config: &FigureConfig, tight: bool) -> Self {
        let text_scale = config.text_scale();
        let pad = if tight {
            (config.dpi * 0.04).round().max(2.0)
        } else {
            (config.dpi * 0.15).round()
        };
        Self {
            pad: pad as u32,
            gap: 2 * text_scale,
            text_scale,
            text_h: font::text_height(text_scale),
            bar: (config.dpi * 0.08).round().max(4.0) as u32,
            tick: 2 * text_scale,
        }
    }

    fn title_band(&self, axes: &Axes) -> u32 {
        if axes.title.is_some() {
            self.text_h + self.gap
        } else {
            0
        }
    }

    fn horizontal_band(&self, axes: &Axes) -> u32 {
        match axes.colorbar {
            Some(Orientation::Horizontal) => self.gap + self.bar + self.tick + self.text_h,
            _ => 0,
        }
    }

    fn vertical_band(&self, axes: &Axes) -> u32 {
        match axes.colorbar {
            Some(Orientation::Vertical) => {
                let labels = tick_values(axes.norm())
                    .iter()
                    .map(|&v| font::text_width(&format_tick(v), self.text_scale))
                    .max()
                    .unwrap_or(0);
                self.gap + self.bar + self.tick + labels
            }
            _ => 0,
        }
    }
}

/// A grid of axes rendered to a single image.
#[derive(Clone, Debug)]
pub struct Figure {
    config: FigureConfig,
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
    tight: bool,
}

impl Figure {
    /// Create a `rows x cols` grid of empty axes, row-major.
    pub fn subplots(rows: usize, cols: usize, config: FigureConfig) -> Result<Self, PlotError> {
        if rows == 0 || cols == 0 {
            return Err(PlotError::EmptyGrid { rows, cols });
        }
        config.pixel_size()?;
        Ok(Self {
            config,
            rows,
            cols,
            axes: vec![Axes::default(); rows * cols],
            tight: false,
        })
    }

    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axes(&self, index: usize) -> Result<&Axes, PlotError> {
        let len = self.axes.len();
        self.axes
            .get(index)
            .ok_or(PlotError::AxesOutOfRange { index, len })
    }

    pub fn axes_mut(&mut self, index: usize) -> Result<&mut Axes, PlotError> {
        let len = self.axes.len();
        self.axes
            .get_mut(index)
            .ok_or(PlotError::AxesOutOfRange { index, len })
    }

    /// Attach a colour bar for the image shown in axes `index`.
    pub fn colorbar(&mut self, index: usize, orientation: Orientation) -> Result<(), PlotError> {
        let axes = self.axes_mut(index)?;
        if axes.image.is_none() {
            return Err(PlotError::NoImage { index });
        }
        axes.colorbar = Some(orientation);
        Ok(())
    }

    /// Shrink the outer padding of every cell.
    pub fn tight_layout(&mut self) {
        self.tight = true;
    }

    /// Compute where every axes is drawn.
    pub fn layout(&self) -> Result<Vec<PanelLayout>, PlotError> {
        let (fig_w, fig_h) = self.config.pixel_size()?;
        let m = Metrics::new(&self.config, self.tight);
        let cell_w = fig_w / self.cols as u32;
        let cell_h = fig_h / self.rows as u32;

        // Largest scale each image can take inside its cell.
        let fits: Vec<Option<f32>> = self
            .axes
            .iter()
            .map(|axes| {
                let img = axes.image.as_ref()?;
                if img.width == 0 || img.height == 0 {
                    return None;
                }
                let avail_w = cell_w.saturating_sub(2 * m.pad + m.vertical_band(axes));
                let avail_h = cell_h
                    .saturating_sub(2 * m.pad + m.title_band(axes) + m.horizontal_band(axes));
                Some(
                    (avail_w as f32 / img.width as f32)
                        .min(avail_h as f32 / img.height as f32)
                        .max(0.0),
                )
            })
            .collect();
        let shared = fits.iter().flatten().copied().reduce(f32::min);

        let mut out = Vec::with_capacity(self.axes.len());
        for (index, axes) in self.axes.iter().enumerate() {
            let cell = Rect {
                x: (index % self.cols) as u32 * cell_w,
                y: (index / self.cols) as u32 * cell_h,
                w: cell_w,
                h: cell_h,
            };
            let scale = match (self.config.share_axes, shared, fits[index]) {
                (true, Some(s), Some(_)) => Some(s),
                (_, _, fit) => fit,
            };
            let title_band = m.title_band(axes);

            let draw = match (scale, axes.image.as_ref()) {
                (Some(s), Some(img)) => Some((
                    ((img.width as f32 * s).floor() as u32).max(1),
                    ((img.height as f32 * s).floor() as u32).max(1),
                )),
                _ => None,
            };
            let (draw_w, draw_h) = draw.unwrap_or((0, 0));

            let block_w = draw_w + m.vertical_band(axes);
            let block_h = title_band + draw_h + m.horizontal_band(axes);
            let x0 = cell.x + cell.w.saturating_sub(block_w) / 2;
            let y0 = cell.y + cell.h.saturating_sub(block_h) / 2;

            let image = draw.map(|(w, h)| Rect {
                x: x0,
                y: y0 + title_band,
                w,
                h,
            });

            let title_origin = axes.title.as_deref().map(|title| {
                let tw = font::text_width(title, m.text_scale) as i64;
                let center = match image {
                    Some(r) => r.x as i64 + r.w as i64 / 2,
                    None => cell.x as i64 + cell.w as i64 / 2,
                };
                let ty = if image.is_some() {
                    y0 as i64
                } else {
                    (cell.y + m.pad) as i64
                };
                (center - tw / 2, ty)
            });

            let colorbar = match (axes.colorbar, image) {
                (Some(Orientation::Horizontal), Some(r)) => Some(Rect {
                    x: r.x,
                    y: r.bottom() + m.gap,
                    w: r.w,
                    h: m.bar,
                }),
                (Some(Orientation::Vertical), Some(r)) => Some(Rect {
                    x: r.right() + m.gap,
                    y: r.y,
                    w: m.bar,
                    h: r.h,
                }),
                _ => None,
            };

            out.push(PanelLayout {
                cell,
                image,
                title_origin,
                colorbar,
            });
        }
        Ok(out)
    }

    /// Render the figure onto a white canvas.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(rows = self.rows, cols = self.cols))
    )]
    pub fn render(&self) -> Result<RgbImage, PlotError> {
        let (fig_w, fig_h) = self.config.pixel_size()?;
        let m = Metrics::new(&self.config, self.tight);
        let layout = self.layout()?;
        let mut canvas = RgbImage::from_pixel(fig_w, fig_h, Rgb([255, 255, 255]));

        for (axes, panel) in self.axes.iter().zip(&layout) {
            if let (Some(img), Some(rect)) = (axes.image.as_ref(), panel.image) {
                let colored = colorize(img, axes.colormap, axes.norm());
                let scaled = imageops::resize(&colored, rect.w, rect.h, FilterType::Nearest);
                imageops::overlay(&mut canvas, &scaled, rect.x as i64, rect.y as i64);
                if axes.axis_visible {
                    draw_frame(&mut canvas, rect);
                }
            }
            if let (Some(title), Some((tx, ty))) = (axes.title.as_deref(), panel.title_origin) {
                font::draw_text(&mut canvas, tx, ty, title, m.text_scale, BLACK);
            }
            if let (Some(orientation), Some(bar)) = (axes.colorbar, panel.colorbar) {
                draw_colorbar(&mut canvas, bar, orientation, axes.colormap, axes.norm(), &m);
            }
        }

        log::debug!(
            "rendered {}x{} figure with {} axes",
            fig_w,
            fig_h,
            self.axes.len()
        );
        Ok(canvas)
    }

    /// Render and write the figure; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PlotError> {
        let canvas = self.render()?;
        canvas.save(path.as_ref())?;
        log::info!("wrote figure to {}", path.as_ref().display());
        Ok(())
    }
}

fn colorize(img: &GrayImage, cmap: Colormap, norm: Norm) -> RgbImage {
    // One lookup per gray level instead of per pixel.
    let lut: Vec<Rgb<u8>> = (0..=255u8)
        .map(|v| cmap.color(norm.apply(v as f32)))
        .collect();
    RgbImage::from_fn(img.width as u32, img.height as u32, |x, y| {
        lut[img.data[y as usize * img.width + x as usize] as usize]
    })
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// One-pixel outline just outside `r`.
fn draw_frame(canvas: &mut RgbImage, r: Rect) {
    let (x0, y0) = (r.x as i64 - 1, r.y as i64 - 1);
    let (x1, y1) = (r.right() as i64, r.bottom() as i64);
    for x in x0..=x1 {
        put(canvas, x, y0, BLACK);
        put(canvas, x, y1, BLACK);
    }
    for y in y0..=y1 {
        put(canvas, x0, y, BLACK);
        put(canvas, x1, y, BLACK);
    }
}

fn tick_values(norm: Norm) -> [f32; 3] {
    [norm.vmin, 0.5 * (norm.vmin + norm.vmax), norm.vmax]
}

pub(crate) fn format_tick(v: f32) -> String {
    if (v - v.round()).abs() < 1e-3 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.1}")
    }
}

fn draw_colorbar(
    canvas: &mut RgbImage,
    bar: Rect,
    orientation: Orientation,
    cmap: Colormap,
    norm: Norm,
    m: &Metrics,
) {
    let along = match orientation {
        Orientation::Horizontal => bar.w,
        Orientation::Vertical => bar.h,
    };
    let steps = along.saturating_sub(1).max(1) as f32;

    for i in 0..along {
        let t = i as f32 / steps;
        match orientation {
            Orientation::Horizontal => {
                let c = cmap.color(t);
                for y in bar.y..bar.bottom() {
                    put(canvas, (bar.x + i) as i64, y as i64, c);
                }
            }
            Orientation::Vertical => {
                // High values at the top.
                let c = cmap.color(1.0 - t);
                for x in bar.x..bar.right() {
                    put(canvas, x as i64, (bar.y + i) as i64, c);
                }
            }
        }
    }
    draw_frame(canvas, bar);

    let labels = tick_values(norm).map(format_tick);
    for (k, label) in labels.iter().enumerate() {
        let frac = k as f32 / 2.0;
        let lw = font::text_width(label, m.text_scale) as i64;
        match orientation {
            Orientation::Horizontal => {
                let tx = bar.x as i64 + (frac * steps).round() as i64;
                let y0 = bar.bottom() as i64;
                for y in y0..y0 + m.tick as i64 / 2 {
                    put(canvas, tx, y, BLACK);
                }
                let lx = match k {
                    0 => bar.x as i64,
                    2 => bar.right() as i64 - lw,
                    _ => tx - lw / 2,
                };
                font::draw_text(canvas, lx, y0 + m.tick as i64, label, m.text_scale, BLACK);
            }
            Orientation::Vertical => {
                let ty = bar.bottom() as i64 - 1 - (frac * steps).round() as i64;
                let x0 = bar.right() as i64;
                for x in x0..x0 + m.tick as i64 / 2 {
                    put(canvas, x, ty, BLACK);
                }
                let ly = (ty - m.text_h as i64 / 2)
                    .clamp(bar.y as i64, (bar.bottom() as i64 - m.text_h as i64).max(bar.y as i64));
                font::draw_text(canvas, x0 + m.tick as i64, ly, label, m.text_scale, BLACK);
            }
        }
    }
}
