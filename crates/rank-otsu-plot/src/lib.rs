//! Headless figures for comparing grayscale images side by side.
//!
//! ```no_run
//! use rank_otsu_core::GrayImage;
//! use rank_otsu_plot::{Colormap, Figure, FigureConfig, Orientation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = GrayImage::from_raw(2, 2, vec![0, 64, 128, 255])?;
//! let mut fig = Figure::subplots(1, 1, FigureConfig::default())?;
//! fig.axes_mut(0)?
//!     .imshow(img, Colormap::Gray)
//!     .set_title("Original")
//!     .axis_off();
//! fig.colorbar(0, Orientation::Horizontal)?;
//! fig.tight_layout();
//! fig.save("figure.png")?;
//! # Ok(())
//! # }
//! ```

mod colormap;
mod figure;
pub mod font;

pub use colormap::{Colormap, Norm};
pub use figure::{
    Axes, Figure, FigureConfig, Orientation, PanelLayout, PlotError, Rect, MAX_CANVAS_PX,
};
