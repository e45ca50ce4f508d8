//! High-level facade crate for the `rank-otsu-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types, the rank filters and the figure renderer
//! - a synthetic sample page with uneven illumination (`data::page`)
//! - the local-vs-global Otsu comparison (`compare`) and its 2x2 figure
//! - JSON config/report helpers (`io`) and `image`-crate adapters (`imageio`)
//!
//! ## Quickstart
//!
//! ```no_run
//! use rank_otsu::compare::LocalOtsuComparison;
//! use rank_otsu::plot::FigureConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = rank_otsu::data::page();
//! let cmp = LocalOtsuComparison::compute(&img.view(), 15)?;
//! println!("global threshold: {}", cmp.global_threshold);
//! cmp.figure(&FigureConfig::default())?.save("local_otsu.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `rank_otsu::core`: images, footprints, histogram, global Otsu.
//! - `rank_otsu::filters`: sliding-window rank filters (local Otsu et al.).
//! - `rank_otsu::plot`: figures, colour maps, bitmap font.

pub use rank_otsu_core as core;
pub use rank_otsu_filters as filters;
pub use rank_otsu_plot as plot;

pub use rank_otsu_core::{Footprint, GrayImage, GrayImageView};
pub use rank_otsu_filters::RankOp;

pub mod compare;
pub mod data;
pub mod imageio;
pub mod io;

pub use compare::{CompareError, LocalOtsuComparison};
