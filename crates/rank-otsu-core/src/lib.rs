//! Core types and utilities for rank-order thresholding.
//!
//! This crate is intentionally small. It owns the grayscale image types,
//! structuring elements (footprints), the 256-bin histogram shared by the
//! global and local Otsu thresholds, and 8-bit conversion helpers. It does
//! *not* depend on any image codec.

mod convert;
mod footprint;
mod histogram;
mod image;
mod logger;
mod threshold;

pub use convert::{ubyte_from_bool, ubyte_from_f32, ubyte_from_u16, ConvertError};
pub use footprint::{Footprint, FootprintError, MAX_RADIUS};
pub use histogram::Histogram;
pub use image::{GrayImage, GrayImageView, ImageError};
pub use threshold::{
    binarize, binarize_map, foreground_fraction, threshold_otsu, ThresholdError, FOREGROUND,
};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, tracing_filter};

pub use logger::init_with_level;
