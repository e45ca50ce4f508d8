//! JSON configuration and report helpers for the comparison run.

use crate::compare::{CompareError, ComparisonSummary, LocalOtsuComparison};
use crate::{data, imageio};
use rank_otsu_core::GrayImage;
use rank_otsu_plot::FigureConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Source label used when no input image is configured.
pub const SAMPLE_SOURCE: &str = "sample:page";

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_radius() -> u32 {
    15
}

/// Configuration for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Input image; the built-in sample page when absent.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Radius of the disk neighbourhood.
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub figure: FigureConfig,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            radius: default_radius(),
            output_path: None,
            report_path: None,
            figure: FigureConfig::default(),
        }
    }
}

impl CompareConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output figure path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("local_otsu.png"))
    }

    /// Load the configured image together with a label naming its source.
    pub fn load_image(&self) -> Result<(GrayImage, String), CompareError> {
        match &self.image_path {
            Some(path) => Ok((imageio::load_gray(path)?, path.clone())),
            None => Ok((data::page(), SAMPLE_SOURCE.to_string())),
        }
    }

    /// Load the image, compare thresholds, save the figure and, if
    /// configured, the report.
    pub fn run(&self) -> Result<CompareReport, CompareError> {
        let (img, source) = self.load_image()?;
        let cmp = LocalOtsuComparison::compute(&img.view(), self.radius)?;

        let figure_path = self.output_path();
        cmp.figure(&self.figure)?.save(&figure_path)?;

        let report = CompareReport::from_comparison(
            source,
            &cmp,
            Some(figure_path.display().to_string()),
        );
        if let Some(path) = &self.report_path {
            report.write_json(path)?;
            log::info!("wrote report to {path}");
        }
        Ok(report)
    }
}

/// Report written after a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareReport {
    pub source: String,
    #[serde(flatten)]
    pub summary: ComparisonSummary,
    #[serde(default)]
    pub figure_path: Option<String>,
}

impl CompareReport {
    pub fn from_comparison(
        source: impl Into<String>,
        cmp: &LocalOtsuComparison,
        figure_path: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            summary: cmp.summary(),
            figure_path,
        }
    }

    /// Load a JSON report from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
