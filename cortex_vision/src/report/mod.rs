// THEORY:
// The `report` module owns the batch result collection and everything that
// turns it into artifacts.
//
// Key architectural principles:
// 1.  **Explicit accumulation**: A `BatchReport` is an ordinary value created by
//     the caller, filled one `ImageOutcome` at a time in file name order, and
//     handed to the writers. No module-level state collects results.
// 2.  **Order is the caller's job**: The report records outcomes in the order it
//     receives them. Pipelines guarantee that order is the sorted input order,
//     whether they ran sequentially or on a worker pool.
// 3.  **Artifacts are derived**: CSV rows and mosaic panels are both projections
//     of the same `ImageAssessment` list, so they can never disagree on order
//     or content.

pub mod csv;
pub mod glyphs;
pub mod mosaic;

use crate::config::AssessmentConfig;
use crate::core_modules::leftover_detector::LeftoverDetection;
use crate::core_modules::scoring::CleanupScore;
use crate::error::{AssessmentError, Result};
use crate::utils::image_helper;
use image::RgbImage;
use std::path::PathBuf;

/// A successfully analysed image, kept whole for the mosaic.
#[derive(Debug, Clone)]
pub struct ImageAssessment {
    pub path: PathBuf,
    pub filename: String,
    pub image: RgbImage,
    pub detection: LeftoverDetection,
    pub score: CleanupScore,
}

impl ImageAssessment {
    pub fn ratio(&self) -> f64 {
        self.detection.ratio
    }

    pub fn csv_row(&self) -> csv::CsvRow<'_> {
        csv::CsvRow {
            filename: &self.filename,
            leftover_ratio: self.detection.ratio,
            cleanup_score: self.score,
        }
    }

    pub fn panel(&self) -> RgbImage {
        mosaic::render_panel(&self.image, &self.detection.mask, self.detection.ratio, &self.filename)
    }
}

/// A file that could not be decoded and was left out of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// What happened to one input file.
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Assessed(ImageAssessment),
    Skipped(SkippedImage),
}

impl ImageOutcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ImageOutcome::Assessed(assessment) => &assessment.path,
            ImageOutcome::Skipped(skipped) => &skipped.path,
        }
    }
}

/// Files written for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub csv: PathBuf,
    /// Absent when no image could be processed.
    pub mosaic: Option<PathBuf>,
}

/// Results of one batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    assessments: Vec<ImageAssessment>,
    skipped: Vec<SkippedImage>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Assessed(assessment) => self.assessments.push(assessment),
            ImageOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    pub fn assessments(&self) -> &[ImageAssessment] {
        &self.assessments
    }

    pub fn skipped(&self) -> &[SkippedImage] {
        &self.skipped
    }

    /// No image was processed successfully.
    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    /// Mean leftover ratio over processed images.
    pub fn mean_ratio(&self) -> Option<f64> {
        if self.assessments.is_empty() {
            return None;
        }
        let total: f64 = self.assessments.iter().map(ImageAssessment::ratio).sum();
        Some(total / self.assessments.len() as f64)
    }

    pub fn write_csv(&self, path: &std::path::Path) -> Result<()> {
        csv::write_csv(path, self.assessments.iter().map(ImageAssessment::csv_row))
    }

    pub fn render_mosaic(&self, max_width: u32) -> Result<RgbImage> {
        if self.assessments.is_empty() {
            return Err(AssessmentError::EmptyMosaic);
        }
        let panels: Vec<RgbImage> = self.assessments.iter().map(ImageAssessment::panel).collect();
        mosaic::compose(&panels, max_width)
    }

    /// Writes the CSV and, when at least one image was processed, the mosaic.
    pub fn write_artifacts(&self, config: &AssessmentConfig) -> Result<Artifacts> {
        let csv_path = config.csv_path();
        self.write_csv(&csv_path)?;
        tracing::info!(path = %csv_path.display(), rows = self.assessments.len(), "wrote csv report");

        let mosaic_path = if self.assessments.is_empty() {
            None
        } else {
            let path = config.mosaic_path();
            let mosaic = self.render_mosaic(config.max_mosaic_width)?;
            image_helper::save_png(&path, &mosaic)?;
            tracing::info!(
                path = %path.display(),
                width = mosaic.width(),
                height = mosaic.height(),
                "wrote mosaic"
            );
            Some(path)
        };

        Ok(Artifacts {
            csv: csv_path,
            mosaic: mosaic_path,
        })
    }
}
