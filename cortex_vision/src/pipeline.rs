// THEORY:
// The `pipeline` module is the top-level API for assessing a directory of
// pupil-segmented images. It wires the image source, the leftover detector, the
// scorer and the report writers into one run.
//
// Stages for a batch:
// 1.  **Discovery**: list `*.png` inputs in file name order.
// 2.  **Assessment**: decode, detect, score. A file that fails to decode becomes
//     a `Skipped` outcome and the batch carries on.
// 3.  **Collection**: outcomes are recorded into a caller-owned `BatchReport` in
//     discovery order.
// 4.  **Artifacts**: the report writes the CSV and the mosaic.
//
// `AssessmentPipeline` runs everything on the calling thread, one image at a
// time. `parallel_pipeline` offers the same contract on a worker pool.

use crate::config::AssessmentConfig;
use crate::core_modules::leftover_detector::LeftoverDetector;
use crate::core_modules::scoring::CleanupScore;
use crate::error::Result;
use crate::image_source::{self, ImageSource};
use std::path::{Path, PathBuf};

// Re-export key data structures for the public API.
pub use crate::core_modules::leftover_detector::LeftoverDetection;
pub use crate::report::{Artifacts, BatchReport, ImageAssessment, ImageOutcome, SkippedImage};

/// The primary output of a pipeline run.
#[derive(Debug, Clone)]
pub enum Report {
    /// The input directory held no matching files; nothing was written.
    NoImages,
    Completed {
        report: BatchReport,
        artifacts: Artifacts,
    },
}

/// Decodes, detects and scores a single file.
pub fn assess_file(detector: &LeftoverDetector, path: &Path) -> ImageOutcome {
    let filename = image_source::display_name(path);
    let image = match ImageSource::load(path) {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read image, skipping");
            return ImageOutcome::Skipped(SkippedImage {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
        }
    };

    let detection = detector.analyze(&image);
    let score = CleanupScore::from_ratio(detection.ratio);
    tracing::debug!(%filename, ratio = detection.ratio, %score, "assessed image");

    ImageOutcome::Assessed(ImageAssessment {
        path: path.to_path_buf(),
        filename,
        image,
        detection,
        score,
    })
}

/// Sequential reference pipeline.
pub struct AssessmentPipeline {
    config: AssessmentConfig,
    source: ImageSource,
    detector: LeftoverDetector,
}

impl AssessmentPipeline {
    pub fn new(config: AssessmentConfig) -> Result<Self> {
        config.validate()?;
        let source = ImageSource::new(&config.input_dir);
        Ok(Self {
            config,
            source,
            detector: LeftoverDetector::new(),
        })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Sorted list of input files.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.source.discover()
    }

    /// Assesses `paths` in order, reporting each outcome before recording it.
    pub fn assess_batch(
        &self,
        paths: &[PathBuf],
        mut on_outcome: impl FnMut(&ImageOutcome),
    ) -> BatchReport {
        let mut report = BatchReport::new();
        for path in paths {
            let outcome = assess_file(&self.detector, path);
            on_outcome(&outcome);
            report.record(outcome);
        }
        report
    }

    /// Full run: output directory, discovery, assessment and artifacts.
    pub fn run(&self, on_outcome: impl FnMut(&ImageOutcome)) -> Result<Report> {
        self.config.ensure_output_dir()?;
        let paths = self.discover()?;
        if paths.is_empty() {
            tracing::info!(dir = %self.config.input_dir.display(), "no input images");
            return Ok(Report::NoImages);
        }

        let report = self.assess_batch(&paths, on_outcome);
        let artifacts = report.write_artifacts(&self.config)?;
        Ok(Report::Completed { report, artifacts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn unreadable_file_is_skipped() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG but not really").expect("write");
        let outcome = assess_file(&LeftoverDetector::new(), &path);
        assert!(matches!(outcome, ImageOutcome::Skipped(ref s) if s.path == path));
    }

    #[test]
    fn readable_file_is_scored() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("black.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])).save(&path).expect("write");
        match assess_file(&LeftoverDetector::new(), &path) {
            ImageOutcome::Assessed(a) => {
                assert_eq!(a.filename, "black.png");
                assert_eq!(a.ratio(), 0.0);
                assert_eq!(a.score, CleanupScore::Excellent);
            }
            ImageOutcome::Skipped(s) => panic!("unexpected skip: {}", s.reason),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AssessmentConfig::new("in", "out").with_workers(0);
        assert!(AssessmentPipeline::new(config).is_err());
    }
}
