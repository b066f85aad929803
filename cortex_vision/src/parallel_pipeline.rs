// THEORY:
// `ParallelPipeline` runs the same per-file assessment as `AssessmentPipeline`
// on a bounded pool of blocking worker tasks.
//
// Key architectural principles:
// 1.  **Bounded fan-out**: at most `config.workers` files are decoded and analysed
//     at once. Each one runs under `spawn_blocking`, since decoding and pixel
//     loops are CPU-bound and must not stall the async executor.
// 2.  **Ordered fan-in**: results are yielded in input order no matter which
//     worker finishes first, so the report, the CSV rows and the mosaic panels
//     come out exactly as they would from the sequential pipeline.
// 3.  **No shared mutable state**: workers share one immutable detector through
//     an `Arc` and own every buffer they allocate.

use crate::config::AssessmentConfig;
use crate::core_modules::leftover_detector::LeftoverDetector;
use crate::error::{AssessmentError, Result};
use crate::image_source::ImageSource;
use crate::pipeline::{Report, assess_file};
use crate::report::{BatchReport, ImageOutcome};
use futures::stream::{self, Stream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

pub struct ParallelPipeline {
    config: AssessmentConfig,
    source: ImageSource,
    detector: Arc<LeftoverDetector>,
}

impl ParallelPipeline {
    pub fn new(config: AssessmentConfig) -> Result<Self> {
        config.validate()?;
        let source = ImageSource::new(&config.input_dir);
        Ok(Self {
            config,
            source,
            detector: Arc::new(LeftoverDetector::new()),
        })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.source.discover()
    }

    /// Outcomes for `paths`, in the same order as `paths`.
    pub fn outcomes(&self, paths: Vec<PathBuf>) -> impl Stream<Item = Result<ImageOutcome>> {
        let detector = Arc::clone(&self.detector);
        stream::iter(paths)
            .map(move |path| {
                let detector = Arc::clone(&detector);
                tokio::task::spawn_blocking(move || assess_file(&detector, &path))
            })
            .buffered(self.config.workers)
            .map(|joined| {
                joined.map_err(|err| AssessmentError::Worker {
                    message: err.to_string(),
                })
            })
    }

    /// Assesses `paths` on the worker pool, reporting outcomes in input order.
    pub async fn assess_batch(
        &self,
        paths: Vec<PathBuf>,
        mut on_outcome: impl FnMut(&ImageOutcome),
    ) -> Result<BatchReport> {
        let total = paths.len();
        tracing::info!(total, workers = self.config.workers, "assessing batch");

        let mut report = BatchReport::new();
        let mut outcomes = std::pin::pin!(self.outcomes(paths));
        while let Some(outcome) = outcomes.next().await {
            let outcome = outcome?;
            on_outcome(&outcome);
            report.record(outcome);
        }
        Ok(report)
    }

    /// Full run: output directory, discovery, assessment and artifacts.
    pub async fn run(&self, on_outcome: impl FnMut(&ImageOutcome)) -> Result<Report> {
        self.config.ensure_output_dir()?;
        let paths = self.discover()?;
        if paths.is_empty() {
            tracing::info!(dir = %self.config.input_dir.display(), "no input images");
            return Ok(Report::NoImages);
        }

        let report = self.assess_batch(paths, on_outcome).await?;
        let artifacts = report.write_artifacts(&self.config)?;
        Ok(Report::Completed { report, artifacts })
    }
}
