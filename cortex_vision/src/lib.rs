// THEORY:
// This file is the main entry point for the `cortex_vision` library crate.
// It defines the public API exposed to front ends such as the
// `cleanup_assessor` command line tool.
//
// The primary goal is to export the pipelines (`AssessmentPipeline`,
// `ParallelPipeline`) and their data structures (`AssessmentConfig`,
// `BatchReport`, `Report`, etc.) as the high-level interface, while the
// detector internals in `core_modules` stay usable on their own for callers
// that only need `LeftoverDetector::detect` on an in-memory image.

pub mod config;
pub mod constants;
pub mod core_modules;
pub mod error;
pub mod image_source;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use config::AssessmentConfig;
pub use core_modules::leftover_detector::{LeftoverDetection, LeftoverDetector};
pub use core_modules::mask::{LeftoverMask, PupilMask};
pub use core_modules::scoring::CleanupScore;
pub use error::{AssessmentError, Result};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{AssessmentPipeline, Report};
pub use report::{Artifacts, BatchReport, ImageAssessment, ImageOutcome, SkippedImage};
