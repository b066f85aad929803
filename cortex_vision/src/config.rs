//! Batch configuration.

use crate::constants::{defaults, report};
use crate::error::{AssessmentError, Result};
use std::path::PathBuf;

/// Configuration for an assessment run, allowing for tunable I/O behaviour.
///
/// Detection parameters are deliberately absent; see `constants::detection`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentConfig {
    /// Directory scanned for `*.png` inputs.
    pub input_dir: PathBuf,
    /// Directory receiving the CSV and the mosaic. Created if absent.
    pub output_dir: PathBuf,
    /// Mosaics wider than this are downscaled proportionally.
    pub max_mosaic_width: u32,
    /// Upper bound on images decoded and analysed concurrently.
    pub workers: usize,
    pub csv_file_name: String,
    pub mosaic_file_name: String,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(defaults::INPUT_DIR),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            max_mosaic_width: report::DEFAULT_MAX_MOSAIC_WIDTH,
            workers: num_cpus::get(),
            csv_file_name: report::CSV_FILE_NAME.to_string(),
            mosaic_file_name: report::MOSAIC_FILE_NAME.to_string(),
        }
    }
}

impl AssessmentConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_max_mosaic_width(mut self, max_mosaic_width: u32) -> Self {
        self.max_mosaic_width = max_mosaic_width;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file_name)
    }

    pub fn mosaic_path(&self) -> PathBuf {
        self.output_dir.join(&self.mosaic_file_name)
    }

    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_mosaic_width == 0 {
            return Err(AssessmentError::InvalidParameter {
                parameter: "max_mosaic_width".to_string(),
                value: self.max_mosaic_width.to_string(),
            });
        }
        if self.workers == 0 {
            return Err(AssessmentError::InvalidParameter {
                parameter: "workers".to_string(),
                value: self.workers.to_string(),
            });
        }
        for (parameter, value) in [
            ("csv_file_name", &self.csv_file_name),
            ("mosaic_file_name", &self.mosaic_file_name),
        ] {
            if value.is_empty() {
                return Err(AssessmentError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Create the output directory (and parents) if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| {
            AssessmentError::OutputDirectory {
                path: self.output_dir.clone(),
                source,
            }
        })
    }
}
