//! Error types for the cortex_vision library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cortex_vision operations
pub type Result<T> = std::result::Result<T, AssessmentError>;

/// Failures raised while assessing a batch of images
#[derive(Error, Debug)]
pub enum AssessmentError {
    /// The input directory exists but could not be listed
    #[error("Failed to read input directory {}", .path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image file could not be opened or decoded
    #[error("Failed to load image {}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output directory could not be created
    #[error("Failed to create output directory {}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the CSV report failed
    #[error("Failed to write report {}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or saving the mosaic failed
    #[error("Failed to write mosaic {}", .path.display())]
    MosaicEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A mosaic was requested for a batch without processed images
    #[error("Cannot build a mosaic from zero processed images")]
    EmptyMosaic,

    /// Invalid configuration value
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// A worker task panicked or was cancelled
    #[error("Worker failed: {message}")]
    Worker { message: String },
}

impl AssessmentError {
    /// Create an image load error for `path`
    pub fn image_load(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: path.into(),
            source,
        }
    }

    /// Create a report write error for `path`
    pub fn report_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }

    /// Per-file failures only cost the batch that one file.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AssessmentError::ImageLoad { .. })
    }
}
