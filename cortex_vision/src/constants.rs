//! Fixed constants for leftover detection, scoring and reporting.
//!
//! The detection constants are part of the scoring contract: datasets that
//! were scored with them must keep producing the same ratios, so they are not
//! exposed through `AssessmentConfig`.

/// Leftover detection parameters.
pub mod detection {
    /// A pixel belongs to the pupil when its gray intensity is strictly above this.
    pub const PUPIL_INTENSITY_THRESHOLD: u8 = 10;

    /// Side length of the elliptical structuring element used for the opening.
    pub const MORPH_KERNEL_SIZE: u32 = 3;

    /// Value written into binary masks for "set" pixels.
    pub const MASK_ON: u8 = 255;

    /// Value written into binary masks for "clear" pixels.
    pub const MASK_OFF: u8 = 0;
}

/// Grayscale conversion (Rec. 601 luma in 14-bit fixed point).
pub mod luma {
    pub const SHIFT: u32 = 14;
    pub const RED_WEIGHT: u32 = 4899;
    pub const GREEN_WEIGHT: u32 = 9617;
    pub const BLUE_WEIGHT: u32 = 1868;
    pub const ROUNDING: u32 = 1 << (SHIFT - 1);
}

/// Cleanup score bands.
pub mod scoring {
    /// Ratios strictly below this are `Excellent`.
    pub const EXCELLENT_BELOW: f64 = 0.2;

    /// Ratios strictly below this (and not `Excellent`) are `Moderate`.
    pub const MODERATE_BELOW: f64 = 0.5;
}

/// Report rendering parameters.
pub mod report {
    /// Composite mosaics wider than this are downscaled to fit.
    pub const DEFAULT_MAX_MOSAIC_WIDTH: u32 = 1200;

    pub const CSV_FILE_NAME: &str = "cleanup_scores.csv";
    pub const MOSAIC_FILE_NAME: &str = "debug_summary.png";
    pub const CSV_HEADER: [&str; 3] = ["filename", "leftover_ratio", "cleanup_score"];

    /// Decimal places for the ratio column of the CSV.
    pub const CSV_RATIO_PRECISION: usize = 4;

    /// Decimal places for the ratio label drawn on mosaic panels.
    pub const LABEL_RATIO_PRECISION: usize = 3;

    /// Text origin of panel labels (left edge, baseline).
    pub const LABEL_ORIGIN: (u32, u32) = (10, 30);

    /// Integer upscale applied to the 5x7 label glyphs.
    pub const LABEL_GLYPH_SCALE: u32 = 2;

    pub const LABEL_COLOR: [u8; 3] = [255, 255, 255];
    pub const LEFTOVER_COLOR: [u8; 3] = [255, 0, 0];
}

/// Command line defaults.
pub mod defaults {
    pub const INPUT_DIR: &str = "/input";
    pub const OUTPUT_DIR: &str = "output_results";

    /// File extension matched by the image source (case-sensitive).
    pub const IMAGE_EXTENSION: &str = "png";
}
