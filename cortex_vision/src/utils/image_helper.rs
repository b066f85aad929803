//! PNG persistence for rendered RGB buffers.

use crate::error::{AssessmentError, Result};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Encodes `image` as an 8-bit RGB PNG at `path`, replacing any existing file.
pub fn save_png(path: &Path, image: &RgbImage) -> Result<()> {
    let encode_err = |source| AssessmentError::MosaicEncode {
        path: path.to_path_buf(),
        source,
    };
    let output = File::create(path).map_err(|err| encode_err(image::ImageError::IoError(err)))?;
    let encoder = image::codecs::png::PngEncoder::new(BufWriter::new(output));

    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(encode_err)?;

    Ok(())
}
