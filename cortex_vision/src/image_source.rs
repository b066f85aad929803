//! Enumerates and decodes the PNG inputs of a batch.
//!
//! Matching follows shell glob semantics for `*.png`: the extension check is
//! case-sensitive and dot-files are not matched. Files are returned sorted by
//! file name, which fixes the order of every downstream artifact.

use crate::constants::defaults::IMAGE_EXTENSION;
use crate::error::{AssessmentError, Result};
use image::{ImageReader, RgbImage};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A directory of pupil-segmented images.
#[derive(Debug, Clone)]
pub struct ImageSource {
    dir: PathBuf,
}

impl ImageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Lists matching files sorted by file name.
    ///
    /// A missing directory yields an empty list, like an unmatched glob.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.dir.display(), "input directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(AssessmentError::InputDirectory {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| AssessmentError::InputDirectory {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if is_candidate(&path) && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        tracing::info!(dir = %self.dir.display(), count = paths.len(), "discovered input images");
        Ok(paths)
    }

    /// Decodes `path` into an 8-bit RGB buffer. The format is sniffed from content.
    pub fn load(path: &Path) -> Result<RgbImage> {
        let reader = ImageReader::open(path)
            .map_err(|err| AssessmentError::image_load(path, image::ImageError::IoError(err)))?
            .with_guessed_format()
            .map_err(|err| AssessmentError::image_load(path, image::ImageError::IoError(err)))?;
        let decoded = reader
            .decode()
            .map_err(|err| AssessmentError::image_load(path, err))?;
        Ok(decoded.to_rgb8())
    }
}

/// File name used in reports.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Names need not be UTF-8; they are compared as raw bytes.
fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    name.as_encoded_bytes().first() != Some(&b'.')
        && path.extension() == Some(OsStr::new(IMAGE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::fs;

    fn write_png(dir: &Path, name: &str) {
        let image = RgbImage::from_pixel(4, 4, Rgb([80, 80, 80]));
        image.save(dir.join(name)).expect("write png");
    }

    #[test]
    fn discovers_png_files_in_name_order() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        write_png(tmp.path(), "b.png");
        write_png(tmp.path(), "a.png");
        write_png(tmp.path(), "c10.png");
        write_png(tmp.path(), "c2.png");
        fs::write(tmp.path().join("notes.txt"), "x").expect("write txt");
        fs::write(tmp.path().join("upper.PNG"), "x").expect("write upper");
        fs::write(tmp.path().join(".hidden.png"), "x").expect("write hidden");
        fs::create_dir(tmp.path().join("dir.png")).expect("create dir");

        let names: Vec<String> = ImageSource::new(tmp.path())
            .discover()
            .expect("discover")
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c10.png", "c2.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_discovered() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let name = OsStr::from_bytes(b"eye_\xff.png");
        let image = RgbImage::from_pixel(4, 4, Rgb([80, 80, 80]));
        image
            .save_with_format(tmp.path().join(name), image::ImageFormat::Png)
            .expect("write png");
        fs::write(tmp.path().join(OsStr::from_bytes(b".\xfe.png")), "x").expect("write hidden");

        let paths = ImageSource::new(tmp.path()).discover().expect("discover");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].file_name(), Some(name));
        assert_eq!(display_name(&paths[0]), "eye_\u{FFFD}.png");
        assert!(ImageSource::load(&paths[0]).is_ok());
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let source = ImageSource::new(tmp.path().join("nope"));
        assert!(source.discover().expect("discover").is_empty());
    }

    #[test]
    fn load_decodes_rgb() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        write_png(tmp.path(), "gray.png");
        let image = ImageSource::load(&tmp.path().join("gray.png")).expect("load");
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(image.get_pixel(0, 0), &Rgb([80, 80, 80]));
    }

    #[test]
    fn load_rejects_garbage() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("broken.png");
        fs::write(&path, b"definitely not a png").expect("write garbage");
        let err = ImageSource::load(&path).expect_err("garbage must not decode");
        assert!(err.is_recoverable());
    }
}
