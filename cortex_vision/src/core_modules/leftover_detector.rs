// THEORY:
// The `LeftoverDetector` is the whole analytical core. It turns one
// pupil-segmented RGB image into a binary leftover mask and the fraction of the
// pupil that mask covers.
//
// Stages, each strictly narrowing the previous one:
// 1.  **Gray**: Rec. 601 luma per pixel.
// 2.  **Pupil**: everything brighter than near-black. An empty pupil short-cuts
//     to an empty mask and a ratio of exactly 0.0.
// 3.  **Masked gray**: background forced to 0 so it reads as one dark class.
// 4.  **Otsu**: a single global cutoff over the whole masked image, zeros
//     included, separates bright candidates from the rest.
// 5.  **Clip**: candidates outside the pupil are cleared again.
// 6.  **Opening**: a 3x3 elliptical opening drops isolated specks.
// 7.  **Ratio**: leftover pixels / pupil pixels.
//
// Otsu and the opening come from `imageproc`. Its `otsu_level` keeps the first
// bin of maximal between-class variance and returns 0 for a single-valued
// histogram, and `ThresholdType::Binary` keeps pixels strictly above the cutoff.
// A 3x3 ellipse rasterises to the 4-connected cross, which is the L1 ball of
// radius 1, and `imageproc` morphology ignores neighbours outside the image.
//
// The detector holds no state beyond its opening radius, so a single instance
// can be shared across worker threads.

use crate::constants::detection::MORPH_KERNEL_SIZE;
use crate::core_modules::mask::{LeftoverMask, PupilMask, count_on};
use crate::core_modules::pixel::pixel;
use image::{GrayImage, RgbImage};
use imageproc::contrast::{self, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// L1 radius of the opening derived from the elliptical kernel size.
const OPENING_RADIUS: u8 = (MORPH_KERNEL_SIZE / 2) as u8;

/// Global Otsu cutoff over `masked_gray` and the pixels strictly above it.
fn threshold_candidates(masked_gray: &GrayImage) -> (u8, GrayImage) {
    let cutoff = contrast::otsu_level(masked_gray);
    (cutoff, contrast::threshold(masked_gray, cutoff, ThresholdType::Binary))
}

/// Everything the detector learned about one image.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftoverDetection {
    pub mask: LeftoverMask,
    /// Leftover pixels over pupil pixels. Exactly 0.0 for an empty pupil.
    pub ratio: f64,
    pub pupil_area: usize,
    pub leftover_area: usize,
    /// Otsu cutoff applied to the masked gray image; `None` when the pupil was empty.
    pub otsu_threshold: Option<u8>,
}

/// Stateless leftover detector.
#[derive(Debug, Clone)]
pub struct LeftoverDetector {
    radius: u8,
}

impl Default for LeftoverDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LeftoverDetector {
    pub fn new() -> Self {
        Self {
            radius: OPENING_RADIUS,
        }
    }

    /// Mask and ratio only.
    pub fn detect(&self, image: &RgbImage) -> (LeftoverMask, f64) {
        let detection = self.analyze(image);
        (detection.mask, detection.ratio)
    }

    /// Full detection with diagnostics.
    pub fn analyze(&self, image: &RgbImage) -> LeftoverDetection {
        let (width, height) = image.dimensions();
        let gray = pixel::to_gray(image);
        let pupil = PupilMask::from_gray(&gray);
        let pupil_area = pupil.area();

        if pupil.is_empty() {
            tracing::debug!(width, height, "empty pupil, skipping threshold");
            return LeftoverDetection {
                mask: LeftoverMask::empty(width, height),
                ratio: 0.0,
                pupil_area: 0,
                leftover_area: 0,
                otsu_threshold: None,
            };
        }

        let masked_gray = pupil.apply(&gray);
        let (cutoff, candidates) = threshold_candidates(&masked_gray);
        let candidates = LeftoverMask::within(candidates, &pupil);
        let mask = candidates.map(|binary| self.open(binary));

        let leftover_area = mask.area();
        let ratio = leftover_area as f64 / pupil_area as f64;

        tracing::debug!(
            width,
            height,
            pupil_area,
            otsu_threshold = cutoff,
            leftover_area,
            ratio,
            "leftover detection"
        );

        LeftoverDetection {
            mask,
            ratio,
            pupil_area,
            leftover_area,
            otsu_threshold: Some(cutoff),
        }
    }

    /// Erosion then dilation with the cross-shaped kernel.
    fn open(&self, binary: &GrayImage) -> GrayImage {
        let opened = morphology::open(binary, Norm::L1, self.radius);
        tracing::trace!(
            before = count_on(binary),
            after = count_on(&opened),
            radius = self.radius,
            "morphological opening"
        );
        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::scoring::CleanupScore;
    use image::Rgb;

    fn canvas(size: u32, fill: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(size, size, Rgb(fill))
    }

    fn paint(image: &mut RgbImage, x0: u32, y0: u32, side: u32, color: [u8; 3]) {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                image.put_pixel(x, y, Rgb(color));
            }
        }
    }

    #[test]
    fn all_black_image_has_no_leftover() {
        let detection = LeftoverDetector::new().analyze(&canvas(50, [0, 0, 0]));
        assert_eq!(detection.ratio, 0.0);
        assert_eq!(detection.pupil_area, 0);
        assert_eq!(detection.mask.area(), 0);
        assert_eq!(detection.mask.dimensions(), (50, 50));
        assert_eq!(detection.otsu_threshold, None);
    }

    #[test]
    fn near_black_noise_is_not_pupil() {
        let detection = LeftoverDetector::new().analyze(&canvas(20, [10, 10, 10]));
        assert_eq!(detection.pupil_area, 0);
        assert_eq!(detection.ratio, 0.0);
    }

    #[test]
    fn uniform_patch_on_black_is_all_candidate() {
        // Otsu separates the black background from the patch, so the whole patch
        // survives thresholding; the opening clips its four corners.
        let mut image = canvas(100, [0, 0, 0]);
        paint(&mut image, 30, 30, 40, [100, 100, 100]);
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.pupil_area, 1600);
        assert_eq!(detection.otsu_threshold, Some(0));
        assert_eq!(detection.leftover_area, 1596);
        assert_eq!(detection.ratio, 1596.0 / 1600.0);
    }

    #[test]
    fn bright_square_inside_patch_on_black() {
        // The background zeros dominate the histogram, so the cutoff stays at 0
        // and the bright square is indistinguishable from the rest of the patch.
        let mut image = canvas(100, [0, 0, 0]);
        paint(&mut image, 30, 30, 40, [100, 100, 100]);
        paint(&mut image, 45, 45, 10, [250, 250, 250]);
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.pupil_area, 1600);
        assert_eq!(detection.otsu_threshold, Some(0));
        assert_eq!(detection.leftover_area, 1596);
        assert_eq!(CleanupScore::from_ratio(detection.ratio), CleanupScore::Significant);
    }

    #[test]
    fn bright_square_in_full_frame_pupil() {
        let mut image = canvas(100, [100, 100, 100]);
        paint(&mut image, 45, 45, 10, [250, 250, 250]);
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.pupil_area, 10_000);
        assert_eq!(detection.otsu_threshold, Some(100));
        assert_eq!(detection.leftover_area, 96);
        assert_eq!(detection.ratio, 0.0096);
    }

    #[test]
    fn isolated_speck_is_removed() {
        let mut image = canvas(40, [90, 90, 90]);
        image.put_pixel(20, 20, Rgb([255, 255, 255]));
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.otsu_threshold, Some(90));
        assert_eq!(detection.leftover_area, 0);
        assert_eq!(detection.ratio, 0.0);
    }

    #[test]
    fn uniform_full_frame_is_all_leftover() {
        let detection = LeftoverDetector::new().analyze(&canvas(16, [120, 120, 120]));
        assert_eq!(detection.ratio, 1.0);
    }

    #[test]
    fn equal_variance_cutoffs_resolve_to_the_lowest() {
        // Every cutoff in [40, 209] splits the two halves equally well.
        let image = RgbImage::from_fn(100, 10, |x, _| {
            if x < 50 { Rgb([40, 40, 40]) } else { Rgb([210, 210, 210]) }
        });
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.otsu_threshold, Some(40));
        assert_eq!(detection.leftover_area, 500);
        assert_eq!(detection.ratio, 0.5);
        for y in 0..10 {
            assert!(!detection.mask.contains(49, y));
            assert!(detection.mask.contains(50, y));
        }
    }

    #[test]
    fn cutoff_value_itself_is_not_leftover() {
        let image = RgbImage::from_fn(3, 1, |x, _| {
            let v = [100, 100, 250][x as usize];
            Rgb([v, v, v])
        });
        let (cutoff, binary) = threshold_candidates(&pixel::to_gray(&image));
        assert_eq!(binary.as_raw(), &vec![0, 0, 255]);
        assert_eq!(cutoff, 100);
    }

    #[test]
    fn one_pixel_wide_strips_survive_the_opening() {
        // Neighbours outside the image never erode, so a strip touching both
        // long edges keeps every pixel.
        for (w, h) in [(1, 20), (20, 1), (2, 2)] {
            let detection = LeftoverDetector::new().analyze(&RgbImage::from_pixel(w, h, Rgb([100, 100, 100])));
            assert_eq!(detection.otsu_threshold, Some(0));
            assert_eq!(detection.leftover_area, (w * h) as usize);
            assert_eq!(detection.ratio, 1.0);
        }
    }

    #[test]
    fn opening_kernel_is_the_cross() {
        assert_eq!(OPENING_RADIUS, 1);
        // A plus-shaped blob is exactly one kernel footprint and survives whole;
        // a 2x2 block contains no footprint and vanishes.
        let mut image = canvas(9, [100, 100, 100]);
        for (x, y) in [(4, 3), (3, 4), (4, 4), (5, 4), (4, 5)] {
            image.put_pixel(x, y, Rgb([250, 250, 250]));
        }
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.otsu_threshold, Some(100));
        assert_eq!(detection.leftover_area, 5);

        let mut image = canvas(9, [100, 100, 100]);
        paint(&mut image, 3, 3, 2, [250, 250, 250]);
        let detection = LeftoverDetector::new().analyze(&image);
        assert_eq!(detection.leftover_area, 0);
    }

    #[test]
    fn detect_matches_analyze() {
        let mut image = canvas(30, [60, 60, 60]);
        paint(&mut image, 5, 5, 8, [230, 230, 230]);
        let detector = LeftoverDetector::new();
        let (mask, ratio) = detector.detect(&image);
        let detection = detector.analyze(&image);
        assert_eq!(mask, detection.mask);
        assert_eq!(ratio, detection.ratio);
    }
}
