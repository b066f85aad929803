// THEORY:
// Binary masks are the currency between detection stages. Every stage narrows
// the previous one (pupil -> candidates -> cleaned leftover) and none of them
// mutates its input, so each mask type is a small owning wrapper around a
// `GrayImage` whose pixels are either `MASK_ON` or `MASK_OFF`.
//
// `PupilMask` and `LeftoverMask` are distinct types so the invariant
// "leftover is a subset of pupil" can only be established in one place: the
// constructor `LeftoverMask::within`, which clears anything outside the pupil.

use crate::constants::detection::{MASK_OFF, MASK_ON, PUPIL_INTENSITY_THRESHOLD};
use image::{GrayImage, Luma};

/// Pixels whose gray intensity is above the near-black cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PupilMask {
    mask: GrayImage,
    area: usize,
}

impl PupilMask {
    /// Marks every pixel of `gray` strictly brighter than the near-black cutoff.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let mut area = 0;
        let mask = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            if gray.get_pixel(x, y).0[0] > PUPIL_INTENSITY_THRESHOLD {
                area += 1;
                Luma([MASK_ON])
            } else {
                Luma([MASK_OFF])
            }
        });
        Self { mask, area }
    }

    /// Number of pupil pixels. Zero is a legitimate value.
    pub fn area(&self) -> usize {
        self.area
    }

    pub fn is_empty(&self) -> bool {
        self.area == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).0[0] == MASK_ON
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// A copy of `gray` where every non-pupil pixel is forced to 0.
    pub fn apply(&self, gray: &GrayImage) -> GrayImage {
        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            if self.contains(x, y) {
                *gray.get_pixel(x, y)
            } else {
                Luma([MASK_OFF])
            }
        })
    }
}

/// Pixels classified as bright leftover residue. Always a subset of a `PupilMask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftoverMask {
    mask: GrayImage,
}

impl LeftoverMask {
    /// An all-clear mask of the given size.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::from_pixel(width, height, Luma([MASK_OFF])),
        }
    }

    /// Takes a candidate binary image and clears every pixel outside `pupil`.
    pub fn within(mut candidates: GrayImage, pupil: &PupilMask) -> Self {
        for (x, y, value) in candidates.enumerate_pixels_mut() {
            if !pupil.contains(x, y) {
                value.0[0] = MASK_OFF;
            }
        }
        Self { mask: candidates }
    }

    /// Number of `MASK_ON` pixels.
    pub fn area(&self) -> usize {
        count_on(&self.mask)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).0[0] == MASK_ON
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }

    /// Narrowing stages (such as an opening) may only remove pixels, so the
    /// subset invariant survives `map` as long as `f` never adds any. The
    /// result is intersected with the current mask to enforce that.
    pub fn map(self, f: impl FnOnce(&GrayImage) -> GrayImage) -> Self {
        let mut next = f(&self.mask);
        for (x, y, value) in next.enumerate_pixels_mut() {
            if !self.contains(x, y) {
                value.0[0] = MASK_OFF;
            }
        }
        Self { mask: next }
    }
}

/// Counts `MASK_ON` pixels in a binary image.
pub fn count_on(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v == MASK_ON).count()
}
