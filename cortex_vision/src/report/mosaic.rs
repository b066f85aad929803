// THEORY:
// The mosaic is the human review surface for a batch. Each processed image gets
// one panel: the original on top, the same image with leftover pixels painted
// pure red underneath, each labelled. Panels are laid out in a single row in
// file name order, and the whole strip is shrunk with area averaging when it is
// wider than the configured maximum.
//
// Panels normally share a height (they are two copies of the same-sized image
// stacked), but images in a batch need not share dimensions, so shorter panels
// are padded with black at the bottom.

use crate::constants::detection::MASK_ON;
use crate::constants::report::{
    LABEL_COLOR, LABEL_GLYPH_SCALE, LABEL_ORIGIN, LABEL_RATIO_PRECISION, LEFTOVER_COLOR,
};
use crate::core_modules::mask::LeftoverMask;
use crate::error::{AssessmentError, Result};
use crate::report::glyphs;
use image::{Rgb, RgbImage, imageops};

/// Copy of `image` with every leftover pixel replaced by pure red.
pub fn overlay_leftover(image: &RgbImage, mask: &LeftoverMask) -> RgbImage {
    let mut overlay = image.clone();
    let mask = mask.as_image();
    for (x, y, pixel) in overlay.enumerate_pixels_mut() {
        if x < mask.width() && y < mask.height() && mask.get_pixel(x, y).0[0] == MASK_ON {
            *pixel = Rgb(LEFTOVER_COLOR);
        }
    }
    overlay
}

/// Copy of `image` with `text` drawn at the label origin.
pub fn labelled(image: &RgbImage, text: &str) -> RgbImage {
    let mut out = image.clone();
    let (x, baseline) = LABEL_ORIGIN;
    glyphs::draw_text(&mut out, text, x, baseline, LABEL_GLYPH_SCALE, Rgb(LABEL_COLOR));
    out
}

/// Original above overlay, both labelled.
pub fn render_panel(image: &RgbImage, mask: &LeftoverMask, ratio: f64, filename: &str) -> RgbImage {
    let precision = LABEL_RATIO_PRECISION;
    let top = labelled(image, &format!("Original: {filename}"));
    let bottom = labelled(
        &overlay_leftover(image, mask),
        &format!("Leftover: ratio={ratio:.precision$}"),
    );
    stack_vertical(&top, &bottom)
}

fn stack_vertical(top: &RgbImage, bottom: &RgbImage) -> RgbImage {
    let width = top.width().max(bottom.width());
    let mut out = RgbImage::new(width, top.height() + bottom.height());
    imageops::replace(&mut out, top, 0, 0);
    imageops::replace(&mut out, bottom, 0, top.height() as i64);
    out
}

/// Concatenates panels left to right, top-aligned, padding short ones with black.
pub fn concat_horizontal(panels: &[RgbImage]) -> Result<RgbImage> {
    if panels.is_empty() {
        return Err(AssessmentError::EmptyMosaic);
    }
    let width: u32 = panels.iter().map(RgbImage::width).sum();
    let height = panels.iter().map(RgbImage::height).max().unwrap_or(0);
    let mut mosaic = RgbImage::new(width, height);
    let mut x = 0i64;
    for panel in panels {
        imageops::replace(&mut mosaic, panel, x, 0);
        x += panel.width() as i64;
    }
    Ok(mosaic)
}

/// Shrinks `mosaic` proportionally when it is wider than `max_width`.
pub fn fit_width(mosaic: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = mosaic.dimensions();
    if width <= max_width {
        return mosaic;
    }
    let scale = max_width as f64 / width as f64;
    let new_width = ((width as f64 * scale) as u32).max(1);
    let new_height = ((height as f64 * scale) as u32).max(1);
    tracing::debug!(width, height, new_width, new_height, "downscaling mosaic");
    resize_area(&mosaic, new_width, new_height)
}

/// Builds the full composite from already rendered panels.
pub fn compose(panels: &[RgbImage], max_width: u32) -> Result<RgbImage> {
    Ok(fit_width(concat_horizontal(panels)?, max_width))
}

/// Per destination index, the source indices it covers and their weights.
fn area_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (start + scale).min(src_len as f64);
            let span = end - start;
            let mut weights = Vec::new();
            let mut s = start.floor() as u32;
            while s < src_len && (s as f64) < end {
                let lo = start.max(s as f64);
                let hi = end.min(s as f64 + 1.0);
                if hi > lo {
                    weights.push((s, (hi - lo) / span));
                }
                s += 1;
            }
            weights
        })
        .collect()
}

/// Resamples by averaging every source pixel a destination pixel covers,
/// weighted by the covered fraction.
pub fn resize_area(src: &RgbImage, dst_width: u32, dst_height: u32) -> RgbImage {
    let xs = area_weights(src.width(), dst_width);
    let ys = area_weights(src.height(), dst_height);
    let mut out = RgbImage::new(dst_width, dst_height);
    for (y, row_weights) in ys.iter().enumerate() {
        for (x, col_weights) in xs.iter().enumerate() {
            let mut acc = [0.0f64; 3];
            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    let w = wy * wx;
                    let p = src.get_pixel(sx, sy).0;
                    for c in 0..3 {
                        acc[c] += p[c] as f64 * w;
                    }
                }
            }
            // Half-way averages round to even.
            let pixel = acc.map(|v| v.round_ties_even().clamp(0.0, 255.0) as u8);
            out.put_pixel(x as u32, y as u32, Rgb(pixel));
        }
    }
    out
}
