// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the detector. It is a
// "dumb" data container for a single RGB pixel plus the one heuristic the
// detector needs from it: gray intensity. Nothing here reads neighbours; spatial
// logic (masks, thresholding, morphology) lives in the modules above this one.
//
// Gray intensity is Rec. 601 luma. It is evaluated in 14-bit fixed point with
// rounding rather than in floating point so that:
// - a neutral pixel (v, v, v) maps to exactly v, and
// - results are bit-identical across platforms, which keeps previously scored
//   datasets reproducible.
// `luminance()` keeps the floating point definition for callers that want the
// unrounded value.

pub mod pixel {
    use crate::constants::luma;
    use image::{GrayImage, Luma, RgbImage};

    pub type Channel = u8;
    pub type Luminance = f64;
    pub type Intensity = u8;

    const CHANNELS: usize = 3;

    /// A single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Rec. 601 luminance in the 0..255 range, unrounded.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64 + 0.587_f64 * self.green as f64 + 0.114_f64 * self.blue as f64
        }

        /// Rec. 601 luma rounded to the nearest 8-bit intensity.
        pub fn intensity(&self) -> Intensity {
            let weighted = self.red as u32 * luma::RED_WEIGHT
                + self.green as u32 * luma::GREEN_WEIGHT
                + self.blue as u32 * luma::BLUE_WEIGHT;
            // Max is 255 * 2^14 + 2^13, so the shifted value always fits in a byte.
            ((weighted + luma::ROUNDING) >> luma::SHIFT) as Intensity
        }
    }

    impl From<&[u8]> for Pixel {
        /// Builds a pixel from the first three bytes of an RGB slice.
        fn from(bytes: &[u8]) -> Self {
            match bytes {
                [red, green, blue, ..] => Pixel::new(*red, *green, *blue),
                _ => Pixel::default(),
            }
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    /// Converts an RGB image into its gray intensity image.
    pub fn to_gray(image: &RgbImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let data: Vec<u8> = image
            .as_raw()
            .chunks_exact(CHANNELS)
            .map(|bytes| Pixel::from(bytes).intensity())
            .collect();
        GrayImage::from_raw(width, height, data)
            .unwrap_or_else(|| GrayImage::from_pixel(width, height, Luma([0])))
    }
}
