//! SIMD-accelerated downscaling to grayscale.
//!
//! fast_image_resize is 5-14x faster than the image crate's resize and
//! picks AVX2/NEON at runtime when available.

use crate::error::DecodeError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};

/// Reusable resizer (keeps its scratch buffers between calls)
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to luminance, then resize to `width` x `height`.
    ///
    /// Grayscale first: one channel is a third of the resize work.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::ComputationFailed(format!(
                "invalid target size {}x{}",
                width, height
            )));
        }

        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(DecodeError::EmptyImage {
                path: Default::default(),
            });
        }

        let src = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| DecodeError::ComputationFailed(format!("source buffer: {}", e)))?;
        let mut dst = Image::new(width, height, PixelType::U8);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
        self.resizer
            .resize(&src, &mut dst, &options)
            .map_err(|e| DecodeError::ComputationFailed(format!("resize failed: {}", e)))?;

        GrayImage::from_raw(width, height, dst.into_vec())
            .ok_or_else(|| DecodeError::ComputationFailed("resized buffer size mismatch".into()))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off resize with a fresh resizer
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, DecodeError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}
