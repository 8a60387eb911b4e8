//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Resizing the image to 9x8 grayscale
//! 2. Comparing each pixel to the one to its right
//! 3. Setting the bit when the left pixel is brighter
//!
//! This captures the relative gradient of brightness changes.

use super::super::fast_resize::resize_to_grayscale;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::DecodeError;
use image::DynamicImage;

const GRID: u32 = 8;

/// Difference Hash (dHash) implementation
#[derive(Debug, Default)]
pub struct DifferenceHasher;

impl DifferenceHasher {
    pub fn new() -> Self {
        Self
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, DecodeError> {
        // One extra column so every cell has a right-hand neighbour
        let gray = resize_to_grayscale(image, GRID + 1, GRID)?;

        let bits = (0..GRID).flat_map(|y| {
            let gray = &gray;
            (0..GRID).map(move |x| gray.get_pixel(x, y)[0] > gray.get_pixel(x + 1, y)[0])
        });

        Ok(Fingerprint::from_bit_iter(bits))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}
