//! Average Hash (aHash) implementation.
//!
//! 8x8 grayscale, one bit per pixel brighter than the mean. Fastest of the
//! three but the least robust to edits.

use super::super::fast_resize::resize_to_grayscale;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::DecodeError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
#[derive(Debug, Default)]
pub struct AverageHasher;

impl AverageHasher {
    pub fn new() -> Self {
        Self
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, DecodeError> {
        let gray = resize_to_grayscale(image, 8, 8)?;

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let average = total / Fingerprint::BITS as u64;

        Ok(Fingerprint::from_bit_iter(
            gray.pixels().map(|p| p[0] as u64 > average),
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
