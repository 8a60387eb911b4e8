//! Perceptual Hash (pHash) implementation.
//!
//! pHash uses the Discrete Cosine Transform to keep only the low-frequency
//! structure of the image:
//! 1. Convert to luminance and shrink to a small grid
//! 2. Run a 2D DCT over the grid
//! 3. Keep the top-left 8x8 block of coefficients
//! 4. Set a bit for every coefficient above the block's median
//!
//! This makes it robust to scaling, recompression and brightness changes.
//! The transform itself comes from the image_hasher crate.

use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::DecodeError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Perceptual Hash (pHash) implementation using DCT
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    pub fn new() -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(8, 8)
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, DecodeError> {
        let hash = self.hasher.hash_image(image);
        Fingerprint::from_bytes(hash.as_bytes())
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_images::{blocks, solid};
    use super::*;

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = PerceptualHasher::new();
        let image = blocks(7, 128);

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn resized_image_stays_close() {
        let hasher = PerceptualHasher::new();
        let original = blocks(7, 256);
        let smaller = original.resize_exact(128, 128, image::imageops::FilterType::Triangle);

        let distance = hasher
            .hash_image(&original)
            .unwrap()
            .distance(&hasher.hash_image(&smaller).unwrap());

        assert!(distance <= 5, "distance {} too large", distance);
    }

    #[test]
    fn different_patterns_are_far_apart() {
        let hasher = PerceptualHasher::new();

        let a = hasher.hash_image(&blocks(7, 128)).unwrap();
        let b = hasher.hash_image(&blocks(1_000_003, 128)).unwrap();

        assert!(a.distance(&b) > 5);
    }

    #[test]
    fn contrast_change_is_stable() {
        let hasher = PerceptualHasher::new();
        let original = blocks(42, 128);
        let mut faded = original.to_rgb8();
        for pixel in faded.pixels_mut() {
            pixel.0 = pixel.0.map(|v| v / 2 + 40);
        }

        let a = hasher.hash_image(&original).unwrap();
        let b = hasher.hash_image(&DynamicImage::ImageRgb8(faded)).unwrap();

        assert!(a.distance(&b) <= 5);
    }

    #[test]
    fn flat_images_hash_without_error() {
        let hasher = PerceptualHasher::new();
        assert!(hasher.hash_image(&solid(128, 128, 128)).is_ok());
    }

    #[test]
    fn kind_returns_perceptual() {
        assert_eq!(PerceptualHasher::new().kind(), HashAlgorithmKind::Perceptual);
    }
}
