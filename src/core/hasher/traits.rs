//! Fingerprint value type and the hashing trait.

use super::fast_decode::FastDecoder;
use crate::error::DecodeError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A 64-bit perceptual fingerprint.
///
/// Immutable, compared with Hamming distance. Two fingerprints are equal
/// exactly when their bit patterns are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Width of every fingerprint in bits
    pub const BITS: u32 = 64;

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Pack a bit sequence, first bit into the most significant position.
    ///
    /// Callers supply exactly [`Fingerprint::BITS`] bits; extra bits are ignored.
    pub fn from_bit_iter<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let (value, count) = bits
            .into_iter()
            .take(Self::BITS as usize)
            .fold((0u64, 0u32), |(acc, n), bit| ((acc << 1) | bit as u64, n + 1));
        debug_assert_eq!(count, Self::BITS, "fingerprint needs exactly 64 bits");
        Self(value)
    }

    /// Build from 8 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let array: [u8; 8] = bytes.try_into().map_err(|_| {
            DecodeError::ComputationFailed(format!(
                "expected 8 hash bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(u64::from_be_bytes(array)))
    }

    /// Hamming distance: number of differing bits (0..=64)
    pub fn distance(&self, other: &Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity(&self, other: &Self) -> f64 {
        (1.0 - self.distance(other) as f64 / Self::BITS as f64) * 100.0
    }

    /// 16 lowercase hex digits
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 16 {
            return None;
        }
        u64::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithmKind {
    /// Perceptual Hash (pHash) - DCT-based, robust to resizing and recompression
    #[default]
    Perceptual,
    /// Difference Hash (dHash) - Compares brightness gradients between pixels
    Difference,
    /// Average Hash (aHash) - Compares pixels against mean brightness
    Average,
}

impl HashAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT low frequencies thresholded at their median"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Compares each pixel against the mean brightness"
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Average => write!(f, "aHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a fingerprint from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, DecodeError>;

    /// Compute a fingerprint directly from a file path.
    ///
    /// Decodes with [`FastDecoder`] (zune-jpeg for JPEG, image crate
    /// otherwise) and reports failures against `path`.
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, DecodeError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
            .map_err(|e| e.with_path(path.to_path_buf()))
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}
