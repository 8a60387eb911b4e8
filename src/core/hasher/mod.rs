//! # Hasher Module
//!
//! Turns one image file into a 64-bit perceptual [`Fingerprint`].
//!
//! ## Supported Algorithms
//! - **pHash (Perceptual Hash)** - DCT-based, the default
//! - **dHash (Difference Hash)** - Brightness gradients, very fast
//! - **aHash (Average Hash)** - Mean brightness, fastest and least robust
//!
//! ## How It Works
//! 1. Decode the file (`zune-jpeg` for JPEG, the `image` crate otherwise)
//! 2. Reduce to a small grayscale grid
//! 3. Derive one bit per cell or coefficient
//! 4. Compare fingerprints with Hamming distance
//!
//! Hashing is a pure function of the file contents and never touches
//! other engine state, so it is safe to run on any number of threads.
//!
//! ## Example
//! ```rust,ignore
//! use photo_duplicates::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Perceptual)
//!     .build();
//!
//! let fingerprint = hasher.hash_file(&path)?;
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};

use crate::error::DecodeError;
use std::path::Path;

/// Configuration builder for hashers
#[derive(Debug, Clone, Default)]
pub struct HasherConfig {
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration (pHash)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn HashAlgorithm> {
        match self.algorithm {
            HashAlgorithmKind::Perceptual => Box::new(PerceptualHasher::new()),
            HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new()),
            HashAlgorithmKind::Average => Box::new(AverageHasher::new()),
        }
    }
}

/// Fingerprint one file with the default pHash algorithm.
pub fn hash(path: impl AsRef<Path>) -> Result<Fingerprint, DecodeError> {
    PerceptualHasher::new().hash_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_phash() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, HashAlgorithmKind::Perceptual);
    }

    #[test]
    fn build_respects_algorithm() {
        for kind in [
            HashAlgorithmKind::Perceptual,
            HashAlgorithmKind::Difference,
            HashAlgorithmKind::Average,
        ] {
            assert_eq!(HasherConfig::new().algorithm(kind).build().kind(), kind);
        }
    }

    #[test]
    fn hash_reports_unreadable_files() {
        assert!(hash("/nonexistent/photo.png").is_err());
    }
}
