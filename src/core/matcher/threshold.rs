//! Validated Hamming-distance threshold.

use super::MatchType;
use crate::core::hasher::Fingerprint;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Maximum distance at which two fingerprints count as duplicates.
///
/// Always within `0..=64`, the range of distances between 64-bit
/// fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Threshold(u32);

impl Threshold {
    pub const DEFAULT: u32 = 5;
    pub const MAX: u32 = Fingerprint::BITS;

    pub fn new(value: u32) -> Result<Self, ConfigError> {
        if value > Self::MAX {
            return Err(ConfigError::InvalidThreshold { value });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Inclusive: a distance equal to the threshold is a duplicate
    pub fn accepts(self, distance: u32) -> bool {
        distance <= self.0
    }

    pub fn classify(self, distance: u32) -> MatchType {
        MatchType::from_distance(distance)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Threshold {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for u32 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
