//! # Matcher Module
//!
//! Decides, file by file, whether a fingerprint is a duplicate of an
//! earlier representative or a new representative itself.
//!
//! ## First Match Wins
//! Each new fingerprint is compared with the representatives in the order
//! they were added. The first one within the threshold claims the file and
//! comparison stops there, even if a later representative is closer. A
//! claimed file never becomes a representative, so it is never compared
//! against again. The result is intentionally not a transitive clustering:
//! two files far apart can both pair with, or chain through, a third.
//!
//! Cost is O(files x representatives) distance computations.
//!
//! ## Match Types
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact         |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11+      | Loose         |

mod index;
mod threshold;

pub use index::{FirstMatchIndex, MatchOutcome, Representative, RepresentativeSet};
pub use threshold::Threshold;

use crate::core::hasher::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// (original, duplicate): the earlier representative and the later file
/// that matched it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub original: PathBuf,
    pub duplicate: PathBuf,
    /// Hamming distance between the two fingerprints
    pub distance: u32,
    pub match_type: MatchType,
}

impl DuplicatePair {
    pub fn new(
        original: PathBuf,
        duplicate: PathBuf,
        distance: u32,
        match_type: MatchType,
    ) -> Self {
        Self {
            original,
            duplicate,
            distance,
            match_type,
        }
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity_percent(&self) -> f64 {
        (1.0 - self.distance as f64 / Fingerprint::BITS as f64) * 100.0
    }

    /// The pair as plain strings, the shape review front-ends consume
    pub fn to_string_pair(&self) -> (String, String) {
        (
            self.original.to_string_lossy().into_owned(),
            self.duplicate.to_string_lossy().into_owned(),
        )
    }
}

/// Classification of match types, for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely duplicates
    Similar,
    /// Distance 11+, only reported with a permissive threshold
    Loose,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            _ => MatchType::Loose,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::Loose => write!(f, "Loosely Similar"),
        }
    }
}

/// Run the first-match reduction over already-computed fingerprints,
/// in the given order.
pub fn find_pairs<I>(fingerprints: I, threshold: Threshold) -> Vec<DuplicatePair>
where
    I: IntoIterator<Item = (PathBuf, Fingerprint)>,
{
    let mut index = FirstMatchIndex::new(threshold);
    for (path, fingerprint) in fingerprints {
        index.offer(path, fingerprint);
    }
    index.into_pairs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(bits: &[u64]) -> Vec<(PathBuf, Fingerprint)> {
        bits.iter()
            .enumerate()
            .map(|(i, b)| (PathBuf::from(format!("/{}.jpg", i)), Fingerprint::from_bits(*b)))
            .collect()
    }

    #[test]
    fn match_type_from_distance() {
        assert_eq!(MatchType::from_distance(0), MatchType::Exact);
        assert_eq!(MatchType::from_distance(3), MatchType::NearExact);
        assert_eq!(MatchType::from_distance(7), MatchType::Similar);
        assert_eq!(MatchType::from_distance(15), MatchType::Loose);
    }

    #[test]
    fn find_pairs_empty_input() {
        assert!(find_pairs(Vec::new(), Threshold::default()).is_empty());
    }

    #[test]
    fn find_pairs_single_photo() {
        assert!(find_pairs(photos(&[0xFF]), Threshold::default()).is_empty());
    }

    #[test]
    fn find_pairs_reports_in_emission_order() {
        // 0 and 2 are a cluster, 1 and 3 another
        let pairs = find_pairs(
            photos(&[0x0, u64::MAX, 0x1, u64::MAX - 1]),
            Threshold::default(),
        );

        let shape: Vec<_> = pairs
            .iter()
            .map(|p| (p.original.clone(), p.duplicate.clone()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (PathBuf::from("/0.jpg"), PathBuf::from("/2.jpg")),
                (PathBuf::from("/1.jpg"), PathBuf::from("/3.jpg")),
            ]
        );
    }

    #[test]
    fn several_duplicates_share_one_original() {
        let pairs = find_pairs(photos(&[0, 1, 2, 3]), Threshold::new(2).unwrap());
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.original == PathBuf::from("/0.jpg")));
    }

    #[test]
    fn pair_renders_as_strings() {
        let pair = DuplicatePair::new("/a.jpg".into(), "/b.jpg".into(), 16, MatchType::Loose);
        assert_eq!(
            pair.to_string_pair(),
            ("/a.jpg".to_string(), "/b.jpg".to_string())
        );
        assert_eq!(pair.similarity_percent(), 75.0);
    }
}
