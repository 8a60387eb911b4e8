//! The representative set and the first-match decision.

use super::{DuplicatePair, Threshold};
use crate::core::hasher::Fingerprint;
use std::path::{Path, PathBuf};

/// A file that was kept as the first of its visual cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representative {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
}

/// Insertion-ordered fingerprint → path mapping.
///
/// Only grows. Entries are never replaced or reordered, so the first file of
/// a cluster stays its representative for the rest of the scan.
#[derive(Debug, Default, Clone)]
pub struct RepresentativeSet {
    entries: Vec<Representative>,
}

impl RepresentativeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fingerprint: Fingerprint, path: PathBuf) {
        self.entries.push(Representative { fingerprint, path });
    }

    /// First entry, in insertion order, within `threshold` of `fingerprint`.
    ///
    /// Also returns the number of entries compared, which is the position of
    /// the match plus one, or the set size when nothing matched.
    pub fn first_within(
        &self,
        fingerprint: &Fingerprint,
        threshold: Threshold,
    ) -> (Option<(&Representative, u32)>, usize) {
        for (compared, entry) in self.entries.iter().enumerate() {
            let distance = entry.fingerprint.distance(fingerprint);
            if threshold.accepts(distance) {
                return (Some((entry, distance)), compared + 1);
            }
        }
        (None, self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Representative> {
        self.entries.iter()
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }
}

/// What happened to one offered file
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// No representative was close enough; the file became one
    Representative,
    /// The file matched an earlier representative
    Duplicate(DuplicatePair),
}

/// Sequential first-match reduction over fingerprints in traversal order.
///
/// Owned by a single scan. Feed files with [`FirstMatchIndex::offer`] in
/// traversal order; the pairs come out in the order they were found.
#[derive(Debug, Clone)]
pub struct FirstMatchIndex {
    threshold: Threshold,
    representatives: RepresentativeSet,
    pairs: Vec<DuplicatePair>,
    comparisons: u64,
}

impl FirstMatchIndex {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            representatives: RepresentativeSet::new(),
            pairs: Vec::new(),
            comparisons: 0,
        }
    }

    /// Compare against every representative in insertion order. The first
    /// one within the threshold claims the file and comparison stops;
    /// otherwise the file joins the set.
    pub fn offer(&mut self, path: PathBuf, fingerprint: Fingerprint) -> MatchOutcome {
        let (found, compared) = self
            .representatives
            .first_within(&fingerprint, self.threshold);
        self.comparisons += compared as u64;

        match found {
            Some((representative, distance)) => {
                let pair = DuplicatePair::new(
                    representative.path.clone(),
                    path,
                    distance,
                    self.threshold.classify(distance),
                );
                self.pairs.push(pair.clone());
                MatchOutcome::Duplicate(pair)
            }
            None => {
                self.representatives.insert(fingerprint, path);
                MatchOutcome::Representative
            }
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn pairs(&self) -> &[DuplicatePair] {
        &self.pairs
    }

    pub fn representatives(&self) -> &RepresentativeSet {
        &self.representatives
    }

    /// Fingerprint comparisons made so far
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn into_pairs(self) -> Vec<DuplicatePair> {
        self.pairs
    }
}
