//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while a scan runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory traversal events
    Scan(ScanEvent),
    /// Per-file fingerprinting events
    Hash(HashEvent),
    /// First-match decisions
    Match(MatchEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during directory traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Traversal has started
    Started { root: PathBuf },
    /// Entered another directory
    Progress(ScanProgress),
    /// A file with a supported extension was found
    PhotoFound { path: PathBuf },
    /// An entry below the root could not be read; traversal continues
    Error { path: PathBuf, message: String },
    /// Traversal completed
    Completed { total_photos: usize },
}

/// Progress information during traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories entered so far
    pub directories_scanned: usize,
    /// Number of qualifying files found so far
    pub photos_found: usize,
    /// Directory being entered
    pub current_path: PathBuf,
}

/// Events during fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Fingerprinting has started
    Started { total_photos: usize },
    /// One more file was fingerprinted (successfully or not)
    Progress(HashProgress),
    /// A file could not be decoded and was skipped
    Error { path: PathBuf, message: String },
    /// Fingerprinting completed
    Completed { total_hashed: usize, failed: usize },
}

/// Progress information during fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Files processed so far, in traversal order
    pub completed: usize,
    /// Total number of qualifying files
    pub total: usize,
    /// File just processed
    pub current_path: PathBuf,
}

/// Events from the first-match reduction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A file became a new representative
    RepresentativeAdded { path: PathBuf },
    /// A file matched an earlier representative
    DuplicateFound {
        original: PathBuf,
        duplicate: PathBuf,
        distance: u32,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled; pairs found so far are kept
    Cancelled { pairs_found: usize },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Matching,
}

/// Summary of a finished scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Qualifying files found by the traversal
    pub total_photos: usize,
    /// Files kept as representatives
    pub representatives: usize,
    /// Duplicate pairs emitted
    pub duplicate_pairs: usize,
    /// Files skipped because they could not be fingerprinted
    pub skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Matching => write!(f, "Matching"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Match(MatchEvent::DuplicateFound {
            original: PathBuf::from("/photos/a.jpg"),
            duplicate: PathBuf::from("/photos/a_small.jpg"),
            distance: 2,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Match(MatchEvent::DuplicateFound { distance, .. }) => {
                assert_eq!(distance, 2);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            total_photos: 1000,
            representatives: 940,
            duplicate_pairs: 60,
            skipped: 3,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"duplicate_pairs\":60"));
    }

    #[test]
    fn phase_display() {
        assert_eq!(PipelinePhase::Scanning.to_string(), "Scanning");
        assert_eq!(PipelinePhase::Matching.to_string(), "Matching");
    }
}
