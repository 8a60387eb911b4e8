//! # Core Module
//!
//! The presentation-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Discovers candidate images in a directory tree
//! - `hasher` - Computes 64-bit perceptual fingerprints
//! - `matcher` - First-match decision against the representative set
//! - `pipeline` - Orchestrates one scan, with events and cancellation
//! - `metadata` - Per-image details for reviewing pairs

pub mod hasher;
pub mod matcher;
pub mod metadata;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use hasher::{Fingerprint, HashAlgorithmKind};
pub use matcher::{DuplicatePair, MatchType, Threshold};
pub use metadata::ImageDetails;
pub use pipeline::{CancellationToken, Pipeline, ScanReport};
pub use scanner::PhotoFile;
