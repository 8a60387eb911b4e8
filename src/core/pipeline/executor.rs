//! Pipeline execution implementation.

use super::CancellationToken;
use crate::core::hasher::{Fingerprint, HashAlgorithm, HashAlgorithmKind, HasherConfig};
use crate::core::matcher::{DuplicatePair, FirstMatchIndex, MatchOutcome, Threshold};
use crate::core::scanner::{PhotoFile, PhotoScanner, ScanConfig, SkippedFile, WalkDirScanner};
use crate::error::{ConfigError, DecodeError, DuplicateFinderError};
use crate::events::{
    null_sender, Event, EventSender, HashEvent, HashProgress, MatchEvent, PipelineEvent,
    PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Files hashed per parallel batch
const DEFAULT_BATCH_SIZE: usize = 64;

/// Result of pipeline execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Duplicate pairs in the order they were found
    pub pairs: Vec<DuplicatePair>,
    /// Qualifying files found by the walk
    pub total_photos: usize,
    /// Files kept as the first of their cluster
    pub representatives: usize,
    /// Files that could not be hashed or walked (non-fatal)
    pub skipped: Vec<SkippedFile>,
    /// Whether the run stopped early; `pairs` are still valid
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ScanReport {
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_photos: self.total_photos,
            representatives: self.representatives,
            duplicate_pairs: self.pairs.len(),
            skipped: self.skipped.len(),
            duration_ms: self.duration_ms,
        }
    }

    /// Same scan outcome, ignoring timing
    pub fn same_outcome(&self, other: &ScanReport) -> bool {
        self.pairs == other.pairs
            && self.total_photos == other.total_photos
            && self.representatives == other.representatives
            && self.skipped == other.skipped
            && self.cancelled == other.cancelled
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Hash algorithm to use
    pub algorithm: HashAlgorithmKind,
    /// Maximum Hamming distance for a match, validated at build time
    pub threshold: u32,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// Hash batches on the rayon pool
    pub parallel: bool,
    /// Files per hashing batch
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            algorithm: HashAlgorithmKind::Perceptual,
            threshold: Threshold::DEFAULT,
            scan_config: ScanConfig::default(),
            parallel: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    cancel: Option<CancellationToken>,
    scanner: Option<Box<dyn PhotoScanner>>,
    hasher: Option<Box<dyn HashAlgorithm>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to scan
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the comparison threshold (lower = stricter)
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Follow symbolic links to directories
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan_config.follow_symlinks = follow;
        self
    }

    /// Hash on the rayon pool (default) or on the calling thread
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Use a caller-held token so the run can be cancelled from outside
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Discover files with `scanner` instead of walking `scan_config`.
    ///
    /// The scanner only sees the pipeline's token if it was given one.
    pub fn scanner(mut self, scanner: impl PhotoScanner + 'static) -> Self {
        self.scanner = Some(Box::new(scanner));
        self
    }

    /// Fingerprint with `hasher` instead of the one `algorithm` selects
    pub fn hasher(mut self, hasher: impl HashAlgorithm + 'static) -> Self {
        self.config.algorithm = hasher.kind();
        self.hasher = Some(Box::new(hasher));
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        let threshold = Threshold::new(self.config.threshold)?;
        self.config.scan_config.validate()?;

        if self.config.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize { value: 0 });
        }

        let cancel = self.cancel.unwrap_or_default();
        let scanner = match self.scanner {
            Some(scanner) => scanner,
            None => Box::new(
                WalkDirScanner::new(self.config.scan_config.clone())
                    .with_cancellation(cancel.clone()),
            ),
        };
        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => HasherConfig::new().algorithm(self.config.algorithm).build(),
        };

        Ok(Pipeline {
            config: self.config,
            threshold,
            cancel,
            scanner,
            hasher,
        })
    }
}

/// The duplicate detection pipeline
pub struct Pipeline {
    config: PipelineConfig,
    threshold: Threshold,
    cancel: CancellationToken,
    scanner: Box<dyn PhotoScanner>,
    hasher: Box<dyn HashAlgorithm>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// A handle that cancels this pipeline's runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<ScanReport, DuplicateFinderError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<ScanReport, DuplicateFinderError> {
        let start_time = Instant::now();
        let root = &self.config.root;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let walk = self.scanner.scan_with_events(root, events)?;

        let photos = walk.photos;
        let total_photos = photos.len();
        let mut skipped = walk.errors;

        tracing::debug!(
            "Found {} candidate files in {} directories under {}",
            total_photos,
            walk.directories_scanned,
            root.display()
        );

        // Phase 2: Hashing and matching
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Matching,
        }));
        events.send(Event::Hash(HashEvent::Started { total_photos }));

        let mut index = FirstMatchIndex::new(self.threshold);
        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut cancelled = walk.cancelled;

        'batches: for batch in photos.chunks(self.config.batch_size) {
            if cancelled {
                break;
            }

            let fingerprints = self.hash_batch(batch);

            for (photo, fingerprint) in batch.iter().zip(fingerprints) {
                let fingerprint = match fingerprint {
                    Some(fingerprint) => fingerprint,
                    None => {
                        cancelled = true;
                        break 'batches;
                    }
                };

                processed += 1;
                events.send(Event::Hash(HashEvent::Progress(HashProgress {
                    completed: processed,
                    total: total_photos,
                    current_path: photo.path.clone(),
                })));

                match fingerprint {
                    Ok(fingerprint) => Self::record_match(&mut index, photo, fingerprint, events),
                    Err(e) => {
                        failed += 1;
                        tracing::warn!("Skipping {}: {}", photo.path.display(), e);
                        events.send(Event::Hash(HashEvent::Error {
                            path: photo.path.clone(),
                            message: e.to_string(),
                        }));
                        skipped.push(SkippedFile::new(photo.path.clone(), e));
                    }
                }
            }
        }

        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: processed - failed,
            failed,
        }));

        let representatives = index.representatives().len();
        let comparisons = index.comparisons();
        let pairs = index.into_pairs();
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let report = ScanReport {
            pairs,
            total_photos,
            representatives,
            skipped,
            cancelled,
            duration_ms,
        };

        if cancelled {
            tracing::info!(
                "Scan of {} cancelled after {} of {} files; {} pairs so far",
                root.display(),
                processed,
                total_photos,
                report.pairs.len()
            );
            events.send(Event::Pipeline(PipelineEvent::Cancelled {
                pairs_found: report.pairs.len(),
            }));
        } else {
            tracing::debug!("{} fingerprint comparisons", comparisons);
            tracing::info!(
                "Scanned {} files under {}: {} representatives, {} duplicates, {} skipped in {}ms",
                total_photos,
                root.display(),
                representatives,
                report.pairs.len(),
                report.skipped.len(),
                duration_ms
            );
            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: report.summary(),
            }));
        }

        Ok(report)
    }

    /// Hash one batch, preserving input order.
    ///
    /// `None` marks a file reached after cancellation. Files are hashed
    /// independently, so a `None` may be followed by results that finished
    /// on other workers; the caller stops at the first `None`.
    fn hash_batch(&self, batch: &[PhotoFile]) -> Vec<Option<Result<Fingerprint, DecodeError>>> {
        let hash_one = |photo: &PhotoFile| {
            if self.cancel.is_cancelled() {
                None
            } else {
                Some(self.hash_guarded(&photo.path))
            }
        };

        if self.config.parallel {
            batch.par_iter().map(hash_one).collect()
        } else {
            batch.iter().map(hash_one).collect()
        }
    }

    /// Hash one file, turning a decoder panic into a [`DecodeError`] so it
    /// only costs that file
    fn hash_guarded(&self, path: &Path) -> Result<Fingerprint, DecodeError> {
        let hasher = self.hasher.as_ref();
        let result = panic::catch_unwind(AssertUnwindSafe(|| hasher.hash_file(path)));
        result.unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!("Hashing {} panicked: {}", path.display(), message);
            Err(DecodeError::Decode {
                path: path.to_path_buf(),
                reason: format!("decoder panicked: {}", message),
            })
        })
    }

    fn record_match(
        index: &mut FirstMatchIndex,
        photo: &PhotoFile,
        fingerprint: Fingerprint,
        events: &EventSender,
    ) {
        match index.offer(photo.path.clone(), fingerprint) {
            MatchOutcome::Representative => {
                tracing::debug!("New representative {} ({})", photo.path.display(), fingerprint);
                events.send(Event::Match(MatchEvent::RepresentativeAdded {
                    path: photo.path.clone(),
                }));
            }
            MatchOutcome::Duplicate(pair) => {
                tracing::debug!(
                    "{} duplicates {} (distance {})",
                    pair.duplicate.display(),
                    pair.original.display(),
                    pair.distance
                );
                events.send(Event::Match(MatchEvent::DuplicateFound {
                    original: pair.original,
                    duplicate: pair.duplicate,
                    distance: pair.distance,
                }));
            }
        }
    }
}
