//! # Pipeline Module
//!
//! Orchestrates one duplicate scan from root directory to ordered pairs.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Walk the root and collect qualifying files in traversal order
//! 2. **Match** - Hash each file and run the first-match decision
//!
//! ## Parallelism
//! Files are hashed in batches on rayon's pool. Each batch is collected in
//! input order and then reduced sequentially, so a parallel run returns
//! exactly what a sequential run returns.
//!
//! ## Cancellation
//! A [`CancellationToken`] is checked between files. A cancelled run still
//! returns the pairs found up to that point.

mod cancel;
mod executor;

pub use cancel::CancellationToken;
pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, ScanReport};
