//! # Photo Duplicates
//!
//! Finds near-duplicate photos in a directory tree.
//!
//! ## How It Works
//! Every qualifying image is reduced to a 64-bit perceptual fingerprint and
//! compared, in traversal order, with the images kept so far. The first kept
//! image within the threshold claims it as a duplicate; otherwise it is kept.
//! The result is an ordered list of `(original, duplicate)` pairs.
//!
//! ## Core Philosophy
//! - **Never delete** - the engine only reports; consumers act on the pairs
//! - **Never abort on one bad file** - unreadable images are skipped
//!
//! ## Architecture
//! - `core` - The duplicate detection engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//!
//! The `photo-duplicates` binary is a thin consumer of this library.
//!
//! ## Example
//! ```rust,ignore
//! let pairs = photo_duplicates::find_duplicates("/Users/photos", 5)?;
//! for pair in pairs {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.original.display());
//! }
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use crate::core::matcher::DuplicatePair;
pub use crate::core::pipeline::{CancellationToken, Pipeline, ScanReport};
pub use error::{DuplicateFinderError, Result};

use std::path::Path;

/// Threshold used when the caller does not choose one
pub const DEFAULT_THRESHOLD: u32 = crate::core::matcher::Threshold::DEFAULT;

/// Scan `root` and return duplicate pairs in the order they were found.
///
/// Uses pHash and the default scan options. Fails before touching the
/// filesystem if `threshold` is above 64, and fails if `root` is not a
/// readable directory. Unreadable images are skipped.
pub fn find_duplicates(root: impl AsRef<Path>, threshold: u32) -> Result<Vec<DuplicatePair>> {
    let pipeline = Pipeline::builder()
        .root(root.as_ref())
        .threshold(threshold)
        .build()?;

    Ok(pipeline.run()?.pairs)
}

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// overrides `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Tracing already initialised: {}", e);
    }
}
