//! # Scanner Module
//!
//! Discovers candidate image files below a root directory.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - WebP (.webp)
//!
//! Extensions are matched case-insensitively. Anything else is skipped
//! without a diagnostic.
//!
//! ## Order
//! Within each directory, files come first (sorted by name), then
//! subdirectories (sorted by name), depth-first. The order only depends on
//! the names on disk, so repeated walks of an unchanged tree agree.
//!
//! ## Example
//! ```rust,ignore
//! use photo_duplicates::core::scanner::{WalkDirScanner, PhotoScanner, ScanConfig};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let walk = scanner.scan(Path::new("/Users/photos"))?;
//! ```

mod filter;
mod walker;

pub use filter::{is_hidden, ImageFilter};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::DirectoryError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions accepted by default, lowercase without the dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Represents a discovered photo file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoFile {
    /// Path to the photo file
    pub path: PathBuf,
    /// Format implied by the extension
    pub format: ImageFormat,
}

/// Image formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "webp" => ImageFormat::WebP,
            _ => ImageFormat::Unknown,
        }
    }

    /// Check if this format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// A file left out of a scan, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result of walking one root
#[derive(Debug, Default)]
pub struct WalkResult {
    /// Qualifying files, in traversal order
    pub photos: Vec<PhotoFile>,
    /// Entries below the root that could not be read (non-fatal)
    pub errors: Vec<SkippedFile>,
    /// Directories entered, root included
    pub directories_scanned: usize,
    /// The walk stopped early; `photos` holds what was found so far
    pub cancelled: bool,
}

/// Trait for photo scanners
///
/// The pipeline walks through this trait; [`PipelineBuilder::scanner`]
/// swaps the filesystem walker for another source (e.g., a fixed list in
/// tests).
///
/// [`PipelineBuilder::scanner`]: crate::core::pipeline::PipelineBuilder::scanner
pub trait PhotoScanner: Send + Sync {
    /// Walk `root` and return discovered photos in traversal order
    fn scan(&self, root: &Path) -> Result<WalkResult, DirectoryError>;

    /// Walk with progress reporting via events
    fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<WalkResult, DirectoryError>;
}
