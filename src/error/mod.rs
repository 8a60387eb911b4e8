//! # Error Module
//!
//! Error types for the duplicate photo finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures are local** - a [`DecodeError`] skips one file,
//!   only [`DirectoryError`] and [`ConfigError`] abort a scan

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors about the scan root. Always fatal.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DirectoryError {
    /// Classify an I/O failure on `path`
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => DirectoryError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => DirectoryError::PermissionDenied { path },
            _ => DirectoryError::Unreadable { path, source },
        }
    }
}

/// Errors that occur while turning one image file into a fingerprint
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

impl DecodeError {
    /// Attach a path to an error raised before the path was known
    /// (resizing and hashing work on in-memory images).
    pub fn with_path(self, path: PathBuf) -> Self {
        match self {
            DecodeError::Decode { reason, .. } => DecodeError::Decode { path, reason },
            DecodeError::EmptyImage { .. } => DecodeError::EmptyImage { path },
            DecodeError::ComputationFailed(reason) => DecodeError::Decode { path, reason },
            io @ DecodeError::Io { .. } => io,
        }
    }
}

/// Invalid scan configuration, rejected before any traversal
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid threshold: {value} (must be 0-64)")]
    InvalidThreshold { value: u32 },

    #[error("No image extensions configured")]
    NoExtensions,

    #[error("Invalid batch size: {value} (must be at least 1)")]
    InvalidBatchSize { value: usize },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_error_includes_path() {
        let error = DirectoryError::NotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn decode_error_includes_path() {
        let error = DecodeError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn threshold_error_mentions_range() {
        let error = ConfigError::InvalidThreshold { value: 65 };
        let message = error.to_string();
        assert!(message.contains("65"));
        assert!(message.contains("0-64"));
    }

    #[test]
    fn io_errors_are_classified() {
        let path = PathBuf::from("/locked");
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            DirectoryError::from_io(path.clone(), denied),
            DirectoryError::PermissionDenied { .. }
        ));

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            DirectoryError::from_io(path, missing),
            DirectoryError::NotFound { .. }
        ));
    }

    #[test]
    fn with_path_fills_in_missing_path() {
        let error = DecodeError::EmptyImage {
            path: PathBuf::new(),
        }
        .with_path(PathBuf::from("/photos/tiny.png"));
        assert!(error.to_string().contains("/photos/tiny.png"));
    }

    #[test]
    fn top_level_wraps_components() {
        let error: DuplicateFinderError = ConfigError::NoExtensions.into();
        assert!(error.to_string().starts_with("Configuration error"));
    }
}
