//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{PhotoFile, PhotoScanner, SkippedFile, WalkResult};
use crate::core::pipeline::CancellationToken;
use crate::error::{ConfigError, DirectoryError};
use crate::events::{null_sender, Event, EventSender, ScanEvent, ScanProgress};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links to directories
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = jpg, jpeg, png, webp)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            extensions: None,
        }
    }
}

impl ScanConfig {
    /// Reject configurations that could never match a file
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.extensions {
            Some(list) if list.iter().all(|e| e.trim_start_matches('.').is_empty()) => {
                Err(ConfigError::NoExtensions)
            }
            _ => Ok(()),
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
    cancel: CancellationToken,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions);
        }

        Self {
            config,
            filter,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop walking, between entries, once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Files before directories, then by name
    fn traversal_order(a: &DirEntry, b: &DirEntry) -> Ordering {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    }

    /// The root must exist, be a directory, and be listable
    fn check_root(root: &Path) -> Result<(), DirectoryError> {
        let metadata =
            fs::metadata(root).map_err(|e| DirectoryError::from_io(root.to_path_buf(), e))?;

        if !metadata.is_dir() {
            return Err(DirectoryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        fs::read_dir(root).map_err(|e| DirectoryError::from_io(root.to_path_buf(), e))?;
        Ok(())
    }

    fn walk(&self, root: &Path, events: &EventSender) -> Result<WalkResult, DirectoryError> {
        Self::check_root(root)?;

        let mut result = WalkResult::default();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by(Self::traversal_order);

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.filter.includes_hidden();
        let entries = walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry_result in entries {
            if self.cancel.is_cancelled() {
                tracing::debug!(
                    "Walk of {} cancelled after {} files",
                    root.display(),
                    result.photos.len()
                );
                result.cancelled = true;
                break;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());

                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk failed at root"));
                        return Err(DirectoryError::from_io(path, source));
                    }

                    tracing::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: path.clone(),
                        message: e.to_string(),
                    }));
                    result.errors.push(SkippedFile::new(path, e));
                    continue;
                }
            };

            let path = entry.path();

            if entry.file_type().is_dir() {
                result.directories_scanned += 1;
                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    directories_scanned: result.directories_scanned,
                    photos_found: result.photos.len(),
                    current_path: path.to_path_buf(),
                })));
                continue;
            }

            if !self.filter.should_include(path) {
                continue;
            }

            // Follows symlinks: a dangling link is skipped here, a link to an
            // image is scanned like the image
            match fs::metadata(path) {
                Ok(_) => {
                    events.send(Event::Scan(ScanEvent::PhotoFound {
                        path: path.to_path_buf(),
                    }));

                    result.photos.push(PhotoFile {
                        path: path.to_path_buf(),
                        format: self.filter.get_format(path),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }));
                    result.errors.push(SkippedFile::new(path, e));
                }
            }
        }

        Ok(result)
    }
}

impl PhotoScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<WalkResult, DirectoryError> {
        self.walk(root, &null_sender())
    }

    fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<WalkResult, DirectoryError> {
        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let result = self.walk(root, events)?;

        events.send(Event::Scan(ScanEvent::Completed {
            total_photos: result.photos.len(),
        }));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::ImageFormat;
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    fn names(result: &WalkResult, root: &Path) -> Vec<String> {
        result
            .photos
            .iter()
            .map(|p| p.path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.photos.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.directories_scanned, 1);
    }

    #[test]
    fn scan_detects_supported_formats_only() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.jpg");
        touch(temp_dir.path(), "photo.PNG");
        touch(temp_dir.path(), "photo.webp");
        touch(temp_dir.path(), "photo.heic");
        touch(temp_dir.path(), "notes.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let formats: Vec<_> = result.photos.iter().map(|p| p.format).collect();
        assert_eq!(
            formats,
            vec![ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP]
        );
    }

    #[test]
    fn files_come_before_subdirectories_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("a_dir")).unwrap();
        fs::create_dir(root.join("z_dir")).unwrap();
        touch(root, "m.jpg");
        touch(root, "b.jpg");
        touch(&root.join("z_dir"), "a.jpg");
        touch(&root.join("a_dir"), "z.jpg");
        touch(&root.join("a_dir"), "c.png");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(root).unwrap();

        assert_eq!(
            names(&result, root),
            vec!["b.jpg", "m.jpg", "a_dir/c.png", "a_dir/z.jpg", "z_dir/a.jpg"]
        );
        assert_eq!(result.directories_scanned, 3);
    }

    #[test]
    fn hidden_files_are_included_by_default() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "visible.jpg");
        touch(temp_dir.path(), ".hidden.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.photos.len(), 2);
    }

    #[test]
    fn hidden_entries_can_be_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "visible.jpg");
        touch(root, ".hidden.jpg");
        fs::create_dir(root.join(".thumbnails")).unwrap();
        touch(&root.join(".thumbnails"), "thumb.jpg");

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(root).unwrap();

        assert_eq!(names(&result, root), vec!["visible.jpg"]);
    }

    #[test]
    fn max_depth_limits_recursion() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        touch(root, "top.jpg");
        touch(&root.join("nested"), "deep.jpg");

        let config = ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(root).unwrap();

        assert_eq!(names(&result, root), vec!["top.jpg"]);
    }

    #[test]
    fn nonexistent_root_is_fatal() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(DirectoryError::NotFound { .. })));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "photo.jpg");

        let result = WalkDirScanner::new(ScanConfig::default()).scan(&file);

        assert!(matches!(result, Err(DirectoryError::NotADirectory { .. })));
    }

    #[test]
    fn cancelled_walk_stops_early() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");
        touch(temp_dir.path(), "b.jpg");

        let token = CancellationToken::new();
        token.cancel();
        let result = WalkDirScanner::new(ScanConfig::default())
            .with_cancellation(token)
            .scan(temp_dir.path())
            .unwrap();

        assert!(result.cancelled);
        assert!(result.photos.is_empty());
    }

    #[test]
    fn uncancelled_walk_is_complete() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");

        let result = WalkDirScanner::new(ScanConfig::default())
            .with_cancellation(CancellationToken::new())
            .scan(temp_dir.path())
            .unwrap();

        assert!(!result.cancelled);
        assert_eq!(result.photos.len(), 1);
    }

    #[test]
    fn empty_extension_override_is_invalid() {
        let config = ScanConfig {
            extensions: Some(vec![".".into(), "".into()]),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoExtensions));
        assert!(ScanConfig::default().validate().is_ok());
    }
}
