//! Extension and hidden-file filtering for the walker.

use super::{ImageFormat, SUPPORTED_EXTENSIONS};
use std::collections::HashSet;
use std::path::Path;

/// Decides which walked files are images worth hashing
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// Lowercase extensions, without the dot
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl ImageFilter {
    /// Accept the default extension set, hidden files included
    pub fn new() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: true,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the accepted extensions. Leading dots and case are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn includes_hidden(&self) -> bool {
        self.include_hidden
    }

    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Get the image format for a path
    pub fn get_format(&self, path: &Path) -> ImageFormat {
        path.extension()
            .and_then(|e| e.to_str())
            .map(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Dotfile convention; `.` and `..` are not hidden
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.') && name != "." && name != "..")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_supported_extensions_any_case() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/image.Png")));
        assert!(filter.should_include(Path::new("/photos/image.webp")));
    }

    #[test]
    fn filter_excludes_everything_else() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/IMG_1234.HEIC")));
        assert!(!filter.should_include(Path::new("/photos/anim.gif")));
        assert!(!filter.should_include(Path::new("/photos/jpg")));
    }

    #[test]
    fn filter_includes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_can_exclude_hidden() {
        let filter = ImageFilter::new().with_hidden(false);
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpg")));
        assert!(filter.should_include(Path::new("/photos/visible.jpg")));
    }

    #[test]
    fn custom_extensions_are_normalised() {
        let filter = ImageFilter::new().with_extensions([".PNG", "gif", ""]);
        assert_eq!(filter.extension_count(), 2);
        assert!(filter.should_include(Path::new("/a/b.png")));
        assert!(filter.should_include(Path::new("/a/b.GIF")));
        assert!(!filter.should_include(Path::new("/a/b.jpg")));
    }

    #[test]
    fn hidden_detection() {
        assert!(is_hidden(Path::new("/a/.git")));
        assert!(!is_hidden(Path::new("/a/git")));
        assert!(!is_hidden(Path::new(".")));
    }
}
