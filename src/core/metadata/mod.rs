//! # Metadata Module
//!
//! Read-only details about one image, for whoever reviews the pairs.
//!
//! ## Extracted Fields
//! - File name, byte size and creation time (filesystem)
//! - Pixel dimensions (image header only, no full decode)
//! - Capture date and camera (EXIF, when present)
//!
//! EXIF is typically only found in JPEG files. Missing EXIF is not an
//! error; the EXIF fields are simply `None`.

use crate::error::DecodeError;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// What a reviewer sees under each image of a pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDetails {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    /// Creation time, falling back to modification time where the
    /// filesystem does not record creation
    pub created: Option<DateTime<Local>>,
    pub exif: ExifData,
}

impl ImageDetails {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// Get dimensions as a formatted string
    pub fn dimensions_display(&self) -> String {
        format!("{}x{} px", self.width, self.height)
    }

    /// Multi-line block, one `Label: value` per line
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Filename: {}", self.file_name),
            format!("Dimensions: {}", self.dimensions_display()),
            format!("Size: {:.1} KB", self.size_kb()),
        ];

        if let Some(created) = self.created {
            lines.push(format!("Created: {}", created.format("%a %b %e %H:%M:%S %Y")));
        }
        if let Some(taken) = self.exif.date_taken {
            lines.push(format!("Taken: {}", taken.format("%Y-%m-%d %H:%M:%S")));
        }
        if let Some(camera) = self.exif.camera_display() {
            lines.push(format!("Camera: {}", camera));
        }

        lines
    }
}

/// Extracted EXIF metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifData {
    /// Original capture date/time
    pub date_taken: Option<DateTime<Utc>>,
    /// Camera make (e.g., "Apple", "Canon")
    pub camera_make: Option<String>,
    /// Camera model (e.g., "iPhone 15 Pro")
    pub camera_model: Option<String>,
}

impl ExifData {
    /// Get a display string for the camera
    pub fn camera_display(&self) -> Option<String> {
        match (&self.camera_make, &self.camera_model) {
            (Some(make), Some(model)) => {
                // Avoid duplication like "Apple Apple iPhone"
                if model.starts_with(make.as_str()) {
                    Some(model.clone())
                } else {
                    Some(format!("{} {}", make, model))
                }
            }
            (None, Some(model)) => Some(model.clone()),
            (Some(make), None) => Some(make.clone()),
            (None, None) => None,
        }
    }
}

/// Collect details for one image.
///
/// Fails only when the file cannot be read or its header is not an image.
pub fn describe(path: &Path) -> Result<ImageDetails, DecodeError> {
    let metadata = fs::metadata(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = image::image_dimensions(path).map_err(|e| DecodeError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let created = metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .map(DateTime::<Local>::from);

    Ok(ImageDetails {
        file_name: file_name(path),
        width,
        height,
        size_bytes: metadata.len(),
        created,
        exif: read_exif(path),
    })
}

/// Details as display lines, or a short placeholder when they cannot be read
pub fn describe_lines(path: &Path) -> Vec<String> {
    match describe(path) {
        Ok(details) => details.to_lines(),
        Err(e) => {
            tracing::debug!("No details for {}: {}", path.display(), e);
            vec![
                format!("Filename: {}", file_name(path)),
                "Metadata not available".to_string(),
            ]
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract EXIF metadata from a photo file
pub fn read_exif(path: &Path) -> ExifData {
    let mut data = ExifData::default();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return data,
    };

    let mut bufreader = BufReader::new(&file);
    let exif = match Reader::new().read_from_container(&mut bufreader) {
        Ok(r) => r,
        Err(_) => return data,
    };

    if let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) {
        data.date_taken = get_string_value(&field.value).and_then(|s| parse_exif_date(&s));
    }

    if let Some(field) = exif.get_field(Tag::Make, In::PRIMARY) {
        data.camera_make = get_string_value(&field.value);
    }

    if let Some(field) = exif.get_field(Tag::Model, In::PRIMARY) {
        data.camera_model = get_string_value(&field.value);
    }

    data
}

/// EXIF date format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}
