//! Image fixtures shared by the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

/// Coarse 8x8 grid of gray cells; `seed` selects the pattern.
pub fn pattern(seed: u32, size: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(size, size, |x, y| {
        let cell = (x * 8 / size) + 8 * (y * 8 / size);
        let v = (cell.wrapping_add(seed).wrapping_mul(2_654_435_761) >> 24) as u8;
        Rgb([v, v, v])
    }))
}

/// Save `image` under `dir`, format chosen by the extension of `name`.
pub fn save(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image.save(&path).unwrap();
    path
}

/// `image` scaled to `size` x `size`
pub fn resized(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize_exact(size, size, image::imageops::FilterType::Triangle)
}
