//! Shared test utilities for the iiify test suite.
//!
//! Synthetic source images and isolated media/cache roots. Nothing here reads
//! checked-in fixtures: every image is generated so its exact dimensions and
//! pixel values are known to the test.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let roots = TestRoots::new();
//! roots.add_jpeg("page-1", 400, 200);
//! let service = roots.service();
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::cache::CacheStore;
use crate::imaging::RustBackend;
use crate::service::ImageService;

// =========================================================================
// Synthetic images
// =========================================================================

/// An RGB image whose red channel ramps left to right and green top to
/// bottom, so crops, flips and rotations are all observable.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.saturating_sub(1).max(1)) as u8;
        let g = (y * 255 / height.saturating_sub(1).max(1)) as u8;
        Rgb([r, g, 128])
    });
    DynamicImage::ImageRgb8(img)
}

/// Write a gradient JPEG at `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Write a gradient PNG at `path`. The extension of `path` is not consulted.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Media and cache roots
// =========================================================================

/// A temp directory holding `media/` and `cache/` roots.
///
/// The directory is removed when the value drops.
pub struct TestRoots {
    _tmp: TempDir,
    pub media: PathBuf,
    pub cache: PathBuf,
}

impl TestRoots {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let media = tmp.path().join("media");
        let cache = tmp.path().join("cache");
        std::fs::create_dir_all(&media).unwrap();
        Self {
            _tmp: tmp,
            media,
            cache,
        }
    }

    /// Add a source image under `identifier`, stored as a JPEG.
    pub fn add_jpeg(&self, identifier: &str, width: u32, height: u32) -> PathBuf {
        let path = self.media.join(identifier);
        create_test_jpeg(&path, width, height);
        path
    }

    /// Add a source image under `identifier`, stored as a PNG.
    pub fn add_png(&self, identifier: &str, width: u32, height: u32) -> PathBuf {
        let path = self.media.join(identifier);
        create_test_png(&path, width, height);
        path
    }

    /// Service over these roots with the real backend.
    pub fn service(&self) -> ImageService<RustBackend> {
        let cache = CacheStore::open(&self.cache).unwrap();
        ImageService::new(RustBackend::new(), &self.media, cache)
    }

    /// Number of entries currently published in the cache root.
    pub fn cache_entries(&self) -> usize {
        match std::fs::read_dir(&self.cache) {
            Ok(entries) => entries.filter_map(Result::ok).count(),
            Err(_) => 0,
        }
    }
}
