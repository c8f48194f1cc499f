//! Content-addressed disk cache of derived images.
//!
//! Encoding is the expensive part of serving a request, so every derived
//! image is stored once and served from disk on every later identical
//! request.
//!
//! # Design
//!
//! ## Cache keys
//!
//! The key is the SHA-256 of the **exact request path** (identifier, the four
//! raw command strings and the format tag). Two byte-identical paths share an
//! entry; paths that differ in any byte, including ones that render the same
//! pixels (`full` vs. `pct:100`), are separate entries. No normalization is
//! attempted.
//!
//! ## Storage
//!
//! One file per key directly in the cache root, named by the hex digest, with
//! no extension and no sidecar. The MIME type travels with the request, not
//! with the file.
//!
//! ## Publishing
//!
//! An entry is encoded into a temp file inside the cache root and renamed
//! onto its final name. Readers therefore see either no entry or a complete
//! one. Concurrent misses on the same key may both encode; the last rename
//! wins and both files are identical. Entries are never rewritten in place,
//! invalidated, or evicted here; size management belongs to whoever owns the
//! directory.

use crate::format::OutputFormat;
use crate::imaging::{BackendError, ImageBackend};
use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("encoding failed: {0}")]
    Encode(#[from] BackendError),
    #[error("cache write failed: {0}")]
    Io(#[from] io::Error),
}

/// Digest of one request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 of the request path, as lowercase hex.
pub fn key_for(request_path: &str) -> CacheKey {
    let digest = Sha256::digest(request_path.as_bytes());
    CacheKey(format!("{:x}", digest))
}

/// The cache directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open the cache at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the entry for `key` lives, whether or not it exists yet.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Path of the published entry for `key`, if there is one.
    pub fn lookup(&self, key: &CacheKey) -> Option<PathBuf> {
        let path = self.entry_path(key);
        if path.is_file() {
            debug!(key = %key, "cache hit");
            Some(path)
        } else {
            debug!(key = %key, "cache miss");
            None
        }
    }

    /// Encode `image` as `format` and publish it under `key`.
    ///
    /// Nothing is left behind in the cache root when encoding or writing
    /// fails.
    pub fn insert(
        &self,
        key: &CacheKey,
        image: &DynamicImage,
        format: OutputFormat,
        backend: &impl ImageBackend,
    ) -> Result<PathBuf, CacheError> {
        let bytes = backend.encode(image, format)?;
        let path = self.publish(key, &bytes)?;
        info!(key = %key, format = %format, bytes = bytes.len(), "published");
        Ok(path)
    }

    fn publish(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.entry_path(key);
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}

/// Summary of cache behavior for a batch of requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}
