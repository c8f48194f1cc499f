//! Request handling boundary.
//!
//! [`ImageService::handle`] takes a raw request path and returns the cached
//! artifact to serve, computing it on a miss:
//!
//! 1. parse the path (unknown format rejects first)
//! 2. look the exact path up in the cache; a hit returns immediately
//! 3. resolve the identifier inside the media root
//! 4. decode, run the transform pipeline, encode and publish
//!
//! A hit never touches the media root, so a cached artifact stays servable
//! after its source is removed.
//!
//! The artifact is served straight from its cache path, so a miss costs one
//! write and no re-read.
//!
//! Every failure collapses to one of four [`RequestError`] categories, all
//! reported to clients with the same status. The specific cause is logged
//! here and carried in the error text, never in the status.

use crate::cache::{self, CacheError, CacheStore};
use crate::format::OutputFormat;
use crate::imaging::{Dimensions, ImageBackend, transform};
use crate::info::{ImageInfo, InfoSettings};
use crate::request::{self, ImageRequest, ParseError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// `Cache-Control: max-age` for served artifacts, in seconds.
pub const CACHE_MAX_AGE_SECS: u32 = 100;

/// `Access-Control-Allow-Origin` value for every response.
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// Status for every rejected request.
pub const CLIENT_ERROR_STATUS: u16 = 400;

/// Terminal request failures. None are retried.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("source not found: {0}")]
    SourceNotFound(String),
    #[error("cache write failed: {0}")]
    CacheWriteFailure(String),
}

impl RequestError {
    /// HTTP status for this error. Identical for every category.
    pub fn status(&self) -> u16 {
        CLIENT_ERROR_STATUS
    }
}

impl From<ParseError> for RequestError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Format(e) => Self::InvalidFormat(e.to_string()),
            ParseError::Malformed(_) => Self::InvalidCommand(err.to_string()),
            ParseError::Identifier(_) => Self::SourceNotFound(err.to_string()),
        }
    }
}

impl From<CacheError> for RequestError {
    fn from(err: CacheError) -> Self {
        Self::CacheWriteFailure(err.to_string())
    }
}

/// A cached artifact ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Whether the artifact already existed before this request.
    pub cache_hit: bool,
}

impl Artifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Serves image requests from a media root through a cache.
pub struct ImageService<B: ImageBackend> {
    backend: B,
    media_root: PathBuf,
    cache: CacheStore,
}

impl<B: ImageBackend> ImageService<B> {
    pub fn new(backend: B, media_root: impl Into<PathBuf>, cache: CacheStore) -> Self {
        Self {
            backend,
            media_root: media_root.into(),
            cache,
        }
    }

    /// Resolve `request_path` to an artifact, rendering it on a cache miss.
    pub fn handle(&self, request_path: &str) -> Result<Artifact, RequestError> {
        self.render(request_path).inspect_err(|e| {
            warn!(path = request_path, error = %e, "request rejected");
        })
    }

    fn render(&self, request_path: &str) -> Result<Artifact, RequestError> {
        let request = ImageRequest::parse(request_path)?;

        let key = cache::key_for(request.key().as_str());
        if let Some(path) = self.cache.lookup(&key) {
            return Ok(Artifact {
                path,
                format: request.format,
                cache_hit: true,
            });
        }

        let source = self.resolve(&request.identifier)?;
        let image = self
            .backend
            .decode(&source)
            .map_err(|e| RequestError::SourceNotFound(format!("{}: {e}", request.identifier)))?;
        debug!(
            identifier = %request.identifier,
            dims = ?Dimensions::of(&image).as_tuple(),
            "decoded"
        );

        let derived = transform(&self.backend, image, &request.commands())
            .map_err(|e| RequestError::InvalidCommand(e.to_string()))?;

        let path = self
            .cache
            .insert(&key, &derived, request.format, &self.backend)?;

        Ok(Artifact {
            path,
            format: request.format,
            cache_hit: false,
        })
    }

    /// Image information document for `identifier`.
    pub fn info(&self, identifier: &str, settings: &InfoSettings) -> Result<ImageInfo, RequestError> {
        self.describe(identifier, settings).inspect_err(|e| {
            warn!(identifier, error = %e, "info rejected");
        })
    }

    fn describe(&self, identifier: &str, settings: &InfoSettings) -> Result<ImageInfo, RequestError> {
        let source = self.resolve(identifier)?;
        let dims = self
            .backend
            .identify(&source)
            .map_err(|e| RequestError::SourceNotFound(format!("{identifier}: {e}")))?;
        Ok(ImageInfo::new(identifier, dims, settings))
    }

    fn resolve(&self, identifier: &str) -> Result<PathBuf, RequestError> {
        request::validate_identifier(identifier)?;
        let path = self.media_root.join(identifier);
        if !path.is_file() {
            return Err(RequestError::SourceNotFound(identifier.to_string()));
        }
        Ok(path)
    }
}
