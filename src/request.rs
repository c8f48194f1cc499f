//! Request path parsing.
//!
//! An image request path has five segments:
//!
//! ```text
//! /<identifier>/<region>/<size>/<rotation>/<quality>.<format>
//! ```
//!
//! The last segment splits on its final `.`. The format tag is checked before
//! anything else, so an unknown format rejects even when the rest of the path
//! is also malformed. The command strings are kept raw here; they are parsed
//! by the pipeline against the image as it is transformed.
//!
//! Identifiers name files directly inside the media root. Anything that could
//! name a file elsewhere (path separators, `.`, `..`) or nothing at all is
//! refused.

use crate::format::{OutputFormat, UnknownFormat};
use crate::imaging::Commands;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Format(#[from] UnknownFormat),
    #[error("expected /<identifier>/<region>/<size>/<rotation>/<quality>.<format>, got {0:?}")]
    Malformed(String),
    #[error("identifier {0:?} does not name a file in the media root")]
    Identifier(String),
}

/// The exact request path, used as the cache identity.
///
/// Not normalized: two paths that differ in any byte are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    key: RequestKey,
    pub identifier: String,
    pub region: String,
    pub size: String,
    pub rotation: String,
    pub quality: String,
    pub format: OutputFormat,
}

impl ImageRequest {
    pub fn parse(path: &str) -> Result<Self, ParseError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);

        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let (quality, tag) = last
            .rsplit_once('.')
            .ok_or_else(|| UnknownFormat(String::new()))?;
        let format: OutputFormat = tag.parse()?;

        // The identifier is whatever precedes the four command segments, so a
        // separator inside it is caught by the identifier check below.
        let mut segments = trimmed.rsplitn(5, '/').skip(1);
        let (Some(rotation), Some(size), Some(region), Some(identifier)) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(ParseError::Malformed(path.to_string()));
        };

        validate_identifier(identifier)?;

        Ok(Self {
            key: RequestKey(path.to_string()),
            identifier: identifier.to_string(),
            region: region.to_string(),
            size: size.to_string(),
            rotation: rotation.to_string(),
            quality: quality.to_string(),
            format,
        })
    }

    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    pub fn commands(&self) -> Commands<'_> {
        Commands {
            region: &self.region,
            size: &self.size,
            rotation: &self.rotation,
            quality: &self.quality,
        }
    }
}

/// Refuse identifiers that do not name exactly one entry of the media root.
pub fn validate_identifier(identifier: &str) -> Result<(), ParseError> {
    let escapes = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains(['/', '\\', '\0']);
    if escapes {
        return Err(ParseError::Identifier(identifier.to_string()));
    }
    Ok(())
}
