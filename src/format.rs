//! Output formats a request may ask for.
//!
//! The set is fixed. Each tag (the request's file extension) maps to a codec
//! name and the MIME type the artifact is served with.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported output format: {0:?}")]
pub struct UnknownFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpg,
    Tif,
    Png,
    Gif,
    Jp2,
    Pdf,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        Self::Jpg,
        Self::Tif,
        Self::Png,
        Self::Gif,
        Self::Jp2,
        Self::Pdf,
        Self::Webp,
    ];

    /// The request extension, e.g. `jpg`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Tif => "tif",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jp2 => "jp2",
            Self::Pdf => "pdf",
            Self::Webp => "webp",
        }
    }

    /// Human-readable codec name.
    pub fn codec_name(self) -> &'static str {
        match self {
            Self::Jpg => "JPEG",
            Self::Tif => "TIFF",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Jp2 => "JPEG 2000",
            Self::Pdf => "PDF",
            Self::Webp => "WEBP",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpg => "image/jpeg",
            Self::Tif => "image/tiff",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Jp2 => "image/jp2",
            Self::Pdf => "application/pdf",
            Self::Webp => "image/webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.tag() == tag)
            .ok_or_else(|| UnknownFormat(tag.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_round_trips() {
        for format in OutputFormat::ALL {
            assert_eq!(format.tag().parse::<OutputFormat>(), Ok(format));
        }
    }

    #[test]
    fn mime_types() {
        assert_eq!(OutputFormat::Jpg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(OutputFormat::Jp2.mime_type(), "image/jp2");
    }

    #[test]
    fn codec_names() {
        assert_eq!(OutputFormat::Jp2.codec_name(), "JPEG 2000");
        assert_eq!(OutputFormat::Webp.codec_name(), "WEBP");
    }

    #[test]
    fn unknown_tags_reject() {
        for tag in ["jpeg", "JPG", "bmp", "", "tiff"] {
            assert_eq!(
                tag.parse::<OutputFormat>(),
                Err(UnknownFormat(tag.to_string()))
            );
        }
    }
}
