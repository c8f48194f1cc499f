//! CLI output formatting.
//!
//! # Render Display
//!
//! Each request gets a header line with the request path, followed by one
//! indented status line:
//!
//! ```text
//! /plate/full/full/0/default.jpg
//!     encoded: cache/5c1f…e9 (image/jpeg)
//! /plate/full/full/0/default.jpg
//!     cached: cache/5c1f…e9 (image/jpeg)
//! /plate/full/full/400/default.jpg
//!     rejected (400): invalid command: invalid rotation command "400": value is out of range
//!
//! Cache: 1 cached, 1 encoded (2 total), 1 rejected
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return lines for testability and `print_*` wrappers
//! write them to stdout. Format functions are pure: no I/O, no side effects.

use crate::cache::CacheStats;
use crate::service::{Artifact, RequestError};

const INDENT: &str = "    ";

/// Lines for one rendered request.
pub fn format_render_result(
    request_path: &str,
    result: &Result<Artifact, RequestError>,
) -> Vec<String> {
    let status = match result {
        Ok(artifact) => format!(
            "{INDENT}{}: {} ({})",
            if artifact.cache_hit { "cached" } else { "encoded" },
            artifact.path.display(),
            artifact.mime_type()
        ),
        Err(e) => format!("{INDENT}rejected ({}): {e}", e.status()),
    };
    vec![request_path.to_string(), status]
}

pub fn print_render_result(request_path: &str, result: &Result<Artifact, RequestError>) {
    for line in format_render_result(request_path, result) {
        println!("{}", line);
    }
}

/// One-line summary for a batch.
pub fn format_summary(stats: &CacheStats, rejected: usize) -> String {
    if rejected == 0 {
        format!("Cache: {}", stats)
    } else {
        format!("Cache: {}, {} rejected", stats, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use std::path::PathBuf;

    fn artifact(cache_hit: bool) -> Artifact {
        Artifact {
            path: PathBuf::from("cache/abc"),
            format: OutputFormat::Png,
            cache_hit,
        }
    }

    #[test]
    fn encoded_result() {
        let lines = format_render_result("/a/full/full/0/default.png", &Ok(artifact(false)));
        assert_eq!(
            lines,
            vec![
                "/a/full/full/0/default.png",
                "    encoded: cache/abc (image/png)"
            ]
        );
    }

    #[test]
    fn cached_result() {
        let lines = format_render_result("/a/full/full/0/default.png", &Ok(artifact(true)));
        assert_eq!(lines[1], "    cached: cache/abc (image/png)");
    }

    #[test]
    fn rejected_result_shows_status_and_cause() {
        let err = RequestError::InvalidFormat("unsupported output format: \"bmp\"".into());
        let lines = format_render_result("/a/full/full/0/default.bmp", &Err(err));
        assert_eq!(
            lines[1],
            "    rejected (400): invalid format: unsupported output format: \"bmp\""
        );
    }

    #[test]
    fn summary_without_rejections() {
        let stats = CacheStats { hits: 1, misses: 2 };
        assert_eq!(format_summary(&stats, 0), "Cache: 1 cached, 2 encoded (3 total)");
    }

    #[test]
    fn summary_with_rejections() {
        let stats = CacheStats { hits: 0, misses: 2 };
        assert_eq!(format_summary(&stats, 3), "Cache: 2 encoded, 3 rejected");
    }
}
