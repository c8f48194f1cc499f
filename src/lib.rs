//! # iiify
//!
//! The transformation core of an IIIF-style image server. A request names a
//! stored source image and four compact command strings; the crate turns
//! them into a derived image and keeps it in a content-addressed disk cache,
//! so an identical request is answered from disk.
//!
//! # Architecture: Parse → Transform → Publish
//!
//! ```text
//! /plate.jpg/0,0,200,200/100,/!90/gray.png
//!     │
//!     ├─ request    split into identifier, commands, format (format checked first)
//!     ├─ cache      SHA-256 of the exact path; a hit ends here
//!     ├─ imaging    decode → region → size → rotation → quality → sharpen
//!     └─ cache      encode, write to a temp file, rename into place
//! ```
//!
//! Each command string has its own small grammar with one parse function per
//! command in [`command`]. Region and size are parsed against the image as it
//! is when their stage runs, so a size after a crop derives its aspect ratio
//! from the crop.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`command`] | Parsers for the region, size, rotation and quality grammars |
//! | [`imaging`] | Geometry math, operation descriptors, the codec backend and the transform pipeline |
//! | [`format`] | The seven output formats with their codec names and MIME types |
//! | [`request`] | Request path parsing and identifier checks |
//! | [`cache`] | Content-addressed store with atomic publish, plus batch statistics |
//! | [`service`] | The request boundary: cache lookup, render on miss, error categories |
//! | [`info`] | The `info.json` image information document |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact-Path Cache Keys
//!
//! The cache key is the digest of the request path byte for byte. Requests
//! that render the same pixels through different spellings (`full` and
//! `pct:100`) are stored twice. Normalizing would need a canonical form for
//! every grammar; a second copy on disk is cheaper than getting that wrong.
//!
//! ## Atomic Publish, No Single-Flight
//!
//! Concurrent misses on one key may render twice. Every entry is written to a
//! temp file inside the cache root and renamed into place, so readers never
//! see a partial file and the last rename wins.
//!
//! ## One Client Error
//!
//! Every rejection, whatever its cause, surfaces as the same client-error
//! status. The specific cause is logged and carried in the error text.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, rotation and encoding use the `image` and
//! `imageproc` crates. There is no system dependency; JPEG 2000 output is
//! therefore unavailable and rejects as a cache write failure.

pub mod cache;
pub mod command;
pub mod config;
pub mod format;
pub mod imaging;
pub mod info;
pub mod logging;
pub mod output;
pub mod request;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;
