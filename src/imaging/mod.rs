//! Image processing in pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify / decode** | `image::ImageReader`, format sniffed from content |
//! | **Crop / resize / mirror** | `DynamicImage` methods, Catmull-Rom resampling |
//! | **Rotate with expand** | `rotate90/180/270`, else `imageproc` bicubic warp |
//! | **Color mode** | `to_rgb8`, `to_luma8`, `BiLevel` threshold |
//! | **Sharpen** | `unsharpen` |
//! | **Encode** | `image` encoders, plus a one-page PDF wrapper |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The transform pipeline combining parsers, calculations
//!   and backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod pdf;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    clamp_box, derive_aspect, fit_within, percent_to_pixels, rotated_canvas, size_target,
};
pub use operations::{Commands, transform};
pub use params::{PixelBox, Quality, QualityOp, RegionOp, RotationOp, SizeOp, Sharpening};
pub use rust_backend::RustBackend;
