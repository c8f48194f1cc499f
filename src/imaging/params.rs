//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. The command
//! parsers in [`crate::command`] produce them from request strings, the
//! [`operations`](super::operations) pipeline sequences them, and the
//! [`backend`](super::backend) does the pixel work.
//!
//! ## Types
//!
//! - [`PixelBox`]: `(x0, y0, x1, y1)` in source-pixel coordinates.
//! - [`RegionOp`], [`SizeOp`], [`RotationOp`], [`QualityOp`]: one validated
//!   descriptor per request command.
//! - [`Sharpening`]: Unsharp-mask parameters applied after every transform.
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//!   Unrelated to [`QualityOp`], which selects a color mode.

/// A box in source-pixel coordinates.
///
/// Invariant: `x1 >= x0 && y1 >= y0`. After [`clamp_box`](super::calculations::clamp_box)
/// all coordinates also lie within the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelBox {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Validated region command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOp {
    /// `full`: keep the whole image.
    Full,
    /// Crop to a box already clamped to the image bounds.
    Box(PixelBox),
}

/// Validated size command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeOp {
    /// `full`: keep the current dimensions.
    Full,
    /// `w,`: scale to width, height follows the aspect ratio.
    ScaleToWidth(u32),
    /// `,h`: scale to height, width follows the aspect ratio.
    ScaleToHeight(u32),
    /// `pct:n`: scale both axes by a percentage.
    ScalePercent(f64),
    /// `!w,h`: fit inside the box, preserving aspect ratio, never enlarging.
    FitBox(u32, u32),
    /// `w,h`: exact dimensions, aspect ratio ignored.
    Absolute(u32, u32),
}

/// Validated rotation command: optional horizontal mirror, then a
/// counter-clockwise rotation in `0..=360` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationOp {
    pub flip: bool,
    pub degrees: u32,
}

/// Validated quality command (output color mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityOp {
    /// Pass the image through unchanged.
    Default,
    /// Full RGB.
    Color,
    /// Single-channel luminance.
    Gray,
    /// 1-bit black and white.
    Bitonal,
}

/// Sharpening parameters for unsharp mask.
///
/// - `sigma`: Standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: Minimum brightness difference to sharpen (0 = sharpen all pixels)
/// - `amount`: Fraction of the mask added back (1.0 = full unsharp mask)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
    pub amount: f32,
}

impl Sharpening {
    /// The local-contrast pass applied to every derived image.
    pub fn standard() -> Self {
        Self {
            sigma: 1.2,
            threshold: 3,
            amount: 0.8,
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}
