//! Pure Rust codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image` crate, format sniffed from content |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `CatmullRom` (bicubic) |
//! | Rotate (counter-clockwise), right angles | `rotate270` / `rotate180` / `rotate90` |
//! | Rotate, other angles | `imageproc::geometric_transformations::warp_into`, bicubic |
//! | Mirror | `DynamicImage::fliph` |
//! | Gray / bitonal | `to_luma8`, then the `BiLevel` color map for bitonal |
//! | Sharpening | `DynamicImage::unsharpen`, blended back to the configured amount |
//! | Encode JPEG | `JpegEncoder` at the configured quality |
//! | Encode PNG, TIFF, GIF, WebP | `DynamicImage::write_to` (WebP is lossless) |
//! | Encode PDF | JPEG stream in a one-page PDF ([`pdf`](super::pdf)) |
//! | Encode JPEG 2000 | not available: [`BackendError::Unsupported`] |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::rotated_canvas;
use super::params::{PixelBox, Quality, QualityOp, Sharpening};
use super::pdf::{self, ColorSpace};
use crate::format::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{BiLevel, ColorMap, FilterType};
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, ImageFormat, ImageReader, Luma, LumaA,
    Pixel, Rgb, RgbImage, Rgba, RgbaImage,
};
use imageproc::definitions::Clamp;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    jpeg_quality: Quality,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::with_quality(Quality::default())
    }

    /// Backend encoding JPEG (and the JPEG inside PDF) at `jpeg_quality`.
    pub fn with_quality(jpeg_quality: Quality) -> Self {
        Self { jpeg_quality }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Rotate counter-clockwise by a non-right angle into a canvas large enough
/// for every corner.
///
/// Uncovered corners are black, or transparent when the source has alpha.
/// Gray and gray+alpha stay as they are; everything else comes back as RGB,
/// or RGBA when the source had alpha.
fn rotate_expanded(image: &DynamicImage, degrees: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let (out_w, out_h) = rotated_canvas((w, h), degrees);

    // y points down, so a negative angle turns counter-clockwise on screen
    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(-(degrees as f32).to_radians())
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    match image {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = GrayImage::new(out_w, out_h);
            warp_into(gray, &projection, Interpolation::Bicubic, Luma([0]), &mut out);
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageLumaA8(gray) => {
            let mut out = GrayAlphaImage::new(out_w, out_h);
            warp_into(gray, &projection, Interpolation::Bicubic, LumaA([0, 0]), &mut out);
            DynamicImage::ImageLumaA8(out)
        }
        other if other.color().has_alpha() => {
            let mut out = RgbaImage::new(out_w, out_h);
            let fill = Rgba([0, 0, 0, 0]);
            warp_into(&other.to_rgba8(), &projection, Interpolation::Bicubic, fill, &mut out);
            DynamicImage::ImageRgba8(out)
        }
        other => {
            let mut out = RgbImage::new(out_w, out_h);
            let fill = Rgb([0, 0, 0]);
            warp_into(&other.to_rgb8(), &projection, Interpolation::Bicubic, fill, &mut out);
            DynamicImage::ImageRgb8(out)
        }
    }
}

/// Move every sample of `out` to `amount` of the way from `source`.
fn mix<P>(
    source: &ImageBuffer<P, Vec<P::Subpixel>>,
    out: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    amount: f32,
) where
    P: Pixel,
    P::Subpixel: Into<f32> + Clamp<f32>,
{
    for (o, s) in out.iter_mut().zip(source.iter()) {
        let (from, to): (f32, f32) = ((*s).into(), (*o).into());
        *o = <P::Subpixel as Clamp<f32>>::clamp(from + amount * (to - from));
    }
}

/// Scale an unsharp mask down to `amount` by blending its output toward the
/// unsharpened image. Both images share a color type.
fn blend_toward(source: &DynamicImage, mut sharpened: DynamicImage, amount: f32) -> DynamicImage {
    use DynamicImage as D;
    match (source, &mut sharpened) {
        (D::ImageLuma8(s), D::ImageLuma8(o)) => mix(s, o, amount),
        (D::ImageLumaA8(s), D::ImageLumaA8(o)) => mix(s, o, amount),
        (D::ImageRgb8(s), D::ImageRgb8(o)) => mix(s, o, amount),
        (D::ImageRgba8(s), D::ImageRgba8(o)) => mix(s, o, amount),
        (D::ImageLuma16(s), D::ImageLuma16(o)) => mix(s, o, amount),
        (D::ImageLumaA16(s), D::ImageLumaA16(o)) => mix(s, o, amount),
        (D::ImageRgb16(s), D::ImageRgb16(o)) => mix(s, o, amount),
        (D::ImageRgba16(s), D::ImageRgba16(o)) => mix(s, o, amount),
        // Float images keep the full mask
        _ => {}
    }
    sharpened
}

/// Threshold luminance to pure black and white.
fn to_bitonal(mut gray: GrayImage) -> GrayImage {
    let map = BiLevel;
    for pixel in gray.pixels_mut() {
        map.map_color(pixel);
    }
    gray
}

/// JPEG carries 8-bit gray or RGB only.
fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        other if other.color().channel_count() <= 2 => {
            Cow::Owned(DynamicImage::ImageLuma8(other.to_luma8()))
        }
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

/// The lossless encoders all take 8-bit gray, RGB, or RGBA.
fn lossless_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            Cow::Borrowed(image)
        }
        other if other.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8())),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

fn encode_jpeg(image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8);
    image
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(bytes)
}

fn encode_with_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}")))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open(path)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        open(path)?.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
    }

    fn crop(&self, image: DynamicImage, region: PixelBox) -> DynamicImage {
        image.crop_imm(
            region.x0 as u32,
            region.y0 as u32,
            region.width(),
            region.height(),
        )
    }

    fn resize(&self, image: DynamicImage, width: u32, height: u32) -> DynamicImage {
        if (image.width(), image.height()) == (width, height) {
            return image;
        }
        image.resize_exact(width, height, FilterType::CatmullRom)
    }

    fn rotate(&self, image: DynamicImage, degrees: u32) -> DynamicImage {
        match degrees % 360 {
            0 => image,
            90 => image.rotate270(),
            180 => image.rotate180(),
            270 => image.rotate90(),
            d => rotate_expanded(&image, d),
        }
    }

    fn flip_horizontal(&self, image: DynamicImage) -> DynamicImage {
        image.fliph()
    }

    fn convert(&self, image: DynamicImage, quality: QualityOp) -> DynamicImage {
        match quality {
            QualityOp::Default => image,
            QualityOp::Color => DynamicImage::ImageRgb8(image.to_rgb8()),
            QualityOp::Gray => DynamicImage::ImageLuma8(image.to_luma8()),
            QualityOp::Bitonal => DynamicImage::ImageLuma8(to_bitonal(image.to_luma8())),
        }
    }

    fn sharpen(&self, image: DynamicImage, sharpening: Sharpening) -> DynamicImage {
        let sharpened = image.unsharpen(sharpening.sigma, sharpening.threshold);
        if sharpening.amount >= 1.0 {
            return sharpened;
        }
        blend_toward(&image, sharpened, sharpening.amount)
    }

    fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, BackendError> {
        match format {
            OutputFormat::Jpg => encode_jpeg(&jpeg_compatible(image), self.jpeg_quality),
            OutputFormat::Pdf => {
                let prepared = jpeg_compatible(image);
                let color_space = match prepared.as_ref() {
                    DynamicImage::ImageLuma8(_) => ColorSpace::Gray,
                    _ => ColorSpace::Rgb,
                };
                let jpeg = encode_jpeg(&prepared, self.jpeg_quality)?;
                Ok(pdf::wrap_jpeg(
                    &jpeg,
                    prepared.width(),
                    prepared.height(),
                    color_space,
                ))
            }
            OutputFormat::Png => encode_with_format(&lossless_compatible(image), ImageFormat::Png),
            OutputFormat::Tif => encode_with_format(&lossless_compatible(image), ImageFormat::Tiff),
            OutputFormat::Webp => {
                encode_with_format(&lossless_compatible(image), ImageFormat::WebP)
            }
            OutputFormat::Gif => encode_with_format(
                &DynamicImage::ImageRgba8(image.to_rgba8()),
                ImageFormat::Gif,
            ),
            OutputFormat::Jp2 => Err(BackendError::Unsupported(format)),
        }
    }
}
