//! High-level image operations.
//!
//! These functions combine the command parsers and calculations with backend
//! execution. [`transform`] is the pipeline every derived image goes through:
//!
//! ```text
//! region → size → rotation (mirror, then rotate) → quality → sharpen
//! ```
//!
//! Region and size are parsed against the image *as it is when their stage
//! runs*: the region sees the source dimensions, the size sees the cropped
//! ones. Rotation and quality do not depend on dimensions and are parsed
//! before any pixel work, so a bad rotation never costs a crop and resize.
//! Identity steps (full region, unchanged size, zero rotation, default
//! quality) skip the backend call.

use super::backend::{Dimensions, ImageBackend};
use super::calculations::size_target;
use super::params::{QualityOp, RegionOp, RotationOp, Sharpening};
use crate::command::{self, CommandError, CommandKind, Reason};
use image::DynamicImage;
use tracing::debug;

/// The four raw command strings of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commands<'a> {
    pub region: &'a str,
    pub size: &'a str,
    pub rotation: &'a str,
    pub quality: &'a str,
}

/// Run the full pipeline on a decoded image.
///
/// Any command rejection aborts the pipeline; nothing is returned for a
/// partially transformed image.
pub fn transform(
    backend: &impl ImageBackend,
    image: DynamicImage,
    commands: &Commands<'_>,
) -> Result<DynamicImage, CommandError> {
    let rotation = command::rotation::parse(commands.rotation)?;
    let quality = command::quality::parse(commands.quality)?;

    let image = apply_region(backend, image, commands.region)?;
    let image = apply_size(backend, image, commands.size)?;
    let image = apply_rotation(backend, image, rotation);
    let image = apply_quality(backend, image, quality);

    Ok(backend.sharpen(image, Sharpening::standard()))
}

fn apply_region(
    backend: &impl ImageBackend,
    image: DynamicImage,
    region: &str,
) -> Result<DynamicImage, CommandError> {
    let dims = Dimensions::of(&image).as_tuple();
    match command::region::parse(region, dims)? {
        RegionOp::Full => Ok(image),
        RegionOp::Box(bounds) if bounds.is_empty() => Err(CommandError::new(
            CommandKind::Region,
            region,
            Reason::Empty,
        )),
        RegionOp::Box(bounds) => {
            debug!(
                from = ?dims,
                to = ?(bounds.width(), bounds.height()),
                "region"
            );
            Ok(backend.crop(image, bounds))
        }
    }
}

fn apply_size(
    backend: &impl ImageBackend,
    image: DynamicImage,
    size: &str,
) -> Result<DynamicImage, CommandError> {
    let dims = Dimensions::of(&image).as_tuple();
    let op = command::size::parse(size, dims)?;
    // The parser only accepts ops that resolve to a non-empty target.
    let (width, height) = size_target(&op, dims)
        .ok_or_else(|| CommandError::new(CommandKind::Size, size, Reason::Empty))?;

    if (width, height) == dims {
        return Ok(image);
    }
    debug!(from = ?dims, to = ?(width, height), "size");
    Ok(backend.resize(image, width, height))
}

fn apply_rotation(
    backend: &impl ImageBackend,
    image: DynamicImage,
    rotation: RotationOp,
) -> DynamicImage {
    let image = if rotation.flip {
        backend.flip_horizontal(image)
    } else {
        image
    };
    if rotation.degrees % 360 == 0 {
        return image;
    }
    let rotated = backend.rotate(image, rotation.degrees);
    debug!(
        degrees = rotation.degrees,
        to = ?Dimensions::of(&rotated).as_tuple(),
        "rotation"
    );
    rotated
}

fn apply_quality(
    backend: &impl ImageBackend,
    image: DynamicImage,
    quality: QualityOp,
) -> DynamicImage {
    match quality {
        QualityOp::Default => image,
        other => backend.convert(image, other),
    }
}
