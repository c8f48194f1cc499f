//! Region command: which part of the source image to keep.
//!
//! - `full`: the whole image.
//! - `x,y,w,h`: integer pixels; the box is `(x, y, x + w, y + h)`.
//! - `pct:x,y,w,h`: decimals, each a percentage of the image width (`x`, `w`)
//!   or height (`y`, `h`). Offset and extent are converted to pixels separately
//!   and then added, so the box is `(px(x), py(y), px(x) + px(w), py(y) + py(h))`.
//!
//! The box is then clamped to the image. Inverted boxes (negative extent)
//! reject; boxes outside the image collapse to zero area.

use super::{CommandError, CommandKind, Reason, parse_float, parse_int, split_fields};
use crate::imaging::{PixelBox, RegionOp, clamp_box, percent_to_pixels};

const PERCENT_PREFIX: &str = "pct:";

/// Parse a region command against the source dimensions `(width, height)`.
pub fn parse(command: &str, dims: (u32, u32)) -> Result<RegionOp, CommandError> {
    parse_inner(command, dims)
        .map_err(|reason| CommandError::new(CommandKind::Region, command, reason))
}

fn parse_inner(command: &str, (width, height): (u32, u32)) -> Result<RegionOp, Reason> {
    if command == "full" {
        return Ok(RegionOp::Full);
    }

    let raw = match command.strip_prefix(PERCENT_PREFIX) {
        Some(rest) => percent_box(rest, width, height)?,
        None => pixel_box(command)?,
    };

    clamp_box(raw, width, height)
        .map(RegionOp::Box)
        .ok_or(Reason::InvertedBox)
}

fn pixel_box(input: &str) -> Result<PixelBox, Reason> {
    let fields = split_fields(input, 4)?;
    let x = parse_int(fields[0])?;
    let y = parse_int(fields[1])?;
    let w = parse_int(fields[2])?;
    let h = parse_int(fields[3])?;
    Ok(PixelBox::new(x, y, x.saturating_add(w), y.saturating_add(h)))
}

fn percent_box(input: &str, width: u32, height: u32) -> Result<PixelBox, Reason> {
    let fields = split_fields(input, 4)?;
    let x = percent_to_pixels(parse_float(fields[0])?, width);
    let y = percent_to_pixels(parse_float(fields[1])?, height);
    let w = percent_to_pixels(parse_float(fields[2])?, width);
    let h = percent_to_pixels(parse_float(fields[3])?, height);
    Ok(PixelBox::new(x, y, x.saturating_add(w), y.saturating_add(h)))
}
