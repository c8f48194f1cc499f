//! Size command: the dimensions of the derived image.
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `full` | keep the current size |
//! | `w,` | width `w`, height derived from the aspect ratio |
//! | `,h` | height `h`, width derived from the aspect ratio |
//! | `pct:n` | both axes scaled by `n` percent |
//! | `!w,h` | largest size that fits in `w × h` without distortion, never enlarged |
//! | `w,h` | exactly `w × h`, aspect ratio ignored |
//!
//! Parsing also resolves the target against the current dimensions, so a
//! command that would produce a zero-pixel axis, or enlarge an axis past
//! [`MAX_DIMENSION`], rejects here rather than in the codec.

use super::{CommandError, CommandKind, Reason, parse_float, parse_pixels, split_fields};
use crate::imaging::{SizeOp, size_target};

/// Longest axis a size command may enlarge to, in pixels. Sources already
/// larger than this can still be kept at, or reduced from, their own size.
pub const MAX_DIMENSION: u32 = 16_384;

const PERCENT_PREFIX: &str = "pct:";
const FIT_PREFIX: char = '!';

/// Parse a size command against the current (post-region) dimensions.
pub fn parse(command: &str, dims: (u32, u32)) -> Result<SizeOp, CommandError> {
    parse_inner(command, dims)
        .map_err(|reason| CommandError::new(CommandKind::Size, command, reason))
}

fn parse_inner(command: &str, dims: (u32, u32)) -> Result<SizeOp, Reason> {
    let op = parse_syntax(command)?;
    let too_long = |target: u32, current: u32| target > MAX_DIMENSION && target > current;
    match size_target(&op, dims) {
        Some((w, h)) if too_long(w, dims.0) || too_long(h, dims.1) => Err(Reason::OutOfRange),
        Some((w, h)) if w > 0 && h > 0 => Ok(op),
        _ => Err(Reason::Empty),
    }
}

fn parse_syntax(command: &str) -> Result<SizeOp, Reason> {
    if command == "full" {
        return Ok(SizeOp::Full);
    }

    if let Some(rest) = command.strip_prefix(PERCENT_PREFIX) {
        let pct = parse_float(rest)?;
        if pct <= 0.0 {
            return Err(Reason::OutOfRange);
        }
        return Ok(SizeOp::ScalePercent(pct));
    }

    if let Some(rest) = command.strip_prefix(FIT_PREFIX) {
        let fields = split_fields(rest, 2)?;
        return Ok(SizeOp::FitBox(
            parse_pixels(fields[0])?,
            parse_pixels(fields[1])?,
        ));
    }

    let fields = split_fields(command, 2)?;
    match (fields[0], fields[1]) {
        ("", "") => Err(Reason::Unrecognized),
        (w, "") => Ok(SizeOp::ScaleToWidth(parse_pixels(w)?)),
        ("", h) => Ok(SizeOp::ScaleToHeight(parse_pixels(h)?)),
        (w, h) => Ok(SizeOp::Absolute(parse_pixels(w)?, parse_pixels(h)?)),
    }
}
