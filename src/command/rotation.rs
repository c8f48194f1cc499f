//! Rotation command: `n` or `!n`, where `n` is an integer in `0..=360`.
//!
//! A leading `!` mirrors the image horizontally before rotating. Rotation is
//! counter-clockwise and the canvas grows to hold the rotated content.

use super::{CommandError, CommandKind, Reason, parse_int};
use crate::imaging::RotationOp;

const MIRROR_PREFIX: char = '!';
const MAX_DEGREES: i64 = 360;

pub fn parse(command: &str) -> Result<RotationOp, CommandError> {
    let (flip, rest) = match command.strip_prefix(MIRROR_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, command),
    };

    let degrees = parse_int(rest)
        .and_then(|d| {
            if (0..=MAX_DEGREES).contains(&d) {
                Ok(d as u32)
            } else {
                Err(Reason::OutOfRange)
            }
        })
        .map_err(|reason| CommandError::new(CommandKind::Rotation, command, reason))?;

    Ok(RotationOp { flip, degrees })
}
