//! Parsers for the four request commands.
//!
//! Every image request carries four command strings, each with its own small
//! grammar:
//!
//! | Command | Syntaxes | Descriptor |
//! |---|---|---|
//! | region | `full`, `x,y,w,h`, `pct:x,y,w,h` | [`RegionOp`] |
//! | size | `full`, `w,`, `,h`, `pct:n`, `!w,h`, `w,h` | [`SizeOp`] |
//! | rotation | `n`, `!n` with `0 <= n <= 360` | [`RotationOp`] |
//! | quality | `default`, `color`, `gray`, `bitonal` | [`QualityOp`] |
//!
//! Exactly one syntax matches any accepted string. Anything else is a
//! [`CommandError`] naming the command, the input and the specific cause.
//! Region and size take the dimensions of the image *as it is when that stage
//! runs*, because their pixel values are derived from it.
//!
//! [`RegionOp`]: crate::imaging::RegionOp
//! [`SizeOp`]: crate::imaging::SizeOp
//! [`RotationOp`]: crate::imaging::RotationOp
//! [`QualityOp`]: crate::imaging::QualityOp

pub mod quality;
pub mod region;
pub mod rotation;
pub mod size;

use std::fmt;
use thiserror::Error;

/// Which of the four commands an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Region,
    Size,
    Rotation,
    Quality,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Region => "region",
            Self::Size => "size",
            Self::Rotation => "rotation",
            Self::Quality => "quality",
        };
        f.write_str(name)
    }
}

/// Specific cause of a rejected command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Reason {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{0:?} is not a valid number")]
    NotANumber(String),
    #[error("box is inverted")]
    InvertedBox,
    #[error("value is out of range")]
    OutOfRange,
    #[error("result has no pixels")]
    Empty,
    #[error("unrecognized syntax")]
    Unrecognized,
}

/// A command string that failed its grammar or numeric constraints.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {kind} command {input:?}: {reason}")]
pub struct CommandError {
    pub kind: CommandKind,
    pub input: String,
    pub reason: Reason,
}

impl CommandError {
    pub fn new(kind: CommandKind, input: &str, reason: Reason) -> Self {
        Self {
            kind,
            input: input.to_string(),
            reason,
        }
    }
}

/// Split on commas and require exactly `expected` fields.
fn split_fields(input: &str, expected: usize) -> Result<Vec<&str>, Reason> {
    let fields: Vec<&str> = input.split(',').collect();
    if fields.len() != expected {
        return Err(Reason::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_int(field: &str) -> Result<i64, Reason> {
    field
        .parse::<i64>()
        .map_err(|_| Reason::NotANumber(field.to_string()))
}

/// Parse a strictly positive pixel count.
fn parse_pixels(field: &str) -> Result<u32, Reason> {
    let value = parse_int(field)?;
    match u32::try_from(value) {
        Ok(0) => Err(Reason::Empty),
        Ok(v) => Ok(v),
        Err(_) => Err(Reason::OutOfRange),
    }
}

/// Parse a finite decimal. `NaN` and infinities are rejected as non-numbers.
fn parse_float(field: &str) -> Result<f64, Reason> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Reason::NotANumber(field.to_string()))
}
