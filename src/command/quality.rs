//! Quality command: the output color mode.

use super::{CommandError, CommandKind, Reason};
use crate::imaging::QualityOp;

pub fn parse(command: &str) -> Result<QualityOp, CommandError> {
    match command {
        "default" => Ok(QualityOp::Default),
        "color" => Ok(QualityOp::Color),
        "gray" => Ok(QualityOp::Gray),
        "bitonal" => Ok(QualityOp::Bitonal),
        _ => Err(CommandError::new(
            CommandKind::Quality,
            command,
            Reason::Unrecognized,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens() {
        assert_eq!(parse("default"), Ok(QualityOp::Default));
        assert_eq!(parse("color"), Ok(QualityOp::Color));
        assert_eq!(parse("gray"), Ok(QualityOp::Gray));
        assert_eq!(parse("bitonal"), Ok(QualityOp::Bitonal));
    }

    #[test]
    fn unknown_tokens_reject() {
        for token in ["grey", "Color", "native", "", "gray "] {
            let err = parse(token).unwrap_err();
            assert_eq!(err.kind, CommandKind::Quality);
            assert_eq!(err.reason, Reason::Unrecognized);
        }
    }
}
