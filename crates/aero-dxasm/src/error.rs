use thiserror::Error;

use crate::lexer::TokenKind;

/// Failure to translate one instruction line.
///
/// Every kind is scoped to the line that produced it; a listing keeps going after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("unrecognized character {ch:?} at column {column}")]
    UnrecognizedCharacter { ch: char, column: usize },
    #[error("expected {expected}, found {found} {text:?}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        text: String,
    },
    #[error("no implementation for `{name}`")]
    UnknownMnemonic { name: String },
    #[error("cannot lower {variant} node")]
    UnsupportedNode { variant: &'static str },
}

impl LineError {
    /// True for the kinds that mean "skip this line" rather than "this line is malformed".
    pub fn is_unimplemented(&self) -> bool {
        matches!(
            self,
            LineError::UnknownMnemonic { .. } | LineError::UnsupportedNode { .. }
        )
    }
}
