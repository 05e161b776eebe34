//! Errors that can occur while parsing input.

use std::fmt;

use plait_compiler::BindError;
use plait_core::{LexError, Position};
use serde::Serialize;

/// Something the parser would have accepted at the failure position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Expected {
    /// A token with this exact text.
    Literal(String),
    /// A token of this kind.
    Kind(String),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(text) => write!(f, "{text:?}"),
            Expected::Kind(name) if name == plait_core::Symbols::EOF_NAME => {
                f.write_str("end of input")
            }
            Expected::Kind(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// No alternative matched; reported at the deepest failure.
    #[error("{pos}: unexpected {found}{}", expected_suffix(.expected))]
    Unexpected {
        pos: Position,
        found: String,
        expected: Vec<Expected>,
    },

    /// The grammar matched, but input remains.
    #[error("{pos}: unexpected trailing {found}{}", expected_suffix(.expected))]
    Trailing {
        pos: Position,
        found: String,
        expected: Vec<Expected>,
    },

    #[error(transparent)]
    Lex(#[from] LexError),

    /// A capture could not be stored into its field.
    #[error("{pos}: cannot capture into `{target}`: {source}")]
    Capture {
        pos: Position,
        target: String,
        source: BindError,
    },

    #[error("execution limit of {0} steps exceeded")]
    ExecFuelExhausted(u32),

    #[error("recursion limit of {0} nested rules exceeded")]
    RecursionLimitExceeded(u32),
}

impl ParseError {
    /// Input position the error refers to, when there is one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Unexpected { pos, .. }
            | ParseError::Trailing { pos, .. }
            | ParseError::Capture { pos, .. } => Some(*pos),
            ParseError::Lex(_)
            | ParseError::ExecFuelExhausted(_)
            | ParseError::RecursionLimitExceeded(_) => None,
        }
    }
}

fn expected_suffix(expected: &[Expected]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(", expected {one}"),
        many => {
            let list: Vec<String> = many.iter().map(ToString::to_string).collect();
            format!(", expected one of {}", list.join(", "))
        }
    }
}
