use crate::cursor::Position;
use smartstring::alias::String;
use thiserror::Error;

/// Stable discriminant for errors delivered through the error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No transition matched the lookahead and recovery could not rejoin the
    /// grammar (or recovery was entered at all; one report per episode).
    Syntax,
    /// The tables requested something impossible: a reduction deeper than
    /// the stack or a missing GOTO transition. Indicates table corruption.
    Unexpected,
    /// The token source could not recognize its input.
    Lexical,
}

/// Errors reported by the runtime while driving a parse.
///
/// These are never returned from `step`/`parse`; they are delivered to the
/// configured [`ErrorPolicy`](crate::ErrorPolicy) (or logged when none is
/// installed) and latched as rejection where appropriate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The lookahead had no transition from the current state.
    #[error("{position}: syntax error near {lexeme:?}")]
    Syntax { position: Position, lexeme: String },

    /// The state machine is inconsistent with the stack.
    #[error("{position}: unexpected transition for {symbol}")]
    Unexpected { position: Position, symbol: String },

    /// The lexer rejected part of its input.
    #[error("{position}: {message}")]
    Lexical { position: Position, message: String },
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Syntax { .. } => ErrorCode::Syntax,
            ParseError::Unexpected { .. } => ErrorCode::Unexpected,
            ParseError::Lexical { .. } => ErrorCode::Lexical,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::Unexpected { position, .. }
            | ParseError::Lexical { position, .. } => *position,
        }
    }
}
