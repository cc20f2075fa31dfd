use crate::error::ParseError;
use std::fmt;

/// External sink for structured error and trace notifications.
///
/// The runtime never formats diagnostics for the host; it hands over typed
/// values and the host decides what to do with them. When no policy is
/// installed, errors go to the `log` facade and traces to standard output.
///
/// A policy shared between threads must be synchronized by the host; the
/// runtime calls it synchronously from the driving thread.
pub trait ErrorPolicy {
    /// Receives every error the runtime reports: syntax errors, table
    /// corruption, and lexical errors forwarded from the token source.
    fn error(&mut self, error: &ParseError);

    /// Receives one event per SHIFT/REDUCE while debug output is enabled.
    ///
    /// The default prints the event's canonical one-line rendering.
    fn trace(&mut self, event: &TraceEvent<'_>) {
        println!("{event}");
    }
}

/// A single driver action, reported when debug output is enabled.
///
/// Borrows symbol names and lexemes from the state machine and the stack;
/// valid only for the duration of the [`ErrorPolicy::trace`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// A frame was pushed for the lookahead (or for the `error` symbol
    /// during recovery, with an empty lexeme).
    Shift { symbol: &'a str, lexeme: &'a str },
    /// The top frames were replaced by `symbol`; `frames` lists the popped
    /// span as `(symbol, lexeme)` pairs, left to right.
    Reduce {
        symbol: &'a str,
        frames: Vec<(&'a str, &'a str)>,
    },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Shift { symbol, lexeme } => write!(f, "SHIFT: ({symbol} {lexeme})"),
            TraceEvent::Reduce { symbol, frames } => {
                write!(f, "REDUCE: {symbol} <-")?;
                for (symbol, lexeme) in frames {
                    write!(f, " ({symbol} {lexeme})")?;
                }
                Ok(())
            }
        }
    }
}
