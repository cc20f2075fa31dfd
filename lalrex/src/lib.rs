//! # lalrex
//!
//! A table-driven LALR(1) parser runtime. The grammar is compiled elsewhere
//! (by the companion `lalrc` tool) into a [`StateMachine`] of states,
//! transitions, symbols and action descriptors, and this crate executes the
//! shift/reduce algorithm over it: it pulls tokens from a [`Lexer`], invokes
//! semantic action callbacks bound by identifier on each reduction,
//! synthesizes a user-data value for the accepted start symbol, and performs
//! yacc-style error recovery through a distinguished `error` nonterminal.
//!
//! The crate deliberately knows nothing about how tables are produced or how
//! tokens are recognized; it only interprets tables and drives a token
//! source. See [`Parser`] for the driver and [`ErrorPolicy`] for the
//! diagnostics sink.

mod cursor;
mod error;
mod lexer;
mod machine;
mod parser;
mod policy;

#[cfg(test)]
mod test_grammars;

pub use crate::cursor::{LexerCursor, Position, Span};
pub use crate::error::{ErrorCode, ParseError};
pub use crate::lexer::{Lexer, LexerActionFn};
pub use crate::machine::{
    ActionDef, State, StateId, StateMachine, Symbol, SymbolId, SymbolKind, Transition,
    TransitionKind,
};
pub use crate::parser::{ActionFn, Node, Parser, ParserStats, RecoveryMode};
pub use crate::policy::{ErrorPolicy, TraceEvent};
