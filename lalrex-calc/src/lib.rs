//! # lalrex-calc
//!
//! A four-function integer calculator built on the [`lalrex`] runtime. It
//! couples:
//!
//! - [`tables`]: the LALR(1) automaton for the calculator grammar, laid out
//!   the way the `lalrc` table compiler emits it,
//! - [`CalcLexer`]: a DFA-backed tokenizer implementing the runtime's lexer
//!   façade,
//! - [`Calculator`]: semantic actions bound by identifier plus a strict
//!   `eval` entry point.
//!
//! The grammar carries an `error` production, so the parser recovers from
//! malformed input yacc-style; [`Calculator::eval`] still reports the first
//! error rather than returning a salvaged value.
//!
//! ## Example
//!
//! ```rust
//! # use lalrex_calc::Calculator;
//! let calc = Calculator::new();
//! assert_eq!(calc.eval("1 + 2 * 3").unwrap(), 7);
//! assert_eq!(calc.eval("(1 + 2) * 3").unwrap(), 9);
//! assert!(calc.eval("1 + + 2").is_err());
//! ```

pub mod tables;

mod error;
mod lexer;

pub use crate::error::CalcError;
pub use crate::lexer::CalcLexer;

use lalrex::{ErrorPolicy, ParseError, Parser, RecoveryMode, StateMachine};
use std::cell::RefCell;
use std::rc::Rc;

/// Latches the first reported error so `eval` can return it on failure.
struct CapturePolicy {
    first: Rc<RefCell<Option<ParseError>>>,
}

impl ErrorPolicy for CapturePolicy {
    fn error(&mut self, error: &ParseError) {
        let mut slot = self.first.borrow_mut();
        if slot.is_none() {
            *slot = Some(error.clone());
        }
    }
}

/// Binds the calculator's reduction callbacks and lexeme rewrites to a
/// parser driving the [`tables::state_machine`] tables.
///
/// Bindings are by identifier, so they survive grammar evolution: an
/// identifier the tables no longer carry is silently skipped.
pub fn bind_actions(parser: &mut Parser<'_, CalcLexer, i64>) {
    parser.set_action_handler("number", |frames| {
        frames[0].lexeme().parse::<i64>().unwrap_or_default()
    });
    parser.set_action_handler("add", |frames| frames[0].value() + frames[2].value());
    parser.set_action_handler("multiply", |frames| frames[0].value() * frames[2].value());
    parser.set_action_handler("group", |frames| *frames[1].value());
    parser.set_lexer_action_handler("digits", |text| {
        text.chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .into()
    });
}

/// A four-function integer calculator.
///
/// Owns the parse tables; each [`eval`](Calculator::eval) call drives a
/// fresh parser over them. Uses [`RecoveryMode::DiscardLookahead`] so that
/// evaluation terminates on arbitrary garbage; the historical
/// hold-the-lookahead behavior remains available on [`Parser`] directly.
pub struct Calculator {
    machine: StateMachine,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            machine: tables::state_machine(),
        }
    }

    /// The compiled tables, shareable across parsers.
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Evaluates one expression.
    ///
    /// Returns the computed value, or the first error the runtime reported
    /// if the input did not parse cleanly, even when error recovery
    /// salvaged an accepting parse.
    pub fn eval(&self, input: &str) -> Result<i64, CalcError> {
        let lexer = CalcLexer::new()?;
        let first = Rc::new(RefCell::new(None));
        let mut parser = Parser::with_policy(
            &self.machine,
            lexer,
            Box::new(CapturePolicy {
                first: first.clone(),
            }),
        );
        parser.set_recovery_mode(RecoveryMode::DiscardLookahead);
        bind_actions(&mut parser);
        parser.parse(input);

        let first = first.borrow_mut().take();
        match first {
            None if parser.accepted() => Ok(parser.take_user_data().unwrap_or_default()),
            Some(error) => Err(CalcError::Parse(error)),
            None => Err(CalcError::Parse(ParseError::Syntax {
                position: parser.position(),
                lexeme: "".into(),
            })),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
