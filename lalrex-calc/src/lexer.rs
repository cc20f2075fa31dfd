//! A DFA-backed lexer implementing the runtime's lexer façade.
//!
//! Token patterns are compiled into one anchored dense DFA at construction
//! time; `advance` walks the automaton from the current offset and keeps
//! the longest match, skipping whitespace. The `digits` rule accepts a
//! lexer action handler, which can rewrite the matched text (the
//! calculator uses it to strip `_` digit separators) before the parser
//! sees the lexeme.

use crate::error::CalcError;
use crate::tables;
use lalrex::{Lexer, LexerActionFn, LexerCursor, ParseError, Position, SymbolId};
use regex_automata::dfa::{dense, Automaton, StartKind};
use regex_automata::util::primitives::StateID as DfaStateId;
use regex_automata::{Anchored, Input};
use smartstring::alias::String;
use std::collections::HashMap;

const PATTERNS: &[&str] = &[
    r"[0-9][0-9_]*", // digits
    r"\+",
    r"\*",
    r"\(",
    r"\)",
    r"[ \t\r\n]+", // whitespace
];

const RULE_DIGITS: usize = 0;
const RULE_SPACE: usize = 5;

/// Identifiers of rules that accept an action handler; unnamed rules
/// cannot be rebound.
const RULE_NAMES: &[&str] = &["digits", "", "", "", "", ""];

fn rule_symbol(rule: usize) -> SymbolId {
    match rule {
        RULE_DIGITS => tables::NUM,
        1 => tables::PLUS,
        2 => tables::STAR,
        3 => tables::LPAREN,
        4 => tables::RPAREN,
        _ => tables::END,
    }
}

/// Tokenizer for calculator input.
pub struct CalcLexer {
    dfa: dense::DFA<Vec<u32>>,
    start: DfaStateId,
    input: std::string::String,
    cursor: LexerCursor,
    current: SymbolId,
    lexeme: String,
    handlers: HashMap<String, LexerActionFn>,
    exhausted: bool,
}

impl CalcLexer {
    pub fn new() -> Result<Self, CalcError> {
        let dfa = dense::Builder::new()
            .configure(dense::Config::new().start_kind(StartKind::Anchored))
            .build_many(PATTERNS)?;
        let start = dfa.start_state_forward(&Input::new("").anchored(Anchored::Yes))?;
        Ok(Self {
            dfa,
            start,
            input: std::string::String::new(),
            cursor: LexerCursor::new(),
            current: tables::END,
            lexeme: String::new(),
            handlers: HashMap::new(),
            exhausted: false,
        })
    }

    /// Longest anchored match at byte offset `start`, as `(rule, length)`.
    ///
    /// Dense DFAs flag a match one transition late, so a match state
    /// entered on byte `i` means the match ends before `i`; end-of-input
    /// settles the final byte.
    fn match_at(&self, start: usize) -> Option<(usize, usize)> {
        let bytes = &self.input.as_bytes()[start..];
        let mut state = self.start;
        let mut last = None;
        for (i, &b) in bytes.iter().enumerate() {
            state = self.dfa.next_state(state, b);
            if self.dfa.is_special_state(state) {
                if self.dfa.is_match_state(state) {
                    last = Some((self.dfa.match_pattern(state, 0).as_usize(), i));
                } else if self.dfa.is_dead_state(state) || self.dfa.is_quit_state(state) {
                    return last.filter(|&(_, len)| len > 0);
                }
            }
        }
        let state = self.dfa.next_eoi_state(state);
        if self.dfa.is_match_state(state) {
            last = Some((self.dfa.match_pattern(state, 0).as_usize(), bytes.len()));
        }
        last.filter(|&(_, len)| len > 0)
    }
}

impl Lexer for CalcLexer {
    fn reset(&mut self, input: &str) {
        self.input.clear();
        self.input.push_str(input);
        self.cursor = LexerCursor::new();
        self.current = tables::END;
        self.lexeme.clear();
        self.exhausted = false;
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        loop {
            let pos = self.cursor.pos;
            if pos >= self.input.len() {
                self.exhausted = true;
                self.current = tables::END;
                self.lexeme.clear();
                self.cursor.start_token();
                return Ok(());
            }
            match self.match_at(pos) {
                Some((rule, len)) => {
                    self.cursor.start_token();
                    for i in pos..pos + len {
                        self.cursor.advance(self.input.as_bytes()[i]);
                    }
                    if rule == RULE_SPACE {
                        continue;
                    }
                    self.current = rule_symbol(rule);
                    self.lexeme = String::from(&self.input[pos..pos + len]);
                    let name = RULE_NAMES[rule];
                    if !name.is_empty() {
                        if let Some(handler) = self.handlers.get_mut(name) {
                            let rewritten = handler(&self.lexeme);
                            self.lexeme = rewritten;
                        }
                    }
                    log::trace!("token {:?} at {}", self.lexeme, self.cursor.span.start);
                    return Ok(());
                }
                None => {
                    let position = self.cursor.span.end;
                    let offending = self.input[pos..]
                        .chars()
                        .next()
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    self.current = tables::END;
                    self.lexeme.clear();
                    return Err(ParseError::Lexical {
                        position,
                        message: format!("unrecognized character {offending:?}").into(),
                    });
                }
            }
        }
    }

    fn symbol(&self) -> SymbolId {
        self.current
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }

    fn position(&self) -> Position {
        self.cursor.span.start
    }

    fn full(&self) -> bool {
        self.exhausted
    }

    fn set_action_handler(&mut self, identifier: &str, handler: LexerActionFn) {
        if !identifier.is_empty() && RULE_NAMES.contains(&identifier) {
            self.handlers.insert(identifier.into(), handler);
        }
    }
}
