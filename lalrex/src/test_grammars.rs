//! Hand-laid table fixtures and test doubles for driver tests.
//!
//! Each fixture module lays out one small state machine the way the table
//! compiler would emit it, with the grammar spelled out per state. The
//! `ScriptLexer` replays a fixed token sequence through the lexer façade
//! and the `RecordingPolicy` captures everything the driver reports.

use crate::cursor::Position;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::machine::{
    ActionDef, State, StateId, StateMachine, Symbol, SymbolId, SymbolKind, Transition,
    TransitionKind,
};
use crate::policy::{ErrorPolicy, TraceEvent};
use std::cell::RefCell;
use std::rc::Rc;

fn shift(on: SymbolId, target: u32) -> Transition {
    Transition {
        on,
        kind: TransitionKind::Shift {
            target: StateId(target),
        },
    }
}

fn reduce(on: SymbolId, symbol: SymbolId, length: usize, action: Option<usize>) -> Transition {
    Transition {
        on,
        kind: TransitionKind::Reduce {
            symbol,
            length,
            action,
        },
    }
}

fn base_symbols(extra: &[(&str, SymbolKind)]) -> Vec<Symbol> {
    let mut symbols = vec![
        Symbol::new("S", SymbolKind::NonTerminal),
        Symbol::new("$", SymbolKind::End),
        Symbol::new("error", SymbolKind::Error),
    ];
    symbols.extend(extra.iter().map(|&(name, kind)| Symbol::new(name, kind)));
    symbols
}

/// `S -> A ; A -> a`, the smallest accepting grammar.
pub mod unit {
    use super::*;

    pub const START: SymbolId = SymbolId(0);
    pub const END: SymbolId = SymbolId(1);
    pub const A_NONTERM: SymbolId = SymbolId(3);
    pub const A_TERM: SymbolId = SymbolId(4);

    pub fn grammar() -> StateMachine {
        StateMachine {
            symbols: base_symbols(&[
                ("A", SymbolKind::NonTerminal),
                ("a", SymbolKind::Terminal),
            ]),
            states: vec![
                // 0: S -> . A ; A -> . a
                State {
                    transitions: vec![shift(A_TERM, 2), shift(A_NONTERM, 1)],
                },
                // 1: S -> A .
                State {
                    transitions: vec![reduce(END, START, 1, None)],
                },
                // 2: A -> a .
                State {
                    transitions: vec![reduce(END, A_NONTERM, 1, Some(0))],
                },
            ],
            actions: vec![ActionDef::new("unit")],
            start_state: StateId(0),
            start_symbol: START,
            end_symbol: END,
            error_symbol: SymbolId(2),
        }
    }
}

/// `S -> L ; L -> a L | ε`: epsilon productions and right recursion.
pub mod list {
    use super::*;

    pub const START: SymbolId = SymbolId(0);
    pub const END: SymbolId = SymbolId(1);
    pub const L_NONTERM: SymbolId = SymbolId(3);
    pub const A_TERM: SymbolId = SymbolId(4);

    pub fn grammar() -> StateMachine {
        StateMachine {
            symbols: base_symbols(&[
                ("L", SymbolKind::NonTerminal),
                ("a", SymbolKind::Terminal),
            ]),
            states: vec![
                // 0: S -> . L ; L -> . a L ; L -> .
                State {
                    transitions: vec![
                        shift(A_TERM, 2),
                        shift(L_NONTERM, 1),
                        reduce(END, L_NONTERM, 0, Some(0)),
                    ],
                },
                // 1: S -> L .
                State {
                    transitions: vec![reduce(END, START, 1, None)],
                },
                // 2: L -> a . L ; L -> . a L ; L -> .
                State {
                    transitions: vec![
                        shift(A_TERM, 2),
                        shift(L_NONTERM, 3),
                        reduce(END, L_NONTERM, 0, Some(0)),
                    ],
                },
                // 3: L -> a L .
                State {
                    transitions: vec![reduce(END, L_NONTERM, 2, Some(1))],
                },
            ],
            actions: vec![ActionDef::new("nil"), ActionDef::new("cons")],
            start_state: StateId(0),
            start_symbol: START,
            end_symbol: END,
            error_symbol: SymbolId(2),
        }
    }
}

/// The `unit` grammar with its GOTO entry removed: reducing `A` finds no
/// transition, which the driver must report as table corruption.
pub mod broken {
    use super::*;

    pub const START: SymbolId = SymbolId(0);
    pub const END: SymbolId = SymbolId(1);
    pub const A_NONTERM: SymbolId = SymbolId(3);
    pub const A_TERM: SymbolId = SymbolId(4);

    pub fn grammar() -> StateMachine {
        StateMachine {
            symbols: base_symbols(&[
                ("A", SymbolKind::NonTerminal),
                ("a", SymbolKind::Terminal),
            ]),
            states: vec![
                // 0: missing the GOTO on A
                State {
                    transitions: vec![shift(A_TERM, 1)],
                },
                // 1: A -> a .
                State {
                    transitions: vec![reduce(END, A_NONTERM, 1, None)],
                },
            ],
            actions: vec![],
            start_state: StateId(0),
            start_symbol: START,
            end_symbol: END,
            error_symbol: SymbolId(2),
        }
    }
}

/// Machines exercising the individual branches of error recovery.
pub mod recovery {
    use super::*;

    pub const START: SymbolId = SymbolId(0);
    pub const END: SymbolId = SymbolId(1);
    pub const ERROR: SymbolId = SymbolId(2);
    pub const A_NONTERM: SymbolId = SymbolId(3);
    pub const A_TERM: SymbolId = SymbolId(4);
    pub const B_TERM: SymbolId = SymbolId(5);

    fn symbols() -> Vec<Symbol> {
        base_symbols(&[
            ("A", SymbolKind::NonTerminal),
            ("a", SymbolKind::Terminal),
            ("b", SymbolKind::Terminal),
        ])
    }

    /// Recovery hits a reduce-on-`error` straight to the start symbol,
    /// which must yield acceptance from inside the recovery loop.
    pub fn accepting_grammar() -> StateMachine {
        StateMachine {
            symbols: symbols(),
            states: vec![
                // 0
                State {
                    transitions: vec![shift(A_TERM, 1)],
                },
                // 1: error in the follow set reduces to the start symbol
                State {
                    transitions: vec![reduce(ERROR, START, 1, None)],
                },
            ],
            actions: vec![],
            start_state: StateId(0),
            start_symbol: START,
            end_symbol: END,
            error_symbol: ERROR,
        }
    }

    /// Recovery reduces once, pops the result, then shifts the `error`
    /// frame from the exposed state; the held lookahead shifts afterwards.
    pub fn unwinding_grammar() -> StateMachine {
        StateMachine {
            symbols: symbols(),
            states: vec![
                // 0
                State {
                    transitions: vec![shift(A_TERM, 1), shift(A_NONTERM, 2), shift(ERROR, 3)],
                },
                // 1: A -> a . with error in its follow set
                State {
                    transitions: vec![reduce(ERROR, A_NONTERM, 1, None)],
                },
                // 2: dead end for the lookahead, forcing a pop
                State {
                    transitions: vec![],
                },
                // 3: after the error frame, b can be shifted
                State {
                    transitions: vec![shift(B_TERM, 4)],
                },
                // 4
                State {
                    transitions: vec![],
                },
            ],
            actions: vec![],
            start_state: StateId(0),
            start_symbol: START,
            end_symbol: END,
            error_symbol: ERROR,
        }
    }
}

/// Replays a fixed `(symbol, lexeme)` sequence through the lexer façade;
/// `reset` rewinds to the first token regardless of the input text.
pub struct ScriptLexer {
    tokens: Vec<(SymbolId, &'static str)>,
    end: SymbolId,
    cursor: usize,
    current: Option<usize>,
}

impl ScriptLexer {
    pub fn new(end: SymbolId, tokens: Vec<(SymbolId, &'static str)>) -> Self {
        Self {
            tokens,
            end,
            cursor: 0,
            current: None,
        }
    }
}

impl Lexer for ScriptLexer {
    fn reset(&mut self, _input: &str) {
        self.cursor = 0;
        self.current = None;
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        if self.cursor < self.tokens.len() {
            self.current = Some(self.cursor);
            self.cursor += 1;
        } else {
            self.current = None;
        }
        Ok(())
    }

    fn symbol(&self) -> SymbolId {
        match self.current {
            Some(i) => self.tokens[i].0,
            None => self.end,
        }
    }

    fn lexeme(&self) -> &str {
        self.current.map(|i| self.tokens[i].1).unwrap_or("")
    }

    fn position(&self) -> Position {
        Position::new(0, self.current.unwrap_or(self.cursor))
    }

    fn full(&self) -> bool {
        self.cursor >= self.tokens.len()
    }
}

#[derive(Debug, Default)]
pub struct Record {
    pub errors: Vec<ParseError>,
    pub traces: Vec<String>,
}

/// Captures reported errors and rendered trace lines for assertions.
pub struct RecordingPolicy {
    record: Rc<RefCell<Record>>,
}

impl RecordingPolicy {
    pub fn new() -> (Self, Rc<RefCell<Record>>) {
        let record = Rc::new(RefCell::new(Record::default()));
        (
            Self {
                record: record.clone(),
            },
            record,
        )
    }
}

impl ErrorPolicy for RecordingPolicy {
    fn error(&mut self, error: &ParseError) {
        self.record.borrow_mut().errors.push(error.clone());
    }

    fn trace(&mut self, event: &TraceEvent<'_>) {
        self.record.borrow_mut().traces.push(event.to_string());
    }
}
