//! Parse tables for the calculator grammar.
//!
//! This module plays the role of `lalrc` output: the LALR(1) automaton for
//!
//! ```text
//! S -> E
//! E -> E + E      { add }
//! E -> E * E      { multiply }
//! E -> ( E )     { group }
//! E -> NUM        { number }
//! E -> error
//! ```
//!
//! laid out state by state in the shape the generator emits. The grammar is
//! ambiguous on purpose; its shift/reduce conflicts are already resolved in
//! the tables (`+` and `*` left-associative, `*` binding tighter), so the
//! runtime never sees them. The `error` production is anchored at the start
//! state only, which is where recovery rejoins the grammar.

use lalrex::{
    ActionDef, State, StateId, StateMachine, Symbol, SymbolId, SymbolKind, Transition,
    TransitionKind,
};

pub const START: SymbolId = SymbolId(0);
pub const END: SymbolId = SymbolId(1);
pub const ERROR: SymbolId = SymbolId(2);
pub const EXPR: SymbolId = SymbolId(3);
pub const NUM: SymbolId = SymbolId(4);
pub const PLUS: SymbolId = SymbolId(5);
pub const STAR: SymbolId = SymbolId(6);
pub const LPAREN: SymbolId = SymbolId(7);
pub const RPAREN: SymbolId = SymbolId(8);

const NUMBER: usize = 0; // E -> NUM
const ADD: usize = 1; // E -> E + E
const MULTIPLY: usize = 2; // E -> E * E
const GROUP: usize = 3; // E -> ( E )

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

/// Builds the calculator state machine.
pub fn state_machine() -> StateMachine {
    StateMachine {
        symbols: vec![
            Symbol::new("S", SymbolKind::NonTerminal),
            Symbol::new("$", SymbolKind::End),
            Symbol::new("error", SymbolKind::Error),
            Symbol::new("E", SymbolKind::NonTerminal),
            Symbol::new("NUM", SymbolKind::Terminal),
            Symbol::new("+", SymbolKind::Terminal),
            Symbol::new("*", SymbolKind::Terminal),
            Symbol::new("(", SymbolKind::Terminal),
            Symbol::new(")", SymbolKind::Terminal),
        ],
        states: vec![
            // 0: S -> . E
            State {
                transitions: vec![
                    shift(NUM, 3),
                    shift(LPAREN, 2),
                    shift(ERROR, 4),
                    shift(EXPR, 1),
                ],
            },
            // 1: S -> E . ; E -> E . + E ; E -> E . * E
            State {
                transitions: vec![
                    shift(PLUS, 5),
                    shift(STAR, 6),
                    reduce(END, START, 1, None),
                ],
            },
            // 2: E -> ( . E )
            State {
                transitions: vec![shift(NUM, 3), shift(LPAREN, 2), shift(EXPR, 7)],
            },
            // 3: E -> NUM .
            State {
                transitions: vec![
                    reduce(PLUS, EXPR, 1, Some(NUMBER)),
                    reduce(STAR, EXPR, 1, Some(NUMBER)),
                    reduce(RPAREN, EXPR, 1, Some(NUMBER)),
                    reduce(END, EXPR, 1, Some(NUMBER)),
                ],
            },
            // 4: E -> error .
            State {
                transitions: vec![
                    reduce(PLUS, EXPR, 1, None),
                    reduce(STAR, EXPR, 1, None),
                    reduce(RPAREN, EXPR, 1, None),
                    reduce(END, EXPR, 1, None),
                ],
            },
            // 5: E -> E + . E
            State {
                transitions: vec![shift(NUM, 3), shift(LPAREN, 2), shift(EXPR, 8)],
            },
            // 6: E -> E * . E
            State {
                transitions: vec![shift(NUM, 3), shift(LPAREN, 2), shift(EXPR, 9)],
            },
            // 7: E -> ( E . ) ; E -> E . + E ; E -> E . * E
            State {
                transitions: vec![shift(PLUS, 5), shift(STAR, 6), shift(RPAREN, 10)],
            },
            // 8: E -> E + E . ; E -> E . + E ; E -> E . * E
            //    reduce on + (left associativity), shift on * (precedence)
            State {
                transitions: vec![
                    reduce(PLUS, EXPR, 3, Some(ADD)),
                    shift(STAR, 6),
                    reduce(RPAREN, EXPR, 3, Some(ADD)),
                    reduce(END, EXPR, 3, Some(ADD)),
                ],
            },
            // 9: E -> E * E . ; E -> E . + E ; E -> E . * E
            //    reduce on + and * (precedence, left associativity)
            State {
                transitions: vec![
                    reduce(PLUS, EXPR, 3, Some(MULTIPLY)),
                    reduce(STAR, EXPR, 3, Some(MULTIPLY)),
                    reduce(RPAREN, EXPR, 3, Some(MULTIPLY)),
                    reduce(END, EXPR, 3, Some(MULTIPLY)),
                ],
            },
            // 10: E -> ( E ) .
            State {
                transitions: vec![
                    reduce(PLUS, EXPR, 3, Some(GROUP)),
                    reduce(STAR, EXPR, 3, Some(GROUP)),
                    reduce(RPAREN, EXPR, 3, Some(GROUP)),
                    reduce(END, EXPR, 3, Some(GROUP)),
                ],
            },
        ],
        actions: vec![
            ActionDef::new("number"),
            ActionDef::new("add"),
            ActionDef::new("multiply"),
            ActionDef::new("group"),
        ],
        start_state: StateId(0),
        start_symbol: START,
        end_symbol: END,
        error_symbol: ERROR,
    }
}
