//! Read-only view of a compiled grammar.
//!
//! A [`StateMachine`] is the output of the external `lalrc` table compiler:
//! interned symbols, numbered states with their outgoing transitions, and
//! the action descriptors reductions can refer to. The runtime treats it as
//! a pure data oracle: it is never mutated, and several parsers may share
//! one machine concurrently. All cross-references are plain indices so the
//! tables can live anywhere (static data, generated code, deserialized
//! blobs) without lifetime coupling.

use smartstring::alias::String;

/// Index of a symbol interned in a [`StateMachine`].
///
/// The runtime compares symbols by this index only, never by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a state in a [`StateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateId(pub u32);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a grammar symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    /// The end-of-input marker.
    End,
    /// The distinguished nonterminal used by error recovery.
    Error,
}

/// An interned grammar symbol: a stable identifier plus its kind.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// What taking a transition does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Consume the lookahead and push a frame in `target`. Transitions on
    /// nonterminals are the GOTO entries taken after a reduction.
    Shift { target: StateId },
    /// Pop `length` frames and reduce the popped span to `symbol`.
    /// `action` selects the semantic callback; `None` means the default
    /// action.
    Reduce {
        symbol: SymbolId,
        length: usize,
        action: Option<usize>,
    },
}

/// An edge out of a state, keyed by its input symbol.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub on: SymbolId,
    pub kind: TransitionKind,
}

/// A parser state: its outgoing transitions, at most one per symbol.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub transitions: Vec<Transition>,
}

/// A reduction slot carrying the identifier user callbacks bind to.
#[derive(Debug, Clone)]
pub struct ActionDef {
    pub identifier: String,
}

impl ActionDef {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// The compiled grammar: everything the driver needs to run.
#[derive(Debug, Clone)]
pub struct StateMachine {
    pub symbols: Vec<Symbol>,
    pub states: Vec<State>,
    pub actions: Vec<ActionDef>,
    pub start_state: StateId,
    pub start_symbol: SymbolId,
    pub end_symbol: SymbolId,
    pub error_symbol: SymbolId,
}

impl StateMachine {
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.symbols[id.index()].name
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Looks up the unique transition out of `state` on `on`.
    ///
    /// Linear scan; states are small (tens of entries) and the tables are
    /// built so at most one entry matches. The first match wins.
    pub fn transition(&self, state: StateId, on: SymbolId) -> Option<&Transition> {
        self.states[state.index()]
            .transitions
            .iter()
            .find(|t| t.on == on)
    }

    /// Finds a symbol by its identifier. Construction-time convenience for
    /// clients binding a token source to the tables; the runtime itself
    /// only compares indices.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.name == name)
            .map(|i| SymbolId(i as u32))
    }
}
