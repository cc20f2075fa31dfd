//! The shift/reduce driver.
//!
//! [`Parser`] interprets a [`StateMachine`] over a [`Lexer`]: it performs
//! every reduction the tables allow on the current lookahead, then shifts,
//! and falls into yacc-style recovery when neither applies. Reductions call
//! semantic action callbacks bound by identifier; the value returned by the
//! callback rides on the synthesized frame and the value of the final frame
//! is the result of an accepted parse.

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::machine::{StateId, StateMachine, SymbolId, TransitionKind};
use crate::policy::{ErrorPolicy, TraceEvent};
use smartstring::alias::String;
use std::collections::HashMap;
use std::mem;

/// Initial frame capacity; parses deeper than this just reallocate.
const STACK_CAPACITY: usize = 64;

/// A semantic action callback. Receives a read-only view of the frames
/// being reduced, left to right, and returns the user-data value for the
/// produced nonterminal. Callbacks cannot mutate the stack.
pub type ActionFn<U> = Box<dyn FnMut(&[Node<U>]) -> U>;

/// One stack frame: the state entered, the symbol that led into it, the
/// lexeme it carried (empty for nonterminals), and its user-data value.
///
/// The bottom frame is a sentinel holding the start state and no symbol;
/// it is never popped by a reduction.
#[derive(Debug, Clone)]
pub struct Node<U> {
    state: StateId,
    symbol: Option<SymbolId>,
    lexeme: String,
    value: U,
}

impl<U> Node<U> {
    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn value(&self) -> &U {
        &self.value
    }
}

/// What the driver does with the lookahead after a handled recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Retry the same lookahead against the post-recovery state. This is
    /// the historical behavior; if the lookahead still cannot be shifted
    /// the driver immediately re-enters recovery, which can cycle on
    /// pathological tables.
    #[default]
    HoldLookahead,
    /// Discard the offending lookahead once the `error` frame is shifted,
    /// guaranteeing forward progress through the input.
    DiscardLookahead,
}

/// Counters for one parse run, cleared by [`Parser::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Lookahead tokens fetched by `parse`.
    pub tokens: usize,
    /// Frames pushed for terminals, including `error` frames.
    pub shifts: usize,
    /// Reductions performed, not counting the accepting one.
    pub reduces: usize,
    /// Errors reported through the policy.
    pub errors: usize,
}

/// Callback slots parallel to the machine's action list, plus the
/// identifier lookup built once at construction and the optional fallback.
struct Actions<U> {
    slots: Vec<Option<ActionFn<U>>>,
    index: HashMap<String, usize>,
    fallback: Option<ActionFn<U>>,
}

impl<U: Default> Actions<U> {
    fn new(machine: &StateMachine) -> Self {
        let mut index = HashMap::with_capacity(machine.actions.len());
        for (i, action) in machine.actions.iter().enumerate() {
            // First occurrence wins for duplicate identifiers.
            index.entry(action.identifier.clone()).or_insert(i);
        }
        let mut slots = Vec::new();
        slots.resize_with(machine.actions.len(), || None);
        Self {
            slots,
            index,
            fallback: None,
        }
    }

    /// Rebinding an unknown identifier is a silent no-op: the grammar may
    /// have evolved and stale bindings must not fail.
    fn bind(&mut self, identifier: &str, handler: ActionFn<U>) {
        if let Some(&i) = self.index.get(identifier) {
            self.slots[i] = Some(handler);
        }
    }

    fn bind_fallback(&mut self, handler: ActionFn<U>) {
        self.fallback = Some(handler);
    }

    fn invoke(&mut self, action: Option<usize>, frames: &[Node<U>]) -> U {
        if let Some(i) = action {
            if let Some(Some(handler)) = self.slots.get_mut(i) {
                return handler(frames);
            }
        }
        match self.fallback.as_mut() {
            Some(handler) => handler(frames),
            None => U::default(),
        }
    }
}

enum Recovery {
    Handled,
    Accepted,
    Failed,
}

/// The table-driven LALR(1) driver.
///
/// Borrows its [`StateMachine`] immutably, so any number of parsers can
/// share one set of tables; owns its lexer and its stack. Single-threaded:
/// callbacks and policy hooks run inline on the driving thread.
pub struct Parser<'m, L, U> {
    machine: &'m StateMachine,
    lexer: L,
    stack: Vec<Node<U>>,
    actions: Actions<U>,
    policy: Option<Box<dyn ErrorPolicy>>,
    recovery: RecoveryMode,
    debug: bool,
    accepted: bool,
    rejected: bool,
    full: bool,
    stats: ParserStats,
}

impl<'m, L, U> Parser<'m, L, U>
where
    L: Lexer,
    U: Default,
{
    pub fn new(machine: &'m StateMachine, lexer: L) -> Self {
        let mut parser = Self {
            machine,
            lexer,
            stack: Vec::with_capacity(STACK_CAPACITY),
            actions: Actions::new(machine),
            policy: None,
            recovery: RecoveryMode::default(),
            debug: false,
            accepted: false,
            rejected: false,
            full: false,
            stats: ParserStats::default(),
        };
        parser.reset();
        parser
    }

    pub fn with_policy(
        machine: &'m StateMachine,
        lexer: L,
        policy: Box<dyn ErrorPolicy>,
    ) -> Self {
        let mut parser = Self::new(machine, lexer);
        parser.policy = Some(policy);
        parser
    }

    /// Truncates the stack to the start-state sentinel and clears all
    /// latches and counters. Action bindings persist across resets.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Node {
            state: self.machine.start_state,
            symbol: None,
            lexeme: String::new(),
            value: U::default(),
        });
        self.accepted = false;
        self.rejected = false;
        self.full = false;
        self.stats = ParserStats::default();
    }

    /// Resets, rebinds the lexer to `input`, and runs to completion.
    pub fn parse(&mut self, input: &str) {
        self.reset();
        self.lexer.reset(input);
        loop {
            if let Err(error) = self.lexer.advance() {
                self.stats.errors += 1;
                emit_error(&mut self.policy, &error);
            }
            self.stats.tokens += 1;
            let symbol = self.lexer.symbol();
            let lexeme: String = self.lexer.lexeme().into();
            if !self.step(symbol, &lexeme) {
                break;
            }
        }
        self.full = self.lexer.full();
    }

    /// Advances the parse by one lookahead: performs every applicable
    /// reduction, then the shift. Returns `false` once parsing has
    /// terminated (accepted or rejected); while it returns `true` the
    /// caller owns fetching the next token.
    pub fn step(&mut self, symbol: SymbolId, lexeme: &str) -> bool {
        if self.accepted || self.rejected {
            return false;
        }
        loop {
            let kind = self
                .machine
                .transition(self.top_state(), symbol)
                .map(|t| t.kind);
            match kind {
                Some(TransitionKind::Reduce {
                    symbol: reduced,
                    length,
                    action,
                }) => {
                    if reduced == self.machine.start_symbol {
                        self.accept();
                        return false;
                    }
                    if !self.reduce(reduced, length, action) {
                        return false;
                    }
                }
                Some(TransitionKind::Shift { target }) => {
                    self.shift(target, symbol, lexeme.into());
                    return true;
                }
                None => match self.recover(lexeme) {
                    Recovery::Handled => match self.recovery {
                        RecoveryMode::HoldLookahead => continue,
                        RecoveryMode::DiscardLookahead => return true,
                    },
                    Recovery::Accepted | Recovery::Failed => return false,
                },
            }
        }
    }

    /// Whether the last step produced a start-symbol reduction.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Whether the parse terminated without acceptance.
    pub fn rejected(&self) -> bool {
        self.rejected
    }

    /// Whether the lexer reported its input fully consumed. Set only at
    /// the end of [`Parser::parse`]; drivers using [`Parser::step`] alone
    /// should consult their own token source instead.
    pub fn full(&self) -> bool {
        self.full
    }

    /// The accepted start symbol's user data; `None` unless the parse was
    /// accepted.
    pub fn user_data(&self) -> Option<&U> {
        if self.accepted {
            self.stack.last().map(Node::value)
        } else {
            None
        }
    }

    /// Moves the accepted user data out, leaving a default in its place.
    pub fn take_user_data(&mut self) -> Option<U> {
        if !self.accepted {
            return None;
        }
        self.stack.last_mut().map(|node| mem::take(&mut node.value))
    }

    /// Current input position, delegated to the lexer.
    pub fn position(&self) -> crate::cursor::Position {
        self.lexer.position()
    }

    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }

    pub fn machine(&self) -> &'m StateMachine {
        self.machine
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    pub fn lexer_mut(&mut self) -> &mut L {
        &mut self.lexer
    }

    /// Binds `handler` to the reduction action named `identifier`.
    /// Unknown identifiers are a silent no-op.
    pub fn set_action_handler<F>(&mut self, identifier: &str, handler: F)
    where
        F: FnMut(&[Node<U>]) -> U + 'static,
    {
        self.actions.bind(identifier, Box::new(handler));
    }

    /// Installs the fallback invoked for reductions with no bound (or no)
    /// action.
    pub fn set_default_action_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&[Node<U>]) -> U + 'static,
    {
        self.actions.bind_fallback(Box::new(handler));
    }

    /// Forwards a lexeme-rewriting callback to the lexer façade.
    pub fn set_lexer_action_handler<F>(&mut self, identifier: &str, handler: F)
    where
        F: FnMut(&str) -> String + 'static,
    {
        self.lexer.set_action_handler(identifier, Box::new(handler));
    }

    pub fn set_error_policy(&mut self, policy: Box<dyn ErrorPolicy>) {
        self.policy = Some(policy);
    }

    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn set_recovery_mode(&mut self, mode: RecoveryMode) {
        self.recovery = mode;
    }

    pub fn recovery_mode(&self) -> RecoveryMode {
        self.recovery
    }

    fn top_state(&self) -> StateId {
        self.stack
            .last()
            .map(|node| node.state)
            .unwrap_or(self.machine.start_state)
    }

    fn shift(&mut self, target: StateId, symbol: SymbolId, lexeme: String) {
        if self.debug {
            let event = TraceEvent::Shift {
                symbol: self.machine.symbol_name(symbol),
                lexeme: &lexeme,
            };
            emit_trace(&mut self.policy, &event);
        }
        self.stack.push(Node {
            state: target,
            symbol: Some(symbol),
            lexeme,
            value: U::default(),
        });
        self.stats.shifts += 1;
    }

    /// Pops `length` frames, invokes the action over the popped span, and
    /// pushes the synthesized frame through the GOTO transition. Returns
    /// `false` when the tables turn out to be inconsistent with the stack.
    fn reduce(&mut self, reduced: SymbolId, length: usize, action: Option<usize>) -> bool {
        if length + 1 > self.stack.len() {
            // Would pop the sentinel; the tables cannot mean this.
            self.report_unexpected(reduced);
            return false;
        }
        let start = self.stack.len() - length;
        let value = {
            let frames = &self.stack[start..];
            if self.debug {
                let event = TraceEvent::Reduce {
                    symbol: self.machine.symbol_name(reduced),
                    frames: frames
                        .iter()
                        .map(|node| {
                            let name = node
                                .symbol
                                .map(|s| self.machine.symbol_name(s))
                                .unwrap_or("");
                            (name, node.lexeme.as_str())
                        })
                        .collect(),
                };
                emit_trace(&mut self.policy, &event);
            }
            self.actions.invoke(action, frames)
        };
        self.stack.truncate(start);
        self.stats.reduces += 1;
        match self
            .machine
            .transition(self.top_state(), reduced)
            .map(|t| t.kind)
        {
            Some(TransitionKind::Shift { target }) => {
                self.stack.push(Node {
                    state: target,
                    symbol: Some(reduced),
                    lexeme: String::new(),
                    value,
                });
                true
            }
            _ => {
                self.report_unexpected(reduced);
                false
            }
        }
    }

    /// The accepting start-symbol reduction: the stack is `[sentinel,
    /// final]`; drop the sentinel and keep the final frame as the result.
    fn accept(&mut self) {
        if let Some(node) = self.stack.pop() {
            self.stack.clear();
            self.stack.push(node);
        }
        self.accepted = true;
        log::trace!("accepted with stack depth {}", self.stack.len());
    }

    /// Yacc-style recovery: unwind until the `error` nonterminal can be
    /// shifted or reduced. Reports exactly one syntax error per episode,
    /// on entry; exhausting the stack rejects without a second report.
    fn recover(&mut self, lexeme: &str) -> Recovery {
        self.stats.errors += 1;
        let error = ParseError::Syntax {
            position: self.lexer.position(),
            lexeme: lexeme.into(),
        };
        emit_error(&mut self.policy, &error);
        log::trace!("recovering from syntax error near {lexeme:?}");

        let error_symbol = self.machine.error_symbol;
        while !self.stack.is_empty() {
            match self
                .machine
                .transition(self.top_state(), error_symbol)
                .map(|t| t.kind)
            {
                Some(TransitionKind::Shift { target }) => {
                    self.shift(target, error_symbol, String::new());
                    return Recovery::Handled;
                }
                Some(TransitionKind::Reduce {
                    symbol: reduced,
                    length,
                    action,
                }) => {
                    if reduced == self.machine.start_symbol {
                        self.accept();
                        return Recovery::Accepted;
                    }
                    if !self.reduce(reduced, length, action) {
                        return Recovery::Failed;
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        self.rejected = true;
        Recovery::Failed
    }

    fn report_unexpected(&mut self, symbol: SymbolId) {
        let error = ParseError::Unexpected {
            position: self.lexer.position(),
            symbol: self.machine.symbol_name(symbol).into(),
        };
        self.stats.errors += 1;
        emit_error(&mut self.policy, &error);
        self.rejected = true;
    }
}

fn emit_error(policy: &mut Option<Box<dyn ErrorPolicy>>, error: &ParseError) {
    match policy {
        Some(policy) => policy.error(error),
        None => log::error!("{error}"),
    }
}

fn emit_trace(policy: &mut Option<Box<dyn ErrorPolicy>>, event: &TraceEvent<'_>) {
    match policy {
        Some(policy) => policy.trace(event),
        None => println!("{event}"),
    }
}
