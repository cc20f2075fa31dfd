use lalrex::ParseError;
use regex_automata::dfa::dense::BuildError;
use regex_automata::MatchError;
use thiserror::Error;

/// Unified error surface for the calculator.
///
/// Construction failures come from assembling the lexer automaton; runtime
/// failures carry the first error the parser reported through its policy.
#[derive(Debug, Error)]
pub enum CalcError {
    /// The lexer automaton could not be built from its patterns.
    #[error("cannot build lexer automaton: {0}")]
    Automaton(#[from] BuildError),

    /// The lexer automaton has no usable anchored start state.
    #[error("cannot prime lexer automaton: {0}")]
    Start(#[from] MatchError),

    /// The input did not evaluate cleanly; carries the first reported
    /// syntax or lexical error.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
