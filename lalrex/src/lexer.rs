use crate::cursor::Position;
use crate::error::ParseError;
use crate::machine::SymbolId;
use smartstring::alias::String;

/// A lexer action callback: rewrites the raw text of a matched token before
/// the parser sees it (escape processing, separator stripping, and so on).
pub type LexerActionFn = Box<dyn FnMut(&str) -> String>;

/// Minimal contract the driver depends on from its token source.
///
/// The lexer is an opaque collaborator: the driver never looks at how
/// tokens are recognized, it only asks for the current token's symbol,
/// text and position. A lexer must present the machine's end-of-input
/// symbol once its input is consumed, and may keep presenting it forever.
pub trait Lexer {
    /// Rebind to a new input range and forget the current token.
    fn reset(&mut self, input: &str);

    /// Move to the next token. A no-op at end of input.
    ///
    /// A lexical error is returned to the driver, which forwards it to the
    /// error policy and keeps going with whatever symbol the lexer now
    /// presents (typically the end symbol). Lexical errors are orthogonal
    /// to parser errors and never reject a parse by themselves.
    fn advance(&mut self) -> Result<(), ParseError>;

    /// The current token's symbol; the end symbol after full consumption.
    fn symbol(&self) -> SymbolId;

    /// The current token's text.
    fn lexeme(&self) -> &str;

    /// The current input position.
    fn position(&self) -> Position;

    /// Whether all input was consumed by the lexer.
    fn full(&self) -> bool;

    /// Binds a callback to a named lexer rule. Unknown identifiers are a
    /// silent no-op, mirroring the parser-side action dispatcher; lexers
    /// without named rules can keep this default.
    fn set_action_handler(&mut self, identifier: &str, handler: LexerActionFn) {
        let _ = (identifier, handler);
    }
}
