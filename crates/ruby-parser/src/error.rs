//! Syntax errors with caret-annotated source excerpts.

use thiserror::Error;

/// The single error surface of the parser.
///
/// The rendered message carries everything a consumer needs:
/// `FILE#LINE: syntax error, unexpected <kind> '<lit>' (expected: '<x>')`
/// followed by the offending source line and a caret under the column.
/// The lexer never produces one of these — it encodes failure in token
/// kinds, and the parser raises when it meets such a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
}

/// Coarse discriminant for programmatic matching; the message is the
/// authoritative rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Wrong token kind at this position
    UnexpectedToken,
    /// Input ended mid-construct
    UnexpectedEof,
    /// String/regexp/word-array never met its closing delimiter
    UnterminatedLiteral,
    /// `\x`/`\c`-style escape the string grammar rejects
    InvalidCharacterEscape,
    /// `\u` escape the string grammar rejects
    InvalidUnicodeEscape,
    /// A character the lexer could not tokenize at all
    InvalidInput,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(target: "ruby_parser", %message, "syntax error");
        SyntaxError { kind, message }
    }
}
