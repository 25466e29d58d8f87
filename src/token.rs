//! Lexical tokens consumed by the extraction rules.
//!
//! Tokens come from an external tokenizer (see [`crate::lexer`]) as a
//! forward-only stream. The extraction code never re-scans a token once it
//! has been consumed, so streams may be lazy and arbitrarily long.

use serde::{Deserialize, Serialize};

/// Classification of a lexical token.
///
/// This is the minimal kind set the extraction rules dispatch on; a richer
/// tokenizer may fold its own categories into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// A LilyPond keyword command (`\version`, `\include`).
    Keyword,
    /// Any other backslash command (`\bookOutputName`, `\relative`, ...).
    Command,
    /// A word inside a Scheme expression.
    SchemeIdentifier,
    /// The `#` that switches into Scheme.
    SchemeStart,
    /// A `"` string delimiter; used for both the opening and closing quote.
    Quote,
    /// A run of whitespace.
    Space,
    /// A line or block comment, delimiters included.
    Comment,
    /// A bare word, including text inside a quoted string.
    Word,
    /// Any other punctuation or unclassified character.
    Punct,
}

/// A classified lexical unit: a kind tag plus the exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Kind-and-text equality, the trigger test of every extraction rule.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    /// Whether this token is skipped when looking for a command argument.
    pub fn is_insignificant(&self) -> bool {
        matches!(self.kind, TokenKind::Space | TokenKind::Comment)
    }
}
