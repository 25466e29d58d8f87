//! Extraction of structured directives from a token stream.
//!
//! All three rules share one shape: find a trigger token, skip
//! insignificant tokens, expect a string start, collect until the matching
//! terminator. The stream is consumed by a single forward-only
//! [`TokenCursor`]; nothing is ever re-scanned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenKind};

/// A declared version: an ordered run of non-negative integers.
///
/// Parsed from the digit groups of the raw text, so `"2.18.2"` becomes
/// `2.18.2` and text without digits becomes the empty version.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub Vec<u32>);

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

// Matches a `\version "X.Y[.Z]"` string anywhere in raw text, including
// inside comments or foreign markup where no token-level match exists.
static VERSION_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\\version\s*"(\d+\.\d+(?:\.\d+)*)""#).unwrap());

impl Version {
    /// Parses the digit groups out of arbitrary text. Non-numeric text
    /// yields the empty version rather than an error.
    pub fn parse(text: &str) -> Self {
        Version(
            DIGIT_RUNS
                .find_iter(text)
                .filter_map(|m| m.as_str().parse().ok())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

/// Which output-naming directive produced an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// `\bookOutputName`: the argument replaces the output stem.
    Name,
    /// `\bookOutputSuffix` / `output-suffix`: the argument is appended to
    /// the job stem with a `-` separator.
    Suffix,
}

/// An output-naming directive argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArg {
    pub kind: OutputKind,
    pub value: String,
}

/// Forward-only cursor over a token stream.
///
/// The extraction rules interleave an outer trigger scan with inner
/// argument collection over the same stream position, so the cursor is the
/// single owner of that position.
pub struct TokenCursor<I: Iterator<Item = Token>> {
    tokens: I,
}

impl<I: Iterator<Item = Token>> TokenCursor<I> {
    pub fn new(tokens: I) -> Self {
        Self { tokens }
    }

    pub fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Advances past space and comment tokens, returning the first
    /// significant token (consumed).
    pub fn next_significant(&mut self) -> Option<Token> {
        self.tokens.by_ref().find(|t| !t.is_insignificant())
    }

    /// Like [`next_significant`](Self::next_significant) with a custom skip
    /// set.
    pub fn next_skipping(&mut self, skip: impl Fn(&Token) -> bool) -> Option<Token> {
        self.tokens.by_ref().find(|t| !skip(t))
    }

    /// Collects token text up to the closing quote (exclusive). A stream
    /// that ends first yields whatever was collected.
    pub fn collect_quoted(&mut self) -> String {
        let mut out = String::new();
        for token in self.tokens.by_ref() {
            if token.kind == TokenKind::Quote {
                break;
            }
            out.push_str(&token.text);
        }
        out
    }

    /// Collects token text starting with `first` up to the next space or
    /// comment (exclusive).
    pub fn collect_bare(&mut self, first: Token) -> String {
        let mut out = first.text;
        for token in self.tokens.by_ref() {
            if token.is_insignificant() {
                break;
            }
            out.push_str(&token.text);
        }
        out
    }
}

/// Extracts the first `\version` declaration from a token stream.
///
/// Returns `None` when no `\version` keyword appears at all; a keyword with
/// a malformed argument yields an empty [`Version`]. The scan stops at the
/// first occurrence.
pub fn version<I: IntoIterator<Item = Token>>(tokens: I) -> Option<Version> {
    let mut cursor = TokenCursor::new(tokens.into_iter());
    while let Some(token) = cursor.next() {
        if !token.is(TokenKind::Keyword, "\\version") {
            continue;
        }
        let text = match cursor.next_significant() {
            Some(t) if t.kind == TokenKind::Quote => cursor.collect_quoted(),
            Some(t) => cursor.collect_bare(t),
            None => String::new(),
        };
        return Some(Version::parse(&text));
    }
    None
}

/// Searches raw text for a quoted `\version` string. Fallback for
/// non-lilypond documents where the tokenizer produces no keyword tokens.
pub fn version_in_text(text: &str) -> Option<Version> {
    VERSION_IN_TEXT
        .captures(text)
        .map(|caps| Version::parse(&caps[1]))
}

/// True when the stream contains an `\include` keyword. Short-circuits on
/// the first match.
pub fn has_include<I: IntoIterator<Item = Token>>(tokens: I) -> bool {
    tokens
        .into_iter()
        .any(|t| t.is(TokenKind::Keyword, "\\include"))
}

/// Lazily yields the quoted arguments of all `\include` commands.
///
/// An `\include` not followed by a quoted argument yields nothing for that
/// occurrence; scanning resumes at the current stream position.
pub fn include_args<I: IntoIterator<Item = Token>>(tokens: I) -> IncludeArgs<I::IntoIter> {
    IncludeArgs {
        cursor: TokenCursor::new(tokens.into_iter()),
    }
}

pub struct IncludeArgs<I: Iterator<Item = Token>> {
    cursor: TokenCursor<I>,
}

impl<I: Iterator<Item = Token>> Iterator for IncludeArgs<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(token) = self.cursor.next() {
            if !token.is(TokenKind::Keyword, "\\include") {
                continue;
            }
            match self.cursor.next_significant() {
                Some(t) if t.kind == TokenKind::Quote => {
                    return Some(self.cursor.collect_quoted());
                }
                // unquoted form (`\include \language`...): skip it
                _ => continue,
            }
        }
        None
    }
}

/// Lazily yields the arguments of `\bookOutputName`, `\bookOutputSuffix`
/// and scheme `output-suffix` directives.
pub fn output_args<I: IntoIterator<Item = Token>>(tokens: I) -> OutputArgs<I::IntoIter> {
    OutputArgs {
        cursor: TokenCursor::new(tokens.into_iter()),
    }
}

pub struct OutputArgs<I: Iterator<Item = Token>> {
    cursor: TokenCursor<I>,
}

impl<I: Iterator<Item = Token>> Iterator for OutputArgs<I> {
    type Item = OutputArg;

    fn next(&mut self) -> Option<OutputArg> {
        while let Some(token) = self.cursor.next() {
            let kind = match token.kind {
                TokenKind::Command if token.text == "\\bookOutputName" => OutputKind::Name,
                TokenKind::Command if token.text == "\\bookOutputSuffix" => OutputKind::Suffix,
                TokenKind::SchemeIdentifier if token.text == "output-suffix" => OutputKind::Suffix,
                _ => continue,
            };
            let skip =
                |t: &Token| t.is_insignificant() || t.kind == TokenKind::SchemeStart;
            match self.cursor.next_skipping(skip) {
                Some(t) if t.kind == TokenKind::Quote => {
                    return Some(OutputArg {
                        kind,
                        value: self.cursor.collect_quoted(),
                    });
                }
                _ => continue,
            }
        }
        None
    }
}
