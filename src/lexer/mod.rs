//! Tokenization seam between the editor's lexer and the analysis engine.
//!
//! The engine only consumes token streams; it does not own a full grammar
//! for any dialect. [`LilypondLexer`] is the reference implementation: a
//! [`logos`]-based tokenizer covering exactly what the extraction rules
//! dispatch on (commands, comments, string delimiters, scheme context).
//! Editor shells with their own tokenizer implement [`Lexer`] instead.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mode::Mode;
use crate::token::Token;

pub mod lilypond;

/// A lazy, forward-only token stream borrowed from the source text.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token> + 'a>;

/// External tokenizer capability consumed by the analysis engine.
pub trait Lexer: Send + Sync {
    /// Tokenizes `text` as the given dialect.
    fn tokens<'a>(&self, mode: Mode, text: &'a str) -> TokenStream<'a>;

    /// Content-based dialect heuristic. Always yields a mode; when nothing
    /// else matches, the answer is [`Mode::Lilypond`].
    fn guess_mode(&self, text: &str) -> Mode;
}

/// The built-in reference lexer.
///
/// Only lilypond mode gets a structured token stream; the other dialects
/// tokenize to a plain word/space stream, which deliberately carries no
/// extraction triggers (version detection for those documents goes through
/// the raw-text fallback instead).
#[derive(Debug, Default, Clone, Copy)]
pub struct LilypondLexer;

impl Lexer for LilypondLexer {
    fn tokens<'a>(&self, mode: Mode, text: &'a str) -> TokenStream<'a> {
        match mode {
            Mode::Lilypond => Box::new(lilypond::tokens(text)),
            _ => Box::new(lilypond::plain_tokens(text)),
        }
    }

    fn guess_mode(&self, text: &str) -> Mode {
        guess_mode(text)
    }
}

/// How much leading text the heuristic looks at.
const GUESS_WINDOW: usize = 5000;

static LATEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\documentclass\b|\\begin\{document\}").unwrap());
static TEXINFO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\input texinfo\b|@(?:node|menu|ifinfo|settitle)\b").unwrap());
static DOCBOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<!DOCTYPE\s+(?:book|article|chapter)\b|xmlns(?::\w+)?=.docbook\.org")
        .unwrap()
});
static HTML_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE\s+html|<html\b|<body\b|</\w+>").unwrap());

/// Content-based dialect heuristic over the leading part of a document.
pub fn guess_mode(text: &str) -> Mode {
    let mut end = text.len().min(GUESS_WINDOW);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let window = &text[..end];
    if LATEX_RE.is_match(window) {
        Mode::Latex
    } else if TEXINFO_RE.is_match(window) {
        Mode::Texinfo
    } else if DOCBOOK_RE.is_match(window) {
        Mode::Docbook
    } else if HTML_RE.is_match(window) {
        Mode::Html
    } else {
        Mode::Lilypond
    }
}
