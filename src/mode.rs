//! Markup dialect classification.
//!
//! A document's mode is decided by an explicit `mode` document variable
//! first, then (when guessing is allowed) by the lexer's content heuristic.
//! The mode is deliberately never cached: it depends on a settable variable
//! as well as content, and reading it fresh is cheap.

use serde::{Deserialize, Serialize};

use crate::lexer::Lexer;
use crate::variables;

/// Supported markup dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// LilyPond music notation
    Lilypond,
    /// HTML, possibly with embedded lilypond sections
    Html,
    /// Texinfo documents
    Texinfo,
    /// LaTeX documents
    Latex,
    /// DocBook XML
    Docbook,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Lilypond,
        Mode::Html,
        Mode::Texinfo,
        Mode::Latex,
        Mode::Docbook,
    ];

    /// The canonical lowercase name, as written in a `mode:` variable.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Lilypond => "lilypond",
            Mode::Html => "html",
            Mode::Texinfo => "texinfo",
            Mode::Latex => "latex",
            Mode::Docbook => "docbook",
        }
    }

    /// Parse a declared mode name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Mode::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// File extension used when materializing a buffer of this mode to the
    /// scratch area.
    pub fn scratch_extension(self) -> &'static str {
        match self {
            Mode::Lilypond => "ly",
            Mode::Html => "html",
            Mode::Texinfo => "texi",
            Mode::Latex => "tex",
            Mode::Docbook => "xml",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies the markup dialect of a text.
///
/// An explicit, valid `mode` document variable always wins. Without one,
/// the lexer's content heuristic is consulted, but only when `guess` is
/// true; with `guess` false the result is `None` even when the heuristic
/// would succeed. Callers that need "declared or nothing" rely on that.
pub fn classify_text(lexer: &dyn Lexer, text: &str, guess: bool) -> Option<Mode> {
    if let Some(declared) = variables::get(text, "mode") {
        if let Some(mode) = Mode::from_name(declared.trim()) {
            return Some(mode);
        }
        tracing::debug!(declared, "ignoring unknown mode variable");
    }
    if guess {
        Some(lexer.guess_mode(text))
    } else {
        None
    }
}
