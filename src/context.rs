//! Process-wide shared state for the analysis engine.
//!
//! One [`Context`] is constructed at startup and handed to every
//! [`DocumentInfo`](crate::docinfo::DocumentInfo) by `Arc`. It owns the lexer, the
//! configuration and the two shared file caches, making every dependency
//! explicit instead of hiding them in module globals.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::cache::FileCache;
use crate::config::Config;
use crate::error::Result;
use crate::extract::{self, OutputArg};
use crate::lexer::{Lexer, LilypondLexer};
use crate::mode::{self, Mode};
use crate::utils;

pub struct Context {
    lexer: Box<dyn Lexer>,
    config: RwLock<Config>,
    include_args: FileCache<Vec<String>>,
    output_args: FileCache<Vec<OutputArg>>,
}

impl Context {
    /// Context with the built-in reference lexer.
    pub fn new(config: Config) -> Self {
        Self::with_lexer(config, Box::new(LilypondLexer))
    }

    /// Context with a host-provided lexer.
    pub fn with_lexer(config: Config, lexer: Box<dyn Lexer>) -> Self {
        Self {
            lexer,
            config: RwLock::new(config),
            include_args: FileCache::new(),
            output_args: FileCache::new(),
        }
    }

    pub fn lexer(&self) -> &dyn Lexer {
        self.lexer.as_ref()
    }

    /// The configured include search path. Currently identical for every
    /// document.
    pub fn include_path(&self) -> Vec<PathBuf> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .include_path
            .clone()
    }

    /// Replaces the configuration, e.g. after the host's settings change.
    /// Cached file facts stay valid; they depend on file content only.
    pub fn set_config(&self, config: Config) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
    }

    /// Classifies the dialect of a text. See [`mode::classify_text`].
    pub fn classify_text(&self, text: &str, guess: bool) -> Option<Mode> {
        mode::classify_text(self.lexer.as_ref(), text, guess)
    }

    /// Dialect of a text, guessing when nothing is declared.
    pub fn mode_of_text(&self, text: &str) -> Mode {
        self.classify_text(text, true).unwrap_or(Mode::Lilypond)
    }

    /// The `\include` arguments of a file on disk, cached until the file's
    /// mtime changes.
    pub fn include_args_in_file(&self, path: &Path) -> Result<Vec<String>> {
        self.include_args.get_or_compute(path, |p| {
            let text = utils::read_file_text(p)?;
            let mode = self.mode_of_text(&text);
            Ok(extract::include_args(self.lexer.tokens(mode, &text)).collect())
        })
    }

    /// The output-naming arguments of a file on disk, cached until the
    /// file's mtime changes.
    pub fn output_args_in_file(&self, path: &Path) -> Result<Vec<OutputArg>> {
        self.output_args.get_or_compute(path, |p| {
            let text = utils::read_file_text(p)?;
            let mode = self.mode_of_text(&text);
            Ok(extract::output_args(self.lexer.tokens(mode, &text)).collect())
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
