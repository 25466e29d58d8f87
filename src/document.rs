//! Editor buffer seam.
//!
//! The engine does not own documents; the editor shell does. [`Document`]
//! is the minimal surface the analysis needs from a live buffer.
//! [`TextDocument`] is a plain in-memory implementation for embedders
//! without a richer buffer type, and for tests.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::token::Token;

/// A live text buffer as seen by the analysis engine.
///
/// Whoever mutates the buffer's text is responsible for calling
/// [`DocumentInfo::contents_changed`](crate::docinfo::DocumentInfo::contents_changed)
/// afterwards; the engine has no change notification of its own.
pub trait Document: Send + Sync {
    /// The full plain text of the buffer.
    fn text(&self) -> String;

    /// Path of the on-disk file backing this buffer, if any.
    fn local_path(&self) -> Option<PathBuf>;

    /// Whether the buffer has unsaved changes.
    fn is_modified(&self) -> bool;

    /// An already-tokenized view for buffers the editor keeps materialized.
    /// `None` means the engine tokenizes the plain text itself.
    fn materialized_tokens(&self) -> Option<Vec<Token>> {
        None
    }
}

/// A plain in-memory [`Document`].
#[derive(Debug, Default)]
pub struct TextDocument {
    text: Mutex<String>,
    path: Mutex<Option<PathBuf>>,
    modified: AtomicBool,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
            path: Mutex::new(None),
            modified: AtomicBool::new(false),
        }
    }

    pub fn with_path(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            text: Mutex::new(text.into()),
            path: Mutex::new(Some(path.into())),
            modified: AtomicBool::new(false),
        }
    }

    /// Replaces the buffer text and marks the document modified.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.lock().unwrap_or_else(|e| e.into_inner()) = text.into();
        self.modified.store(true, Ordering::SeqCst);
    }

    pub fn set_path(&self, path: Option<PathBuf>) {
        *self.path.lock().unwrap_or_else(|e| e.into_inner()) = path;
    }

    pub fn set_modified(&self, modified: bool) {
        self.modified.store(modified, Ordering::SeqCst);
    }
}

impl Document for TextDocument {
    fn text(&self) -> String {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn local_path(&self) -> Option<PathBuf> {
        self.path.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn is_modified(&self) -> bool {
        self.modified.load(Ordering::SeqCst)
    }
}
