//! Scratch-area materialization of unsaved buffers.
//!
//! External tooling needs a real file; a dirty or never-saved buffer does
//! not have one. A [`ScratchArea`] owns a temporary directory that lives as
//! long as its [`DocumentInfo`](crate::docinfo::DocumentInfo) and holds at most one
//! materialized file, rewritten on each save.

use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::mode::Mode;

/// Per-document temporary materialization target.
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
    file: Mutex<Option<PathBuf>>,
}

impl ScratchArea {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().map_err(|source| Error::Scratch {
            path: std::env::temp_dir(),
            source,
        })?;
        Ok(Self {
            dir,
            file: Mutex::new(None),
        })
    }

    /// The most recently written scratch file, if any. The file may have
    /// been removed from disk since; callers check existence themselves.
    pub fn path(&self) -> Option<PathBuf> {
        self.file.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Writes the buffer text to the scratch file for the given mode and
    /// returns its path.
    pub fn save(&self, text: &str, mode: Mode) -> Result<PathBuf> {
        let path = self
            .dir
            .path()
            .join(format!("document.{}", mode.scratch_extension()));
        std::fs::write(&path, text).map_err(|source| Error::Scratch {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "materialized buffer to scratch file");
        *self.file.lock().unwrap_or_else(|e| e.into_inner()) = Some(path.clone());
        Ok(path)
    }
}
