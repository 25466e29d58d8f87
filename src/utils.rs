//! Small path and file-reading helpers used across the analysis pipeline.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically normalizes a path, resolving `.` and `..` components without
/// touching the filesystem.
///
/// Resolved include candidates and derived basenames are normalized so that
/// the same file reached through different relative spellings compares
/// equal. Symlinks are deliberately not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Reads a file as UTF-8 text, falling back to latin-1 when the bytes are
/// not valid UTF-8.
///
/// Older scores are frequently latin-1 encoded; treating them as unreadable
/// would break include resolution on files LilyPond itself accepts. Only
/// open/read failures surface as errors.
pub fn read_file_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), "not valid UTF-8, decoding as latin-1");
            err.into_bytes().iter().map(|&b| b as char).collect()
        }
    })
}
