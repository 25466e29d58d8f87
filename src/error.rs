//! Error type for document analysis operations.
//!
//! Expected-miss situations (an include argument that resolves nowhere, a
//! cache lookup for an unseen file) are modelled as `Option`/`bool`, never
//! as errors. Only genuine I/O failures on files we committed to reading
//! surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by document analysis.
#[derive(Debug, Error)]
pub enum Error {
    /// A file we expected to be readable could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Materializing a buffer to the scratch area failed.
    #[error("failed to write scratch file {path}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
