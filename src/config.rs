//! Configuration for document analysis.

use std::path::PathBuf;

use serde::Deserialize;

/// Engine configuration, sourced from the host editor's settings store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories searched for `\include` arguments that do not resolve
    /// relative to the including file or the job's base directory, tried
    /// in order.
    pub include_path: Vec<PathBuf>,
}
