//! Derivation of expected output basenames.
//!
//! A build of a lilypond document produces files whose names derive from
//! the job file's stem plus any output-naming directives in the document
//! and its include closure. This module computes the stems only; callers
//! append an extension and/or a `-<digits>` page suffix when matching
//! actually produced files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::extract::{OutputArg, OutputKind};
use crate::utils;

/// Computes the candidate output stems for a job file and a list of
/// output-naming arguments.
///
/// The extension-stripped job path is itself a candidate (when non-empty).
/// A `suffix` argument contributes `<job-stem>-<value>`, a `name` argument
/// contributes `<value>`; both are joined against the job file's directory
/// and lexically normalized.
pub fn expected_basenames(
    job_path: &Path,
    output_args: &[OutputArg],
) -> BTreeSet<PathBuf> {
    let mut basenames = BTreeSet::new();
    let base = job_path.with_extension("");
    let dir = base.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !base.as_os_str().is_empty() {
        basenames.insert(base.clone());
    }
    for arg in output_args {
        let candidate = match arg.kind {
            OutputKind::Suffix => format!("{stem}-{}", arg.value),
            OutputKind::Name => arg.value.clone(),
        };
        basenames.insert(utils::normalize_path(&dir.join(candidate)));
    }
    basenames
}
