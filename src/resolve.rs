//! Transitive resolution of `\include` arguments across files.
//!
//! Each argument is probed against three locations in order: the directory
//! of the file containing the include statement (nested relative
//! includes), the base directory of the job's main file (legacy flat
//! includes), then every configured include-path directory, first match
//! wins. The growing result set doubles as the visited set, so cyclic
//! includes terminate without further bookkeeping. Arguments that resolve
//! nowhere are dropped silently.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::Result;
use crate::utils;

/// Computes the set of files reachable from `start` via its include
/// arguments. `start` itself is always a member.
pub fn include_closure(
    ctx: &Context,
    start: &Path,
    args: &[String],
) -> Result<BTreeSet<PathBuf>> {
    let start = utils::normalize_path(start);
    let base_dir = start.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut walker = Walker {
        ctx,
        files: BTreeSet::new(),
        base_dir: base_dir.clone(),
        include_path: ctx.include_path(),
    };
    walker.files.insert(start);
    walker.find(args, Some(&base_dir))?;
    Ok(walker.files)
}

struct Walker<'a> {
    ctx: &'a Context,
    files: BTreeSet<PathBuf>,
    base_dir: PathBuf,
    include_path: Vec<PathBuf>,
}

impl Walker<'_> {
    /// Resolves a batch of include arguments found in a file whose
    /// directory is `directory`.
    fn find(&mut self, args: &[String], directory: Option<&Path>) -> Result<()> {
        for arg in args {
            let resolved = match directory {
                Some(dir) => self.try_arg(dir, arg)?,
                None => false,
            };
            if resolved {
                continue;
            }
            let base = self.base_dir.clone();
            if self.try_arg(&base, arg)? {
                continue;
            }
            let search = self.include_path.clone();
            for dir in &search {
                if self.try_arg(dir, arg)? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Probes one candidate directory. A hit adds the file and recurses
    /// into its own include arguments; an already-visited path is a no-op.
    fn try_arg(&mut self, directory: &Path, arg: &str) -> Result<bool> {
        let path = utils::normalize_path(&directory.join(arg));
        if !path.exists() || self.files.contains(&path) {
            return Ok(false);
        }
        tracing::debug!(path = %path.display(), arg = %arg, "resolved include");
        self.files.insert(path.clone());
        if path.is_file() {
            let child_args = self.ctx.include_args_in_file(&path)?;
            let parent = path.parent().map(Path::to_path_buf);
            self.find(&child_args, parent.as_deref())?;
        }
        Ok(true)
    }
}
