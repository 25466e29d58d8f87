//! Per-document analysis facade.
//!
//! One [`DocumentInfo`] accompanies each open [`Document`] for the
//! document's whole lifetime. Content-derived facts (version, include
//! arguments, output arguments, include presence) are cached until the
//! owner reports a content change via
//! [`contents_changed`](DocumentInfo::contents_changed); everything else
//! is recomputed on demand because it also depends on variables or
//! settings that can change without a buffer edit.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::basenames;
use crate::cache::CachedSlot;
use crate::context::Context;
use crate::document::Document;
use crate::error::Result;
use crate::extract::{self, OutputArg, Version};
use crate::mode::{self, Mode};
use crate::resolve;
use crate::scratch::ScratchArea;
use crate::token::Token;
use crate::utils;
use crate::variables;

/// What an external build job should run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    /// The file to hand to the build tool. `None` when the document has no
    /// local path and no scratch file was available.
    pub filename: Option<PathBuf>,
    /// Dialect of the governing file.
    pub mode: Mode,
    /// Extra directories the job must add to its include path, e.g. the
    /// original directory when a scratch file stands in for a saved
    /// document with includes.
    pub include_path: Vec<PathBuf>,
}

/// Cached, composable facts about one document.
pub struct DocumentInfo<D: Document> {
    ctx: Arc<Context>,
    doc: Arc<D>,
    version: CachedSlot<Option<Version>>,
    has_include: CachedSlot<bool>,
    include_args: CachedSlot<Vec<String>>,
    output_args: CachedSlot<Vec<OutputArg>>,
    scratch: Mutex<Option<ScratchArea>>,
}

impl<D: Document> DocumentInfo<D> {
    pub fn new(ctx: Arc<Context>, doc: Arc<D>) -> Self {
        Self {
            ctx,
            doc,
            version: CachedSlot::new(),
            has_include: CachedSlot::new(),
            include_args: CachedSlot::new(),
            output_args: CachedSlot::new(),
            scratch: Mutex::new(None),
        }
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Drops every content-derived cache. The owner calls this on each
    /// buffer edit.
    pub fn contents_changed(&self) {
        tracing::trace!("document contents changed, dropping cached facts");
        self.version.invalidate();
        self.has_include.invalidate();
        self.include_args.invalidate();
        self.output_args.invalidate();
    }

    /// The document's dialect. See [`mode::classify_text`]; never cached.
    pub fn mode(&self, guess: bool) -> Option<Mode> {
        mode::classify_text(self.ctx.lexer(), &self.doc.text(), guess)
    }

    /// The materialized token stream of the document: the buffer's own
    /// tokenized view when it has one, otherwise a fresh tokenization of
    /// the plain text.
    pub fn tokens(&self) -> Vec<Token> {
        if let Some(tokens) = self.doc.materialized_tokens() {
            return tokens;
        }
        let text = self.doc.text();
        let mode = self.ctx.mode_of_text(&text);
        self.ctx.lexer().tokens(mode, &text).collect()
    }

    /// The document's declared version, if any. Cached until the contents
    /// change.
    ///
    /// Resolution order: a `\version` keyword in the token stream, then the
    /// `version` document variable, then (for non-lilypond documents only)
    /// a raw-text search that also finds version strings inside comments
    /// or foreign markup. The first successful step wins.
    pub fn version(&self) -> Option<Version> {
        self.version.get_or_compute(|| self.compute_version())
    }

    fn compute_version(&self) -> Option<Version> {
        let text = self.doc.text();
        let from_stream = match self.doc.materialized_tokens() {
            Some(tokens) => extract::version(tokens),
            None => {
                let mode = self.ctx.mode_of_text(&text);
                extract::version(self.ctx.lexer().tokens(mode, &text))
            }
        };
        if from_stream.is_some() {
            return from_stream;
        }
        if let Some(declared) = variables::get(&text, "version") {
            return Some(Version::parse(&declared));
        }
        if self.ctx.mode_of_text(&text) != Mode::Lilypond {
            return extract::version_in_text(&text);
        }
        None
    }

    /// Whether the document contains an `\include` command. Cached until
    /// the contents change; the scan stops at the first hit.
    pub fn has_include(&self) -> bool {
        self.has_include.get_or_compute(|| {
            if let Some(tokens) = self.doc.materialized_tokens() {
                return extract::has_include(tokens);
            }
            let text = self.doc.text();
            let mode = self.ctx.mode_of_text(&text);
            extract::has_include(self.ctx.lexer().tokens(mode, &text))
        })
    }

    /// The `\include` arguments of this document, in order. Cached until
    /// the contents change.
    pub fn include_args(&self) -> Vec<String> {
        self.include_args.get_or_compute(|| {
            if let Some(tokens) = self.doc.materialized_tokens() {
                return extract::include_args(tokens).collect();
            }
            let text = self.doc.text();
            let mode = self.ctx.mode_of_text(&text);
            extract::include_args(self.ctx.lexer().tokens(mode, &text)).collect()
        })
    }

    /// The output-naming arguments of this document, in order. Cached
    /// until the contents change.
    pub fn output_args(&self) -> Vec<OutputArg> {
        self.output_args.get_or_compute(|| {
            if let Some(tokens) = self.doc.materialized_tokens() {
                return extract::output_args(tokens).collect();
            }
            let text = self.doc.text();
            let mode = self.ctx.mode_of_text(&text);
            extract::output_args(self.ctx.lexer().tokens(mode, &text)).collect()
        })
    }

    /// The master file this document redirects to via its `master`
    /// variable, resolved against the document's directory. Only returned
    /// when it exists on disk and differs from the document's own path.
    pub fn master(&self) -> Option<PathBuf> {
        let filename = self.doc.local_path()?;
        let redirect = variables::get(&self.doc.text(), "master")?;
        let dir = filename.parent()?;
        let path = utils::normalize_path(&dir.join(redirect));
        (path.exists() && path != filename).then_some(path)
    }

    /// The configured include search path.
    pub fn include_path(&self) -> Vec<PathBuf> {
        self.ctx.include_path()
    }

    /// Determines the file an external build job should target.
    ///
    /// A resolved master file wins, with its mode classified from its own
    /// content (read fresh, never cached). Otherwise the document's own
    /// path and mode are used; a pathless or dirty buffer falls back to
    /// the scratch area. With `create` true the scratch file is written;
    /// with `create` false an earlier scratch file is reused only while it
    /// still exists on disk.
    pub fn job_info(&self, create: bool) -> Result<JobInfo> {
        let mut include_path = Vec::new();
        if let Some(master) = self.master() {
            let text = utils::read_file_text(&master)?;
            let mode = self.ctx.mode_of_text(&text);
            return Ok(JobInfo {
                filename: Some(master),
                mode,
                include_path,
            });
        }

        let mut filename = self.doc.local_path();
        let text = self.doc.text();
        let mode = self.ctx.mode_of_text(&text);
        if filename.is_none() || self.doc.is_modified() {
            if create {
                let scratch_file = self.save_scratch(&text, mode)?;
                if filename.is_some() && self.has_include() {
                    if let Some(dir) = filename.as_ref().and_then(|f| f.parent()) {
                        include_path.push(dir.to_path_buf());
                    }
                }
                filename = Some(scratch_file);
            } else if let Some(existing) = self.scratch_path().filter(|p| p.exists()) {
                filename = Some(existing);
            }
        }
        Ok(JobInfo {
            filename,
            mode,
            include_path,
        })
    }

    /// The set of files reachable from this document via `\include`,
    /// including the document's effective file itself. Empty when the
    /// document has neither a master file nor a local path.
    pub fn include_files(&self) -> Result<BTreeSet<PathBuf>> {
        if let Some(master) = self.master() {
            let args = self.ctx.include_args_in_file(&master)?;
            return resolve::include_closure(&self.ctx, &master, &args);
        }
        match self.doc.local_path() {
            Some(path) => {
                let args = self.include_args();
                resolve::include_closure(&self.ctx, &path, &args)
            }
            None => Ok(BTreeSet::new()),
        }
    }

    /// The set of output stems a build of this document is expected to
    /// produce. Non-empty for lilypond documents only; the other dialects
    /// are reserved.
    pub fn basenames(&self) -> Result<BTreeSet<PathBuf>> {
        let job = self.job_info(false)?;
        if job.mode != Mode::Lilypond {
            return Ok(BTreeSet::new());
        }
        let mut includes = self.include_files()?;
        let mut args: Vec<OutputArg> = Vec::new();
        if self.master().is_none() {
            // a master override picks the main document's directives up
            // through the closure walk instead
            if let Some(own) = self.doc.local_path() {
                includes.remove(&utils::normalize_path(&own));
            }
            args.extend(self.output_args());
        }
        for file in &includes {
            if file.is_file() {
                args.extend(self.ctx.output_args_in_file(file)?);
            }
        }
        let job_path = job.filename.unwrap_or_default();
        Ok(basenames::expected_basenames(&job_path, &args))
    }

    fn save_scratch(&self, text: &str, mode: Mode) -> Result<PathBuf> {
        let mut guard = self.scratch.lock().unwrap_or_else(|e| e.into_inner());
        let area = match guard.take() {
            Some(area) => area,
            None => ScratchArea::new()?,
        };
        let path = area.save(text, mode)?;
        *guard = Some(area);
        Ok(path)
    }

    fn scratch_path(&self) -> Option<PathBuf> {
        self.scratch
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(|area| area.path())
    }
}
