//! Integration tests for lilydoc

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use lilydoc::config::Config;
use lilydoc::context::Context;
use lilydoc::docinfo::DocumentInfo;
use lilydoc::document::TextDocument;
use lilydoc::extract::Version;
use lilydoc::mode::Mode;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn touch_forward(path: &Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(5))
        .unwrap();
}

fn info_for(ctx: Arc<Context>, doc: TextDocument) -> DocumentInfo<TextDocument> {
    DocumentInfo::new(ctx, Arc::new(doc))
}

/// Analyze a realistic multi-file project: nested includes resolved
/// relative to the including file, and output directives gathered from
/// both the main document and an included file.
#[test]
fn test_realistic_project_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "symphony.ly",
        r#"\version "2.24.1"
\include "parts/violin.ily"
\bookOutputSuffix "score"
\score { \violinPart }
"#,
    );
    let violin = write(
        dir.path(),
        "parts/violin.ily",
        r#"\include "common.ily"
violinPart = { c' d' e' }
"#,
    );
    let common = write(
        dir.path(),
        "parts/common.ily",
        "#(set-global-staff-size 18)\n",
    );

    let ctx = Arc::new(Context::default());
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    assert_eq!(info.mode(true), Some(Mode::Lilypond));
    assert_eq!(info.version(), Some(Version(vec![2, 24, 1])));
    assert!(info.has_include());

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main.clone(), violin, common]));

    // one stem for the main file itself, one for the suffix directive
    let basenames = info.basenames().unwrap();
    let stem = dir.path().join("symphony");
    let suffixed = dir.path().join("symphony-score");
    assert_eq!(basenames, BTreeSet::from([stem, suffixed]));
}

/// A `master` document variable redirects the whole analysis: the job
/// targets the master file and the include closure starts there.
#[test]
fn test_master_variable_redirects_job_and_closure() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.ly",
        "\\include \"voice.ily\"\n\\score { \\voice }\n",
    );
    let voice = write(dir.path(), "voice.ily", "voice = { c }\n");

    let ctx = Arc::new(Context::default());
    let info = info_for(
        Arc::clone(&ctx),
        TextDocument::with_path("%%master: main.ly;\nvoice = { c }\n", &voice),
    );

    assert_eq!(info.master(), Some(main.clone()));
    let job = info.job_info(false).unwrap();
    assert_eq!(job.filename, Some(main.clone()));
    assert_eq!(job.mode, Mode::Lilypond);

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main, voice]));
}

/// Include search order: the including file's directory wins over the
/// main document's directory, which wins over configured directories.
#[test]
fn test_include_search_order() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.ly",
        "\\include \"lib/shared.ily\"\n\\include \"theme.ily\"\n",
    );
    // lib/shared.ily includes theme.ily too, resolved against lib/ first
    let shared = write(dir.path(), "lib/shared.ily", "\\include \"theme.ily\"\n");
    let lib_theme = write(dir.path(), "lib/theme.ily", "% lib theme\n");
    let root_theme = write(dir.path(), "theme.ily", "% root theme\n");
    // a configured directory also has a theme.ily, which must lose
    write(dir.path(), "system/theme.ily", "% system theme\n");

    let ctx = Arc::new(Context::new(Config {
        include_path: vec![dir.path().join("system")],
    }));
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main, shared, lib_theme, root_theme]));
}

/// A file only findable through the configured include path is still
/// resolved, after the local directories miss.
#[test]
fn test_configured_include_path_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.ly", "\\include \"stock.ily\"\n");
    let stock = write(dir.path(), "vendor/stock.ily", "% stock\n");

    let ctx = Arc::new(Context::new(Config {
        include_path: vec![dir.path().join("vendor")],
    }));
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main, stock]));
}

/// Mutually-including files terminate and report each file once.
#[test]
fn test_include_cycle_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.ly", "\\include \"b.ly\"\n{ c }\n");
    let b = write(dir.path(), "b.ly", "\\include \"a.ly\"\n{ d }\n");

    let ctx = Arc::new(Context::default());
    let text = std::fs::read_to_string(&a).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &a));

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([a, b]));
}

/// An unresolvable include argument is dropped without failing the
/// rest of the closure.
#[test]
fn test_unresolvable_include_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.ly",
        "\\include \"gone.ily\"\n\\include \"here.ily\"\n",
    );
    let here = write(dir.path(), "here.ily", "x = 1\n");

    let ctx = Arc::new(Context::default());
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main, here]));
}

/// A latin-1 encoded file in the closure is decoded with the byte
/// fallback; resolution includes it and keeps going.
#[test]
fn test_latin1_include_file_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.ly",
        "\\include \"part.ily\"\n\\include \"rest.ily\"\n",
    );
    let part = dir.path().join("part.ily");
    std::fs::write(&part, b"% th\xe8me\nmel = { c }\n").unwrap();
    let rest = write(dir.path(), "rest.ily", "{ r1 }\n");

    let ctx = Arc::new(Context::default());
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    let files = info.include_files().unwrap();
    assert_eq!(files, BTreeSet::from([main, part, rest]));
}

/// A dirty buffer compiles from a scratch file carrying the live text,
/// with the original directory added to the job's include path so the
/// buffer's includes still resolve.
#[test]
fn test_dirty_buffer_compiles_from_scratch_file() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.ly", "{ c }\n");
    write(dir.path(), "extra.ily", "extra = { e }\n");

    let doc = Arc::new(TextDocument::with_path(
        "\\include \"extra.ily\"\n{ c \\extra }\n",
        &main,
    ));
    doc.set_modified(true);
    let info = DocumentInfo::new(Arc::new(Context::default()), Arc::clone(&doc));

    let job = info.job_info(true).unwrap();
    let scratch = job.filename.expect("scratch file");
    assert_ne!(scratch, main);
    assert_eq!(
        std::fs::read_to_string(&scratch).unwrap(),
        "\\include \"extra.ily\"\n{ c \\extra }\n"
    );
    assert_eq!(job.include_path, vec![dir.path().to_path_buf()]);

    // saving the document makes the job target the real file again
    doc.set_modified(false);
    let job = info.job_info(false).unwrap();
    assert_eq!(job.filename, Some(main));
}

/// File-level extraction results are cached by modification time and
/// recomputed after the file changes on disk.
#[test]
fn test_file_cache_revalidates_on_mtime_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "lib.ily", "\\include \"one.ily\"\n");

    let ctx = Context::default();
    assert_eq!(ctx.include_args_in_file(&path).unwrap(), vec!["one.ily"]);
    assert_eq!(ctx.include_args_in_file(&path).unwrap(), vec!["one.ily"]);

    std::fs::write(&path, "\\include \"two.ily\"\n").unwrap();
    touch_forward(&path);
    assert_eq!(ctx.include_args_in_file(&path).unwrap(), vec!["two.ily"]);
}

/// Output names gathered across the closure: a `\bookOutputName` in an
/// included file replaces the stem, a scheme `output-suffix` decorates it.
#[test]
fn test_basenames_from_included_directives() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "book.ly",
        "\\include \"movements.ily\"\n\\score { \\mvmt }\n",
    );
    write(
        dir.path(),
        "movements.ily",
        r#"#(define output-suffix "allegro")
\bookOutputName "complete-book"
mvmt = { c }
"#,
    );

    let ctx = Arc::new(Context::default());
    let text = std::fs::read_to_string(&main).unwrap();
    let info = info_for(Arc::clone(&ctx), TextDocument::with_path(text, &main));

    let basenames = info.basenames().unwrap();
    assert_eq!(
        basenames,
        BTreeSet::from([
            dir.path().join("book"),
            dir.path().join("book-allegro"),
            dir.path().join("complete-book"),
        ])
    );
}

/// Dialect classification end to end: an explicit `mode` variable wins
/// over content guessing, and foreign dialects survive the pipeline.
#[test]
fn test_mode_variable_overrides_guess() {
    let ctx = Arc::new(Context::default());

    let html = "<html><body><pre>music</pre></body></html>";
    let info = info_for(Arc::clone(&ctx), TextDocument::new(html));
    assert_eq!(info.mode(true), Some(Mode::Html));

    let forced = format!("% -*- mode: texinfo;\n{html}");
    let info = info_for(Arc::clone(&ctx), TextDocument::new(forced));
    assert_eq!(info.mode(true), Some(Mode::Texinfo));
    assert_eq!(info.mode(false), Some(Mode::Texinfo));

    let info = info_for(ctx, TextDocument::new("{ c d e }"));
    assert_eq!(info.mode(false), None);
    assert_eq!(info.mode(true), Some(Mode::Lilypond));
}
