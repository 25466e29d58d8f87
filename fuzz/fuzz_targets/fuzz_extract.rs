#![no_main]

use lilydoc::extract;
use lilydoc::lexer::{Lexer, LilypondLexer};
use lilydoc::mode::Mode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let lexer = LilypondLexer;

        let _ = extract::version(lexer.tokens(Mode::Lilypond, text));
        let _ = extract::version_in_text(text);
        let _ = extract::has_include(lexer.tokens(Mode::Lilypond, text));

        let _ = extract::include_args(lexer.tokens(Mode::Lilypond, text)).count();
        let _ = extract::output_args(lexer.tokens(Mode::Lilypond, text)).count();
    }
});
