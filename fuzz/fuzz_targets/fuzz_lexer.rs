#![no_main]

use lilydoc::lexer::{Lexer, LilypondLexer};
use lilydoc::mode::Mode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let lexer = LilypondLexer;

        // guessing must accept anything
        let _ = lexer.guess_mode(text);

        for mode in Mode::ALL {
            let tokens: Vec<_> = lexer.tokens(mode, text).collect();

            // tokens must reconstruct the input exactly, in order
            let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(rebuilt, text, "token stream must cover the input");

            for token in &tokens {
                assert!(!token.text.is_empty(), "empty token");
            }
        }
    }
});
