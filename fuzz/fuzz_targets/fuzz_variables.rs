#![no_main]

use lilydoc::variables;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let vars = variables::variables(text);
        for (name, value) in &vars {
            assert!(!name.is_empty(), "variable with empty name");
            assert!(!value.contains('\n'), "variable value spans lines");
        }
        let _ = variables::get(text, "mode");
        let _ = variables::get(text, "master");
    }
});
