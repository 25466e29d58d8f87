//! Document variables declared in leading or trailing comment lines.
//!
//! Editors let users pin per-document settings such as `mode: html;` or
//! `master: main.ly;` in a small `key: value;` block near the top or bottom
//! of the file. Only the first and last five lines are scanned, so a large
//! document body cannot accidentally declare variables.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of lines scanned at each end of the document.
const SCAN_LINES: usize = 5;

static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z]+(?:[-_][a-zA-Z0-9]+)*)\s*:[ \t]*([^;\n]*);").unwrap()
});

/// Parses all variable declarations in the scanned region.
///
/// Later declarations (closer to the end of the document) override earlier
/// ones for the same key.
pub fn variables(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in scan_lines(text) {
        for caps in VARIABLE_RE.captures_iter(line) {
            map.insert(caps[1].to_string(), caps[2].trim().to_string());
        }
    }
    map
}

/// Looks up a single variable; `None` when it is not declared or empty.
///
/// Follows the same last-wins rule as [`variables`], so a redeclaration in
/// the trailing block overrides the leading one.
pub fn get(text: &str, name: &str) -> Option<String> {
    let mut found = None;
    for line in scan_lines(text) {
        for caps in VARIABLE_RE.captures_iter(line) {
            if &caps[1] == name {
                found = Some(caps[2].trim().to_string());
            }
        }
    }
    found.filter(|value| !value.is_empty())
}

/// The first and last [`SCAN_LINES`] lines, without overlap.
fn scan_lines(text: &str) -> impl Iterator<Item = &str> {
    let lines: Vec<&str> = text.lines().collect();
    let head = lines.len().min(SCAN_LINES);
    let tail = lines.len().max(head + SCAN_LINES) - SCAN_LINES;
    let head_lines: Vec<&str> = lines[..head].to_vec();
    let tail_lines: Vec<&str> = lines[tail.max(head)..].to_vec();
    head_lines.into_iter().chain(tail_lines)
}
