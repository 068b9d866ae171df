//! Optional cleanup of the model response.
//!
//! Off by default: the response is displayed and exported verbatim. With
//! `clean_response` enabled two deterministic rules run, in this order:
//!
//! 1. Strip an outer ```` ```markdown ```` / ```` ``` ```` fence wrapping the
//!    whole answer (models add one despite being asked for Markdown).
//! 2. Normalise line endings (CRLF / CR → LF).
//!
//! Content inside the answer is never touched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules.
pub fn clean_response(input: &str) -> String {
    let s = strip_outer_fence(input);
    normalise_line_endings(&s)
}

// ── Rule 1: Strip outer markdown fence ───────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:markdown|md)?[ \t]*\r?\n(.*?)\r?\n```[ \t]*$")
        .expect("outer fence regex is valid")
});

fn strip_outer_fence(input: &str) -> String {
    let trimmed = input.trim();
    match RE_OUTER_FENCE.captures(trimmed) {
        // Inner fences must pair up, otherwise the outer ones belong to them.
        Some(caps) if caps[1].matches("```").count() % 2 == 0 => caps[1].to_string(),
        _ => input.to_string(),
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}
