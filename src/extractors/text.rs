// src/extractors/text.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Characters outside this set are treated as extraction artifacts and
// replaced with spaces before the final whitespace collapse.
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s.,;:!?()\-&]").expect("Failed to compile DISALLOWED_RE")
});

// A period glued directly to the next word, e.g. "data.Results".
static FUSED_SENTENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(\w)").expect("Failed to compile FUSED_SENTENCE_RE")
});

/// Collapses all whitespace runs (spaces, tabs, newlines) into single spaces
/// and trims both ends. Total over any input, idempotent.
pub fn normalize(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for segment in raw.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Line-preserving variant of [`normalize`]: each line is trimmed and its
/// internal whitespace collapsed, but line boundaries survive. Runs of blank
/// lines collapse to a single blank line so paragraph breaks stay visible as
/// exactly `\n\n`. Leading and trailing blank lines are dropped.
///
/// The line-oriented locator strategies reason about line indices and blank
/// lines, so this form must be derived from the raw text directly, never from
/// the fully flattened form.
pub fn normalize_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_blank = false;
    for line in raw.lines() {
        let line = normalize(line);
        if line.is_empty() {
            pending_blank = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&line);
    }
    out
}

/// Cleans a located candidate span for rendering: collapses whitespace,
/// replaces characters outside the conservative prose set with spaces,
/// repairs sentences fused by extraction ("data.Results" -> "data. Results"),
/// and trims. Empty input yields empty output; callers treat empty as
/// not-found upstream.
pub fn clean(candidate: &str) -> String {
    let text = normalize(candidate);
    let text = DISALLOWED_RE.replace_all(&text, " ");
    let text = normalize(&text);
    let text = FUSED_SENTENCE_RE.replace_all(&text, ". $1");
    text.trim().to_string()
}
