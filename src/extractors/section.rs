// src/extractors/section.rs

// --- Imports ---
use crate::extractors::text::{clean, normalize_lines};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
// Minimum substance thresholds. Empirical; keep overridable via LocatorConfig.
pub const DEFAULT_MIN_PATTERN_LEN: usize = 50;
pub const DEFAULT_MIN_PARAGRAPH_LEN: usize = 100;
// How many lines past the start the keyword scan will take when no section
// boundary is found below it.
pub const DEFAULT_KEYWORD_WINDOW: usize = 10;

/// Labels that can introduce the section, in priority order.
const SECTION_LABELS: [&str; 3] = ["abstract", "summary", "overview"];

/// Lowercased markers that end the section during the line scan. Matched by
/// substring against the trimmed, lowercased line content.
const END_KEYWORDS: [&str; 5] = ["keywords", "introduction", "background", "1.", "i."];

// --- Regex Patterns for Text Matching (Lazy Static) ---
static SECTION_PATTERNS: Lazy<Vec<SectionPattern>> = Lazy::new(|| {
    SECTION_LABELS
        .iter()
        .map(|&label| SectionPattern {
            label,
            // Label, optional colon/period with whitespace on either side
            // (extraction often pads the separator, "Abstract : ..."), then a
            // non-greedy capture up to the first section boundary: a blank
            // line, a line starting with a known next-section word, or a
            // numbered heading. The separator stays on the label's line so a
            // bare label followed by a blank line captures nothing instead of
            // the next section.
            regex: Regex::new(&format!(
                r"(?is)\b{label}\b[ \t]*[:.]?[ \t]*(.+?)(?:\n[ \t]*\n|\n(?:keywords?|introduction|background)\b|\n(?:\d+|[ivx]+)\.)"
            ))
            .expect("Failed to compile SECTION_PATTERNS"),
        })
        .collect()
});

static ABSTRACT_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    // Word-boundary match: must not fire on "abstracted" or "abstraction".
    Regex::new(r"(?i)\babstract\b").expect("Failed to compile ABSTRACT_WORD_RE")
});

static LEADING_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*abstract\b[:\s]*").expect("Failed to compile LEADING_LABEL_RE")
});

static COPYRIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:©|\(c\)\s|copyright\b|all rights reserved)")
        .expect("Failed to compile COPYRIGHT_RE")
});

// --- Data Structures ---

/// A declarative start-label rule paired with its compiled search pattern.
pub struct SectionPattern {
    pub label: &'static str,
    regex: Regex,
}

/// Which locator tier produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    PatternMatch,
    KeywordScan,
    ParagraphFallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::PatternMatch => "pattern-match",
            Provenance::KeywordScan => "keyword-scan",
            Provenance::ParagraphFallback => "paragraph-fallback",
        }
    }
}

/// A located but not-yet-cleaned span believed to be the abstract.
#[derive(Debug, Clone)]
pub struct AbstractCandidate {
    pub text: String,
    pub provenance: Provenance,
}

/// The finished extraction result handed to storage/rendering.
#[derive(Debug, Clone)]
pub struct AbstractSection {
    pub content: String,
    pub provenance: Provenance,
    pub source_name: String,
    pub char_count: usize,
}

/// Thresholds for the locator tiers. Defaults preserve the historical
/// constants; override from the CLI when a corpus needs different bounds.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub min_pattern_len: usize,
    pub min_paragraph_len: usize,
    pub keyword_window: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_pattern_len: DEFAULT_MIN_PATTERN_LEN,
            min_paragraph_len: DEFAULT_MIN_PARAGRAPH_LEN,
            keyword_window: DEFAULT_KEYWORD_WINDOW,
        }
    }
}

// --- Locator Strategies ---

/// One tier of the fallback chain. Strategies are consulted in order and the
/// first one to produce a candidate wins.
pub trait LocateStrategy {
    fn name(&self) -> &'static str;

    /// Attempts to locate the abstract in line-preserving normalized text.
    fn try_locate(&self, text: &str) -> Option<AbstractCandidate>;
}

/// Tier A: labeled section patterns with explicit end boundaries.
pub struct PatternStrategy {
    min_len: usize,
}

impl LocateStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        "pattern-match"
    }

    fn try_locate(&self, text: &str) -> Option<AbstractCandidate> {
        for pattern in SECTION_PATTERNS.iter() {
            if let Some(caps) = pattern.regex.captures(text) {
                // The case-insensitive match runs over the original-case text,
                // so the capture range indexes it directly and the span comes
                // back in its original casing.
                let span = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let span_len = span.chars().count();
                if span_len >= self.min_len {
                    tracing::debug!("Pattern '{}' matched {} chars", pattern.label, span_len);
                    return Some(AbstractCandidate {
                        text: span.to_string(),
                        provenance: Provenance::PatternMatch,
                    });
                }
                tracing::debug!(
                    "Pattern '{}' capture too short ({} < {}), discarding",
                    pattern.label,
                    span_len,
                    self.min_len
                );
            }
        }
        None
    }
}

/// Tier B: top-to-bottom line scan anchored on the standalone word "abstract".
pub struct KeywordScanStrategy {
    window: usize,
}

impl KeywordScanStrategy {
    /// Picks the exclusive end line for a span starting at `start`: the first
    /// line below it carrying an end keyword, else the first blank line inside
    /// the scan window, else exactly `window` lines past the start.
    fn find_end(&self, lines: &[&str], start: usize) -> usize {
        for (i, line) in lines.iter().enumerate().skip(start + 1) {
            let lower = line.trim().to_lowercase();
            if END_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
                return i;
            }
        }

        let limit = (start + 1 + self.window).min(lines.len());
        for (i, line) in lines.iter().enumerate().take(limit).skip(start + 1) {
            if line.trim().is_empty() {
                return i;
            }
        }

        (start + self.window).min(lines.len())
    }
}

impl LocateStrategy for KeywordScanStrategy {
    fn name(&self) -> &'static str {
        "keyword-scan"
    }

    fn try_locate(&self, text: &str) -> Option<AbstractCandidate> {
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.iter().position(|line| ABSTRACT_WORD_RE.is_match(line))?;
        let end = self.find_end(&lines, start);

        let joined = lines[start..end].join(" ");
        let stripped = LEADING_LABEL_RE.replace(&joined, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            return None;
        }

        tracing::debug!("Keyword scan selected lines {}..{}", start, end);
        Some(AbstractCandidate {
            text: stripped.to_string(),
            provenance: Provenance::KeywordScan,
        })
    }
}

/// Tier C: first substantial paragraph. Last resort for unlabeled documents;
/// ignores the word "abstract" entirely.
pub struct ParagraphStrategy {
    min_len: usize,
}

impl LocateStrategy for ParagraphStrategy {
    fn name(&self) -> &'static str {
        "paragraph-fallback"
    }

    fn try_locate(&self, text: &str) -> Option<AbstractCandidate> {
        text.split("\n\n")
            .map(str::trim)
            .find(|para| para.chars().count() > self.min_len && !COPYRIGHT_RE.is_match(para))
            .map(|para| AbstractCandidate {
                text: para.replace('\n', " "),
                provenance: Provenance::ParagraphFallback,
            })
    }
}

// --- Main Extractor Structure ---

pub struct AbstractExtractor {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl AbstractExtractor {
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    pub fn with_config(config: LocatorConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(PatternStrategy {
                    min_len: config.min_pattern_len,
                }),
                Box::new(KeywordScanStrategy {
                    window: config.keyword_window,
                }),
                Box::new(ParagraphStrategy {
                    min_len: config.min_paragraph_len,
                }),
            ],
        }
    }

    /// Locates and cleans the abstract in raw extracted text. Tiers are tried
    /// in order; a tier whose candidate cleans down to nothing does not win.
    pub fn extract_abstract(
        &self,
        raw_text: &str,
        source_name: &str,
    ) -> Result<AbstractSection, ExtractError> {
        let text = normalize_lines(raw_text);
        if text.is_empty() {
            return Err(ExtractError::AbstractNotFound(format!(
                "{source_name}: document contains no text"
            )));
        }

        for strategy in &self.strategies {
            tracing::debug!("Trying locator strategy: {}", strategy.name());
            if let Some(candidate) = strategy.try_locate(&text) {
                let content = clean(&candidate.text);
                if content.is_empty() {
                    tracing::debug!(
                        "Strategy {} candidate cleaned to empty, continuing",
                        strategy.name()
                    );
                    continue;
                }
                let char_count = content.chars().count();
                tracing::info!(
                    "Located abstract via {} ({} chars)",
                    strategy.name(),
                    char_count
                );
                return Ok(AbstractSection {
                    content,
                    provenance: candidate.provenance,
                    source_name: source_name.to_string(),
                    char_count,
                });
            }
        }

        Err(ExtractError::AbstractNotFound(format!(
            "no locator strategy matched in {source_name}"
        )))
    }
}

impl Default for AbstractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> AbstractExtractor {
        AbstractExtractor::new()
    }

    #[test]
    fn pattern_match_stops_at_blank_line_before_keywords() {
        let body = "This work studies the effect of caching on distributed \
                    query planners across varied analytical workloads.";
        let text = format!("Abstract: {body}\n\nKeywords: caching, planners");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert_eq!(section.content, body);
        assert!(!section.content.contains("Keywords"));
    }

    #[test]
    fn pattern_match_spans_multiple_lines() {
        let text = "ABSTRACT\nWe propose a streaming join operator that bounds memory\nby spilling cold partitions to disk under pressure.\n\n1. Introduction\nJoins are expensive.";

        let section = extractor().extract_abstract(text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert_eq!(
            section.content,
            "We propose a streaming join operator that bounds memory by spilling cold partitions to disk under pressure."
        );
    }

    #[test]
    fn pattern_match_returns_original_casing() {
        let text = "aBsTrAcT: The QUICK Brown fox Jumps over the lazy dog while MEASURING latency.\n\nIntroduction follows here.";

        let section = extractor().extract_abstract(text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert!(section.content.starts_with("The QUICK Brown fox"));
        assert!(section.content.contains("MEASURING"));
    }

    #[test]
    fn pattern_match_tolerates_padded_separator() {
        // Extraction artifact: a space before the colon. The separator must
        // not leak into the candidate text.
        let body = "We evaluate three scheduling policies under bursty load \
                    and report tail latencies across a week of traces.";
        let text = format!("Abstract : {body}\n\nKeywords: scheduling");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert_eq!(section.content, body);
    }

    #[test]
    fn summary_label_is_recognized() {
        let body = "A condensed account of the experimental findings collected \
                    over three deployment seasons at two observatories.";
        let text = format!("Summary: {body}\n\nIntroduction\nDetails follow.");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert_eq!(section.content, body);
    }

    #[test]
    fn short_capture_is_rejected_not_truncated() {
        // A bare label directly followed by the next section must not yield a
        // truncated one-word "abstract".
        let text = "Abstract\n\nIntroduction\nSomething short.";

        let result = extractor().extract_abstract(text, "sample");
        assert!(matches!(result, Err(ExtractError::AbstractNotFound(_))));
    }

    #[test]
    fn keyword_scan_takes_over_when_capture_is_short() {
        let text = "Abstract\nShort leading line.\nKeywords: brevity";

        let section = extractor().extract_abstract(text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::KeywordScan);
        assert_eq!(section.content, "Short leading line.");
    }

    #[test]
    fn keyword_scan_requires_standalone_word() {
        // "abstracted" must not anchor the line scan.
        let text = "The study abstracted results from prior work.\nMore prose follows here.";

        let result = extractor().extract_abstract(text, "sample");
        assert!(matches!(result, Err(ExtractError::AbstractNotFound(_))));
    }

    #[test]
    fn keyword_scan_stops_at_first_blank_line_in_window() {
        let text = "Abstract\nline one\nline two\n\nunrelated trailing prose";

        let section = extractor().extract_abstract(text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::KeywordScan);
        assert_eq!(section.content, "line one line two");
    }

    #[test]
    fn keyword_scan_clamps_to_window_without_markers() {
        // 12 filler lines, no end keywords, no blank lines: the scan takes
        // exactly 10 lines past the start.
        let mut lines = vec!["Abstract".to_string()];
        for i in 1..=12 {
            lines.push(format!("filler words numbered {i}"));
        }
        let text = lines.join("\n");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::KeywordScan);

        let expected = (1..=9)
            .map(|i| format!("filler words numbered {i}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(section.content, expected);
    }

    #[test]
    fn paragraph_fallback_picks_first_substantial_paragraph() {
        let long_para = "Document text extraction tools often produce noisy output, \
                         and downstream consumers need a dependable way to recover \
                         the opening prose of a paper without any labels at all.";
        let text = format!("Short header line\n\n{long_para}\n\nTrailing notes.");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::ParagraphFallback);
        assert_eq!(section.content, clean_expectation(long_para));
    }

    #[test]
    fn paragraph_fallback_skips_copyright_boilerplate() {
        let boiler = "Copyright 2024 by the authors. All rights reserved. Reproduction \
                      in any form requires the written permission of the publisher.";
        let real = "Measurements of solar irradiance over a decade reveal periodic \
                    dips correlated with instrument recalibration rather than any \
                    underlying physical phenomenon of interest.";
        let text = format!("{boiler}\n\n{real}");

        let section = extractor().extract_abstract(&text, "sample").unwrap();
        assert_eq!(section.provenance, Provenance::ParagraphFallback);
        assert_eq!(section.content, clean_expectation(real));
    }

    #[test]
    fn paper_shaped_document_end_to_end() {
        let text = "Title\n\nAbstract: This paper improves X by Y, achieving Z.\n\n1. Introduction\nBody follows.";

        let section = extractor().extract_abstract(text, "sample").unwrap();
        assert_eq!(section.content, "This paper improves X by Y, achieving Z.");
    }

    #[test]
    fn empty_input_is_not_found() {
        for text in ["", "   \n\n\t  "] {
            let result = extractor().extract_abstract(text, "sample");
            assert!(matches!(result, Err(ExtractError::AbstractNotFound(_))));
        }
    }

    #[test]
    fn thresholds_are_overridable() {
        let config = LocatorConfig {
            min_pattern_len: 5,
            ..LocatorConfig::default()
        };
        let text = "Abstract: Tiny but real.\n\nIntroduction\nBody.";

        let section = AbstractExtractor::with_config(config)
            .extract_abstract(text, "sample")
            .unwrap();
        assert_eq!(section.provenance, Provenance::PatternMatch);
        assert_eq!(section.content, "Tiny but real.");
    }

    // Test bodies use multi-line string continuations; mirror what clean()
    // does to them so expectations stay readable.
    fn clean_expectation(s: &str) -> String {
        crate::extractors::text::clean(s)
    }
}
