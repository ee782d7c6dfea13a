// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::utils::error::AppError;

/// Saves extracted text with `>>>[tag]...<<<` markers around every span
/// matched by the given regex patterns, for eyeballing why a locator
/// strategy did or did not fire.
pub fn save_annotated_text(
    text: &str,
    path: &Path,
    patterns: &[(&str, &str)],
) -> Result<(), AppError> {
    use regex::Regex;

    let mut marks: Vec<(usize, usize, &str)> = Vec::new();
    for &(pattern, tag) in patterns {
        let re = Regex::new(pattern)
            .map_err(|e| AppError::Config(format!("Invalid regex pattern '{pattern}': {e}")))?;
        for mat in re.find_iter(text) {
            marks.push((mat.start(), mat.end(), tag));
        }
    }
    marks.sort_by_key(|m| m.0);

    let mut annotated = String::with_capacity(text.len());
    let mut last_pos = 0;
    for (start, end, tag) in marks {
        if start < last_pos {
            continue; // overlapping hit, keep the first
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(">>>[");
        annotated.push_str(tag);
        annotated.push(']');
        annotated.push_str(&text[start..end]);
        annotated.push_str("<<<");
        last_pos = end;
    }
    annotated.push_str(&text[last_pos..]);

    let mut file = File::create(path)?;
    file.write_all(annotated.as_bytes())?;

    tracing::info!("Saved annotated text to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_every_pattern_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.txt");

        let text = "Abstract here, then Keywords later.";
        save_annotated_text(
            text,
            &path,
            &[(r"(?i)\babstract\b", "label"), (r"(?i)\bkeywords?\b", "boundary")],
        )
        .unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            saved,
            ">>>[label]Abstract<<< here, then >>>[boundary]Keywords<<< later."
        );
    }
}
