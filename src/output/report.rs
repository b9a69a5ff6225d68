// Report files: the keyword list and the augmented comment export.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::themes::classifier::{Classification, ClassifiedComment, ThemeSummary};
use crate::themes::definition::ThemeIssue;
use crate::topics::ranker::TermScore;

/// One `term: score` line per entry, score to four decimals.
pub fn format_keyword_lines(scores: &[TermScore]) -> String {
    let mut out = String::new();
    for entry in scores {
        let _ = writeln!(out, "{}: {:.4}", entry.term, entry.score);
    }
    out
}

/// Write the full keyword ranking to `path`, creating parent directories.
pub fn write_keyword_file(scores: &[TermScore], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, format_keyword_lines(scores))
        .with_context(|| format!("Failed to write keywords to {}", path.display()))
}

/// The persisted shape of a theme run.
#[derive(Debug, Serialize)]
pub struct ThemeReport<'a> {
    pub generated_at: String,
    pub summary: &'a [ThemeSummary],
    pub dropped_themes: &'a [ThemeIssue],
    pub comments: &'a [ClassifiedComment],
}

impl<'a> ThemeReport<'a> {
    pub fn new(classification: &'a Classification, dropped_themes: &'a [ThemeIssue]) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: &classification.summary,
            dropped_themes,
            comments: &classification.comments,
        }
    }
}

/// Write the theme report as pretty-printed JSON to `path`.
pub fn write_theme_report(report: &ThemeReport<'_>, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write theme report to {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lines_format() {
        let scores = vec![
            TermScore {
                term: "senna".to_string(),
                score: 0.123456,
            },
            TermScore {
                term: "monaco".to_string(),
                score: 0.1,
            },
        ];
        assert_eq!(format_keyword_lines(&scores), "senna: 0.1235\nmonaco: 0.1000\n");
    }

    #[test]
    fn test_keyword_lines_empty() {
        assert_eq!(format_keyword_lines(&[]), "");
    }
}
