// Colored terminal output for keyword rankings and theme summaries.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::error::SourceError;
use crate::themes::classifier::{Classification, Percentage};
use crate::topics::ranker::TermScore;

/// Display the top keywords as a ranked table with a relative bar.
pub fn display_keyword_ranking(top: &[TermScore], document_count: usize) {
    if top.is_empty() {
        println!("No keywords survived stop-word removal.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Top {} Keywords ({} transcripts) ===",
            top.len(),
            document_count
        )
        .bold()
    );
    println!();

    let bar_width: usize = 20;
    let max_score = top.first().map(|t| t.score).unwrap_or(0.0);

    for (i, entry) in top.iter().enumerate() {
        let filled = if max_score > 0.0 {
            ((entry.score / max_score) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(bar_width.saturating_sub(filled))
        );

        println!(
            "  {:>3}. {:<28} {} {:.4}",
            i + 1,
            super::truncate_chars(&entry.term, 28).bold(),
            bar.bright_green(),
            entry.score
        );
    }
    println!();
}

/// Display one line per theme with the share of comments mentioning it,
/// followed by one example comment for each matched theme.
pub fn display_theme_summary(classification: &Classification) {
    if classification.summary.is_empty() {
        println!("No valid themes to classify against.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Theme Mentions ({} comments) ===",
            classification.comments.len()
        )
        .bold()
    );
    println!();

    for summary in &classification.summary {
        match summary.percentage {
            Percentage::Value(pct) => {
                let line = format!(
                    "The theme '{}' is mentioned in {:.2}% of the comments.",
                    summary.theme, pct
                );
                let colored_line = if pct >= 25.0 {
                    line.bright_green()
                } else if pct > 0.0 {
                    line.normal()
                } else {
                    line.dimmed()
                };
                println!("  {colored_line}");

                let example = classification
                    .comments
                    .iter()
                    .find(|c| c.mentions(&summary.theme) == Some(true));
                if let Some(example) = example {
                    let preview = super::truncate_chars(example.record.text(), 100);
                    println!("      e.g. \"{}\"", preview.dimmed());
                }
            }
            Percentage::NoData => {
                println!(
                    "  {}",
                    format!(
                        "The theme '{}' has no data: there are no comments to classify.",
                        summary.theme
                    )
                    .yellow()
                );
            }
        }
    }
    println!();
}

/// Report items skipped while loading a source.
pub fn display_skipped(skipped: &[SourceError]) {
    if skipped.is_empty() {
        return;
    }
    println!(
        "  {} {} item(s) skipped:",
        "Warning:".yellow(),
        skipped.len()
    );
    for err in skipped {
        println!("    {}", super::truncate_chars(&err.to_string(), 140).dimmed());
    }
}
