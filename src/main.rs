use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use vidlex::config::Config;
use vidlex::corpus::store::{self, DocumentFilter};
use vidlex::error::Outcome;
use vidlex::output::{report, terminal};
use vidlex::themes::{classifier, comments, definition};
use vidlex::topics::ranker::ScoreAggregation;
use vidlex::topics::tfidf::TfIdfExtractor;
use vidlex::topics::tokenize::{StopWordLanguage, StopWords};
use vidlex::topics::traits::KeywordExtractor;
use vidlex::topics::vectorizer::{TermWeighting, Vectorizer};

/// vidlex: keyword ranking for video transcripts and theme tagging for
/// viewer comments.
#[derive(Parser)]
#[command(name = "vidlex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank transcript vocabulary by TF-IDF distinctiveness
    Keywords {
        /// Directory of transcript files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Transcript file extension (default: txt)
        #[arg(long)]
        ext: Option<String>,

        /// Number of keywords to print (default: 20)
        #[arg(long)]
        top: Option<usize>,

        /// File receiving the full ranking
        #[arg(long)]
        output: Option<PathBuf>,

        /// Stop-word list: english, spanish, french, german, italian, portuguese, none
        #[arg(long)]
        stop_words: Option<String>,

        /// Score aggregation: corpus-mean or occurrence-mean
        #[arg(long)]
        aggregation: Option<String>,

        /// Use count / document length as term frequency instead of raw counts
        #[arg(long)]
        relative_tf: bool,

        /// Normalize each document vector to unit length
        #[arg(long)]
        l2: bool,
    },

    /// Tag comments with keyword themes and report mention percentages
    Themes {
        /// Comment export (JSON file or directory of JSON files)
        #[arg(long)]
        comments: Option<PathBuf>,

        /// Theme definition table (JSON)
        #[arg(long)]
        themes: Option<PathBuf>,

        /// Field holding the comment body
        #[arg(long)]
        text_field: Option<String>,

        /// File receiving the augmented comments and summary
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the resolved configuration and whether each input exists
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vidlex=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Keywords {
            dir,
            ext,
            top,
            output,
            stop_words,
            aggregation,
            relative_tf,
            l2,
        } => {
            if let Some(dir) = dir {
                config.transcript_dir = dir;
            }
            if let Some(ext) = ext {
                config.transcript_ext = ext;
            }
            if let Some(top) = top {
                config.top_k = top;
            }
            if output.is_some() {
                config.keywords_output = output;
            }
            if let Some(lang) = stop_words {
                config.stop_words = lang
                    .parse::<StopWordLanguage>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            if let Some(agg) = aggregation {
                config.aggregation = agg
                    .parse::<ScoreAggregation>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }

            let weighting = if relative_tf {
                TermWeighting::Relative
            } else {
                TermWeighting::RawCount
            };
            run_keywords(&config, weighting, l2)?;
        }

        Commands::Themes {
            comments,
            themes,
            text_field,
            output,
        } => {
            if let Some(comments) = comments {
                config.comments_path = comments;
            }
            if let Some(themes) = themes {
                config.themes_path = themes;
            }
            if let Some(field) = text_field {
                config.comment_text_field = field;
            }
            if let Some(output) = output {
                config.themes_output = output;
            }
            run_themes(&config)?;
        }

        Commands::Status => show_status(&config),
    }

    Ok(())
}

/// Corpus store -> vectorizer -> ranker, then print and persist the ranking.
fn run_keywords(config: &Config, weighting: TermWeighting, l2_normalize: bool) -> Result<()> {
    let mut filter = DocumentFilter::with_extension(&config.transcript_ext);
    if let Some(own_report) = config.keywords_output_in_corpus() {
        filter = filter.excluding(own_report);
    }

    println!(
        "Loading transcripts from {}...",
        config.transcript_dir.display()
    );
    let load = store::load_dir(&config.transcript_dir, &filter)
        .context("Could not read the transcript directory")?;
    terminal::display_skipped(&load.skipped);

    let extractor = TfIdfExtractor {
        vectorizer: Vectorizer {
            stop_words: StopWords::for_language(config.stop_words),
            weighting,
            l2_normalize,
            ..Vectorizer::default()
        },
        aggregation: config.aggregation,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Vectorizing {} transcripts...", load.corpus.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = extractor.extract(&load.corpus);
    spinner.finish_and_clear();

    let ranking = match outcome? {
        Outcome::Ready(ranking) => ranking,
        Outcome::NothingToProcess => {
            println!(
                "No text files found in {}.",
                config.transcript_dir.display()
            );
            return Ok(());
        }
    };

    terminal::display_keyword_ranking(ranking.top(config.top_k), load.corpus.len());

    let output = config.keywords_output_path();
    report::write_keyword_file(ranking.all(), &output)?;
    info!(
        path = %output.display(),
        keywords = ranking.len(),
        "Saved keyword ranking"
    );
    println!("{}", format!("Keywords saved to {}.", output.display()).bold());
    Ok(())
}

/// Load comments and themes, classify, then print and persist the result.
fn run_themes(config: &Config) -> Result<()> {
    let theme_load = definition::load_themes(&config.themes_path)
        .context("Could not read the theme definitions")?;
    for issue in &theme_load.issues {
        println!(
            "  {} dropped theme '{}' ({})",
            "Warning:".yellow(),
            issue.theme,
            issue.reason
        );
    }

    let comment_load = comments::load_comments(&config.comments_path, &config.comment_text_field)
        .context("Could not read the comments")?;
    terminal::display_skipped(&comment_load.skipped);

    let classification = classifier::classify(comment_load.records, theme_load.themes.themes());
    terminal::display_theme_summary(&classification);

    let report = report::ThemeReport::new(&classification, &theme_load.issues);
    report::write_theme_report(&report, &config.themes_output)?;
    println!(
        "{}",
        format!("Results saved to {}.", config.themes_output.display()).bold()
    );
    Ok(())
}

fn presence(path: &Path) -> String {
    if path.exists() {
        "found".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

fn show_status(config: &Config) {
    println!("{}", "=== vidlex configuration ===".bold());
    println!(
        "  Transcripts:  {} (*.{}) [{}]",
        config.transcript_dir.display(),
        config.transcript_ext,
        presence(&config.transcript_dir)
    );
    println!("  Keywords out: {}", config.keywords_output_path().display());
    println!(
        "  Ranking:      top {} by {}, stop words: {}",
        config.top_k, config.aggregation, config.stop_words
    );
    println!(
        "  Comments:     {} (text field '{}') [{}]",
        config.comments_path.display(),
        config.comment_text_field,
        presence(&config.comments_path)
    );
    println!(
        "  Themes:       {} [{}]",
        config.themes_path.display(),
        presence(&config.themes_path)
    );
    println!("  Themes out:   {}", config.themes_output.display());
}
