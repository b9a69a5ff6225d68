use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::themes::comments::DEFAULT_TEXT_FIELD;
use crate::topics::ranker::ScoreAggregation;
use crate::topics::tokenize::StopWordLanguage;

/// Central configuration loaded from environment variables.
///
/// A .env file is loaded automatically at startup via dotenvy. Every
/// value has a default matching the layout the downloader scripts produce,
/// and every value can be overridden by a CLI flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory of plain-text transcripts, one per recording
    pub transcript_dir: PathBuf,
    /// Extension identifying transcript files (without the dot)
    pub transcript_ext: String,
    /// Where the full keyword ranking is written; defaults to
    /// `keywords.txt` inside the transcript directory
    pub keywords_output: Option<PathBuf>,
    /// How many keywords to print
    pub top_k: usize,
    pub stop_words: StopWordLanguage,
    pub aggregation: ScoreAggregation,
    /// Comment export: a JSON file or a directory of JSON files
    pub comments_path: PathBuf,
    /// Name of the field holding the comment body
    pub comment_text_field: String,
    /// Theme definition table (JSON)
    pub themes_path: PathBuf,
    /// Where the augmented comments and theme summary are written
    pub themes_output: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys take their defaults;
    /// set-but-malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transcript_dir = lookup("VIDLEX_TRANSCRIPT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("downloads/transcriptions"));

        let top_k = match lookup("VIDLEX_TOP_K") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("VIDLEX_TOP_K must be a non-negative integer, got '{v}'"))?,
            None => 20,
        };

        let stop_words = match lookup("VIDLEX_STOP_WORDS") {
            Some(v) => v
                .parse::<StopWordLanguage>()
                .map_err(|e| anyhow::anyhow!("VIDLEX_STOP_WORDS: {e}"))?,
            None => StopWordLanguage::English,
        };

        let aggregation = match lookup("VIDLEX_AGGREGATION") {
            Some(v) => v
                .parse::<ScoreAggregation>()
                .map_err(|e| anyhow::anyhow!("VIDLEX_AGGREGATION: {e}"))?,
            None => ScoreAggregation::CorpusMean,
        };

        Ok(Self {
            transcript_ext: lookup("VIDLEX_TRANSCRIPT_EXT").unwrap_or_else(|| "txt".to_string()),
            keywords_output: lookup("VIDLEX_KEYWORDS_OUTPUT").map(PathBuf::from),
            transcript_dir,
            top_k,
            stop_words,
            aggregation,
            comments_path: lookup("VIDLEX_COMMENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("downloads/comments/all_comments.json")),
            comment_text_field: lookup("VIDLEX_COMMENT_TEXT_FIELD")
                .unwrap_or_else(|| DEFAULT_TEXT_FIELD.to_string()),
            themes_path: lookup("VIDLEX_THEMES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("downloads/comments/themes_keywords.json")),
            themes_output: lookup("VIDLEX_THEMES_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("comments_with_themes.json")),
        })
    }

    pub fn keywords_output_path(&self) -> PathBuf {
        self.keywords_output
            .clone()
            .unwrap_or_else(|| self.transcript_dir.join("keywords.txt"))
    }

    /// File name of the keyword report when it lives inside the transcript
    /// directory, so the corpus loader can leave it out.
    pub fn keywords_output_in_corpus(&self) -> Option<String> {
        let output = self.keywords_output_path();
        if dir_or_current(output.parent()?) == dir_or_current(&self.transcript_dir) {
            output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        } else {
            None
        }
    }
}

/// A bare file name has an empty parent, which means the current directory.
fn dir_or_current(dir: &Path) -> &Path {
    if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    }
}
