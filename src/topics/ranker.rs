// Keyword ranker — collapse a TF-IDF matrix into one score per term.
//
// Ranking is by score descending; equal scores fall back to vocabulary
// order, so the same corpus always produces the same list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::vectorizer::DocumentTermMatrix;

/// How a term's column is reduced to a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreAggregation {
    /// Column sum divided by the number of documents
    #[default]
    CorpusMean,
    /// Column sum divided by the number of documents containing the term
    OccurrenceMean,
}

impl ScoreAggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreAggregation::CorpusMean => "corpus-mean",
            ScoreAggregation::OccurrenceMean => "occurrence-mean",
        }
    }
}

impl fmt::Display for ScoreAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoreAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corpus-mean" | "mean" => Ok(ScoreAggregation::CorpusMean),
            "occurrence-mean" => Ok(ScoreAggregation::OccurrenceMean),
            other => Err(format!(
                "unknown aggregation '{other}' (expected corpus-mean or occurrence-mean)"
            )),
        }
    }
}

/// A vocabulary term with its corpus-wide score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Terms sorted by score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordRanking {
    entries: Vec<TermScore>,
}

impl KeywordRanking {
    pub fn all(&self) -> &[TermScore] {
        &self.entries
    }

    /// The first `k` entries, or all of them when `k` exceeds the vocabulary.
    pub fn top(&self, k: usize) -> &[TermScore] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<TermScore> {
        self.entries
    }
}

/// One score per vocabulary term, in vocabulary order.
pub fn term_scores(matrix: &DocumentTermMatrix, aggregation: ScoreAggregation) -> Vec<f64> {
    let sums = matrix.column_sums();
    let n_rows = matrix.n_rows();

    sums.into_iter()
        .enumerate()
        .map(|(col, sum)| {
            let denominator = match aggregation {
                ScoreAggregation::CorpusMean => n_rows,
                ScoreAggregation::OccurrenceMean => {
                    matrix.document_frequency(col).unwrap_or(0)
                }
            };
            if denominator == 0 {
                0.0
            } else {
                sum / denominator as f64
            }
        })
        .collect()
}

/// Score every term and sort descending, ties in vocabulary order.
pub fn rank(matrix: &DocumentTermMatrix, aggregation: ScoreAggregation) -> KeywordRanking {
    let scores = term_scores(matrix, aggregation);

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

    let vocabulary = matrix.vocabulary();
    let entries = order
        .into_iter()
        .filter_map(|col| {
            vocabulary.term(col).map(|term| TermScore {
                term: term.to_string(),
                score: scores[col],
            })
        })
        .collect();

    KeywordRanking { entries }
}
