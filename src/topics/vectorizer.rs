// TF-IDF vectorizer — builds a sparse document-term matrix from raw text.
//
// idf(t) = ln((1 + N) / (1 + df(t))) + 1
//
// The +1 inside the log keeps the ratio defined for any df, and the +1
// outside keeps terms present in every document from being weighted to zero.
// Term counting runs per document in parallel; rayon's collect keeps corpus
// order, so the matrix is the same as a serial build.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::tokenize::{content_tokens, StopWords};
use crate::error::SourceError;

/// How raw term counts turn into the `tf` factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TermWeighting {
    /// tf = occurrences of the term in the document
    #[default]
    RawCount,
    /// tf = occurrences / surviving tokens in the document
    Relative,
}

/// Distinct terms in lexicographic order; a term's position is its column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for Vocabulary {
    fn from(mut terms: Vec<String>) -> Self {
        terms.sort();
        terms.dedup();
        Self::from_sorted(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

impl Vocabulary {
    fn from_sorted(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// One matrix row: `(column, weight)` pairs sorted by column, zeros omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero cells.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rows are documents in corpus order, columns are vocabulary terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    vocabulary: Vocabulary,
    rows: Vec<SparseRow>,
    idf: Vec<f64>,
    document_frequency: Vec<usize>,
}

impl DocumentTermMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Cell weight, or None when either index is out of range.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.n_cols() {
            return None;
        }
        self.rows.get(row).map(|r| r.get(column))
    }

    pub fn row(&self, row: usize) -> Option<&SparseRow> {
        self.rows.get(row)
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    pub fn idf_values(&self) -> &[f64] {
        &self.idf
    }

    /// How many documents contain the term at `column` at least once.
    pub fn document_frequency(&self, column: usize) -> Option<usize> {
        self.document_frequency.get(column).copied()
    }

    /// Sum of every column, in vocabulary order.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_cols()];
        for row in &self.rows {
            for &(col, weight) in row.entries() {
                sums[col] += weight;
            }
        }
        sums
    }

    /// Materialize as a dense `n_rows x n_cols` grid.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut dense = vec![0.0; self.n_cols()];
                for &(col, weight) in row.entries() {
                    dense[col] = weight;
                }
                dense
            })
            .collect()
    }
}

/// Vectorizer settings. `Default` filters English stop words, keeps tokens of
/// two or more characters, and uses raw counts without row normalization.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    pub stop_words: StopWords,
    pub min_token_len: usize,
    pub weighting: TermWeighting,
    /// Scale every row to unit Euclidean length after tf * idf
    pub l2_normalize: bool,
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self {
            stop_words: StopWords::english(),
            min_token_len: 2,
            weighting: TermWeighting::RawCount,
            l2_normalize: false,
        }
    }
}

struct TermCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl Vectorizer {
    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            ..Self::default()
        }
    }

    /// Build the vocabulary and TF-IDF matrix for `documents`.
    ///
    /// Fails only on an empty document list. A document with no surviving
    /// tokens becomes an all-zero row.
    pub fn fit_transform<S>(&self, documents: &[S]) -> Result<DocumentTermMatrix, SourceError>
    where
        S: AsRef<str> + Sync,
    {
        if documents.is_empty() {
            return Err(SourceError::EmptyCorpus);
        }

        let per_document: Vec<TermCounts> = documents
            .par_iter()
            .map(|doc| self.count_terms(doc.as_ref()))
            .collect();

        let terms: BTreeSet<&str> = per_document
            .iter()
            .flat_map(|tc| tc.counts.keys().map(String::as_str))
            .collect();
        let vocabulary =
            Vocabulary::from_sorted(terms.into_iter().map(str::to_string).collect());

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tc in &per_document {
            for term in tc.counts.keys() {
                if let Some(col) = vocabulary.index_of(term) {
                    document_frequency[col] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseRow> = per_document
            .par_iter()
            .map(|tc| self.weigh_row(tc, &vocabulary, &idf))
            .collect();

        info!(
            documents = rows.len(),
            vocabulary = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Ok(DocumentTermMatrix {
            vocabulary,
            rows,
            idf,
            document_frequency,
        })
    }

    fn count_terms(&self, text: &str) -> TermCounts {
        let tokens = content_tokens(text, self.min_token_len, &self.stop_words);
        let total = tokens.len();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        TermCounts { counts, total }
    }

    fn weigh_row(&self, tc: &TermCounts, vocabulary: &Vocabulary, idf: &[f64]) -> SparseRow {
        let mut entries: Vec<(usize, f64)> = tc
            .counts
            .iter()
            .filter_map(|(term, &count)| {
                let col = vocabulary.index_of(term)?;
                let tf = match self.weighting {
                    TermWeighting::RawCount => count as f64,
                    // total >= count >= 1 for any term present in the row
                    TermWeighting::Relative => count as f64 / tc.total as f64,
                };
                Some((col, tf * idf[col]))
            })
            .collect();
        entries.sort_by_key(|&(col, _)| col);

        if self.l2_normalize {
            let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, w) in &mut entries {
                    *w /= norm;
                }
            }
        }

        SparseRow { entries }
    }
}
