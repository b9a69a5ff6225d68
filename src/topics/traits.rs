// Keyword extractor trait — swap-ready abstraction.
//
// The default implementation ranks terms by TF-IDF. A different scorer
// (or one layered over a clustering step) can slot in without changing
// the CLI or the output code.

use super::ranker::KeywordRanking;
use crate::corpus::Corpus;
use crate::error::{Outcome, SourceError};

/// Trait for ranking the vocabulary of a transcript corpus.
pub trait KeywordExtractor {
    /// Rank the corpus vocabulary. An empty corpus is `NothingToProcess`.
    fn extract(&self, corpus: &Corpus) -> Result<Outcome<KeywordRanking>, SourceError>;
}
