// TF-IDF keyword extraction over a transcript corpus.
//
// Each transcript is one document for IDF purposes: words said in every
// recording get downweighted, while words distinctive to a few recordings
// rise to the top of the ranking.

use tracing::info;

use super::ranker::{rank, KeywordRanking, ScoreAggregation};
use super::traits::KeywordExtractor;
use super::vectorizer::{DocumentTermMatrix, Vectorizer};
use crate::corpus::Corpus;
use crate::error::{Outcome, SourceError};

/// TF-IDF based keyword extractor — the default.
#[derive(Debug, Clone, Default)]
pub struct TfIdfExtractor {
    pub vectorizer: Vectorizer,
    pub aggregation: ScoreAggregation,
}

impl TfIdfExtractor {
    /// Build the document-term matrix without ranking it, for consumers that
    /// want the vector space itself.
    pub fn vectorize(&self, corpus: &Corpus) -> Result<Outcome<DocumentTermMatrix>, SourceError> {
        if corpus.is_empty() {
            info!("No documents to vectorize");
            return Ok(Outcome::NothingToProcess);
        }
        self.vectorizer
            .fit_transform(corpus.documents())
            .map(Outcome::Ready)
    }
}

impl KeywordExtractor for TfIdfExtractor {
    fn extract(&self, corpus: &Corpus) -> Result<Outcome<KeywordRanking>, SourceError> {
        let matrix = match self.vectorize(corpus)? {
            Outcome::Ready(m) => m,
            Outcome::NothingToProcess => return Ok(Outcome::NothingToProcess),
        };

        let ranking = rank(&matrix, self.aggregation);

        if let Some(top) = ranking.all().first() {
            info!(
                keywords = ranking.len(),
                top_keyword = %top.term,
                top_score = top.score,
                aggregation = %self.aggregation,
                "Ranked TF-IDF keywords"
            );
        } else {
            info!(
                documents = corpus.len(),
                "Corpus has no terms left after stop-word removal"
            );
        }

        Ok(Outcome::Ready(ranking))
    }
}
