// Corpus — the ordered set of transcript documents fed to the vectorizer.

pub mod store;

use serde::{Deserialize, Serialize};

/// An ordered collection of documents with a parallel list of identifiers.
///
/// Documents keep the order they were added in, so row `i` of any matrix
/// built from the corpus traces back to `identifiers()[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<String>,
    identifiers: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from bare texts, identified by their position.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut corpus = Self::new();
        for (i, text) in texts.into_iter().enumerate() {
            corpus.push(i.to_string(), text);
        }
        corpus
    }

    pub fn push(&mut self, identifier: impl Into<String>, text: impl Into<String>) {
        self.identifiers.push(identifier.into());
        self.documents.push(text.into());
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Iterate over `(identifier, text)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.identifiers
            .iter()
            .zip(self.documents.iter())
            .map(|(id, doc)| (id.as_str(), doc.as_str()))
    }
}
