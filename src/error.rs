// Error taxonomy shared by the corpus, vectorizer, and comment loaders.
//
// Only SourceUnavailable and EmptyCorpus ever stop a pipeline. ItemUnreadable
// is collected alongside the loaded data so the caller can report it, and an
// empty input is an Outcome, not an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// The directory or file holding the whole input could not be read.
    #[error("Source unavailable: {}: {reason}", source_path.display())]
    SourceUnavailable { source_path: PathBuf, reason: String },

    /// A single document or record was skipped.
    #[error("Unreadable item {item}: {reason}")]
    ItemUnreadable { item: String, reason: String },

    /// The vectorizer was handed zero documents.
    #[error("Cannot vectorize an empty corpus")]
    EmptyCorpus,
}

impl SourceError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SourceError::SourceUnavailable {
            source_path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unreadable(item: impl Into<String>, reason: impl ToString) -> Self {
        SourceError::ItemUnreadable {
            item: item.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result of a pipeline run that may legitimately have nothing to work on.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    NothingToProcess,
}

impl<T> Outcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    /// Convert into an Option, dropping the empty signal.
    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(v) => Some(v),
            Outcome::NothingToProcess => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SourceError::unavailable("/no/such/dir", "not found");
        assert_eq!(
            err.to_string(),
            "Source unavailable: /no/such/dir: not found"
        );

        let err = SourceError::unreadable("a.txt", "invalid UTF-8");
        assert_eq!(err.to_string(), "Unreadable item a.txt: invalid UTF-8");
    }

    #[test]
    fn test_outcome_ready() {
        let ready: Outcome<u32> = Outcome::Ready(3);
        assert!(ready.is_ready());
        assert_eq!(ready.ready(), Some(3));

        let empty: Outcome<u32> = Outcome::NothingToProcess;
        assert!(!empty.is_ready());
        assert_eq!(empty.ready(), None);
    }
}
