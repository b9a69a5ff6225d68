// Topic extraction — TF-IDF vectorizing and keyword ranking of transcripts.

pub mod ranker;
pub mod tfidf;
pub mod tokenize;
pub mod traits;
pub mod vectorizer;
