// Unit tests for the TF-IDF vectorizer and keyword ranker.
//
// Tests the matrix shape, idf ordering, ranking order and tie handling
// through the public API only.

use vidlex::corpus::Corpus;
use vidlex::error::{Outcome, SourceError};
use vidlex::topics::ranker::{self, ScoreAggregation};
use vidlex::topics::tfidf::TfIdfExtractor;
use vidlex::topics::tokenize::StopWords;
use vidlex::topics::traits::KeywordExtractor;
use vidlex::topics::vectorizer::{DocumentTermMatrix, TermWeighting, Vectorizer};

fn vectorizer() -> Vectorizer {
    Vectorizer::with_stop_words(StopWords::from_words(["the", "a", "on"]))
}

fn fit(docs: &[&str]) -> DocumentTermMatrix {
    vectorizer().fit_transform(docs).unwrap()
}

// ============================================================
// Matrix shape and values
// ============================================================

#[test]
fn matrix_has_one_row_per_document_and_one_column_per_term() {
    let m = fit(&["the cat sat", "the dog sat", "a bird sang on the wire"]);
    assert_eq!(m.n_rows(), 3);
    assert_eq!(m.n_cols(), m.vocabulary().len());
    assert_eq!(
        m.vocabulary().terms(),
        &["bird", "cat", "dog", "sang", "sat", "wire"]
    );
}

#[test]
fn stop_words_never_enter_the_vocabulary() {
    let m = fit(&["the cat sat on the mat"]);
    assert!(m.vocabulary().index_of("the").is_none());
    assert!(m.vocabulary().index_of("on").is_none());
    assert!(m.vocabulary().index_of("mat").is_some());
}

#[test]
fn all_cells_non_negative() {
    let m = fit(&[
        "rain rain rain falls on the plain",
        "the plain is dry",
        "falls and rain",
    ]);
    for row in m.to_dense() {
        assert!(row.iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn absent_term_cell_is_zero() {
    let m = fit(&["the cat sat", "the dog sat"]);
    let dog = m.vocabulary().index_of("dog").unwrap();
    assert_eq!(m.get(0, dog), Some(0.0));
    assert!(m.get(0, m.n_cols()).is_none());
    assert!(m.get(2, 0).is_none());
}

#[test]
fn term_in_every_document_has_minimum_idf() {
    let m = fit(&["the cat sat", "the dog sat", "sat quietly"]);
    let sat = m.vocabulary().index_of("sat").unwrap();
    let cat = m.vocabulary().index_of("cat").unwrap();

    let sat_idf = m.idf(sat).unwrap();
    let cat_idf = m.idf(cat).unwrap();
    assert!((sat_idf - 1.0).abs() < 1e-12);
    assert!(cat_idf > sat_idf);
    for &idf in m.idf_values() {
        assert!(idf >= sat_idf);
        assert!(idf <= cat_idf + 1e-12);
    }
}

#[test]
fn raw_count_scales_with_repetition() {
    let m = fit(&["echo echo echo", "echo once"]);
    let echo = m.vocabulary().index_of("echo").unwrap();
    let first = m.get(0, echo).unwrap();
    let second = m.get(1, echo).unwrap();
    assert!((first - 3.0 * second).abs() < 1e-9);
}

#[test]
fn relative_weighting_divides_by_document_length() {
    let v = Vectorizer {
        weighting: TermWeighting::Relative,
        ..vectorizer()
    };
    let m = v.fit_transform(&["alpha beta beta gamma"]).unwrap();
    let beta = m.vocabulary().index_of("beta").unwrap();
    // Single document: idf is 1 for every term
    assert!((m.get(0, beta).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn l2_normalization_gives_unit_rows() {
    let v = Vectorizer {
        l2_normalize: true,
        ..vectorizer()
    };
    let m = v
        .fit_transform(&["river stone river", "stone bridge", "the"])
        .unwrap();
    for row in m.to_dense().iter().take(2) {
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
    // A document with no content tokens stays all zero
    assert!(m.to_dense()[2].iter().all(|&v| v == 0.0));
}

#[test]
fn empty_input_is_an_error() {
    let docs: [&str; 0] = [];
    assert!(matches!(
        vectorizer().fit_transform(&docs),
        Err(SourceError::EmptyCorpus)
    ));
}

#[test]
fn only_stop_words_gives_empty_vocabulary() {
    let m = fit(&["the a on", "on the"]);
    assert_eq!(m.n_rows(), 2);
    assert_eq!(m.n_cols(), 0);
    assert!(ranker::rank(&m, ScoreAggregation::CorpusMean).is_empty());
}

// ============================================================
// Ranking
// ============================================================

#[test]
fn ranking_is_non_increasing() {
    let m = fit(&[
        "formula one racing at monaco",
        "racing in the rain at spa",
        "monaco harbour and the tunnel",
        "spa rain again",
    ]);
    let ranking = ranker::rank(&m, ScoreAggregation::CorpusMean);
    assert_eq!(ranking.len(), m.n_cols());
    for pair in ranking.all().windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn shared_term_leads_corpus_mean() {
    let m = fit(&["the cat sat", "the dog sat"]);
    let ranking = ranker::rank(&m, ScoreAggregation::CorpusMean);
    let terms: Vec<&str> = ranking.all().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["sat", "cat", "dog"]);
    assert!((ranking.all()[0].score - 1.0).abs() < 1e-12);
    let expected = ((3.0f64 / 2.0).ln() + 1.0) / 2.0;
    assert!((ranking.all()[1].score - expected).abs() < 1e-12);
}

#[test]
fn distinctive_terms_lead_occurrence_mean() {
    let m = fit(&["the cat sat", "the dog sat"]);
    let ranking = ranker::rank(&m, ScoreAggregation::OccurrenceMean);
    let terms: Vec<&str> = ranking.all().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["cat", "dog", "sat"]);
}

#[test]
fn identical_documents_tie_in_vocabulary_order() {
    let m = fit(&["zebra apple mango", "zebra apple mango", "zebra apple mango"]);
    let ranking = ranker::rank(&m, ScoreAggregation::CorpusMean);
    let terms: Vec<&str> = ranking.all().iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["apple", "mango", "zebra"]);
    assert!(ranking
        .all()
        .iter()
        .all(|t| (t.score - ranking.all()[0].score).abs() < 1e-12));
}

#[test]
fn top_is_clamped_to_vocabulary_size() {
    let m = fit(&["one two", "two three"]);
    let ranking = ranker::rank(&m, ScoreAggregation::CorpusMean);
    assert_eq!(ranking.top(2).len(), 2);
    assert_eq!(ranking.top(50).len(), 3);
    assert!(ranking.top(0).is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let docs = [
        "pit stop strategy decided the race",
        "the race had a late safety car",
        "strategy and tyres",
    ];
    let first = ranker::rank(&fit(&docs), ScoreAggregation::CorpusMean);
    for _ in 0..5 {
        assert_eq!(ranker::rank(&fit(&docs), ScoreAggregation::CorpusMean), first);
    }
}

// ============================================================
// TfIdfExtractor
// ============================================================

#[test]
fn extractor_reports_nothing_to_process_for_empty_corpus() {
    let extractor = TfIdfExtractor::default();
    let outcome = extractor.extract(&Corpus::new()).unwrap();
    assert_eq!(outcome, Outcome::NothingToProcess);
}

#[test]
fn extractor_matches_direct_ranking() {
    let docs = ["the cat sat", "the dog sat"];
    let extractor = TfIdfExtractor {
        vectorizer: vectorizer(),
        aggregation: ScoreAggregation::CorpusMean,
    };
    let ranking = extractor
        .extract(&Corpus::from_texts(docs))
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(ranking, ranker::rank(&fit(&docs), ScoreAggregation::CorpusMean));
}
