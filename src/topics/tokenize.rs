// Tokenization and stop-word filtering for transcript text.
//
// A token is a run of alphanumeric characters or underscores, lowercased,
// at least `min_len` characters long. Everything else is a separator, so
// "don't" yields "don" and the single "t" is dropped.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use stop_words::{get, LANGUAGE};

/// Languages we ship stop-word lists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWordLanguage {
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    /// Keep every token
    None,
}

impl StopWordLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopWordLanguage::English => "english",
            StopWordLanguage::Spanish => "spanish",
            StopWordLanguage::French => "french",
            StopWordLanguage::German => "german",
            StopWordLanguage::Italian => "italian",
            StopWordLanguage::Portuguese => "portuguese",
            StopWordLanguage::None => "none",
        }
    }
}

impl fmt::Display for StopWordLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StopWordLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(StopWordLanguage::English),
            "spanish" | "es" => Ok(StopWordLanguage::Spanish),
            "french" | "fr" => Ok(StopWordLanguage::French),
            "german" | "de" => Ok(StopWordLanguage::German),
            "italian" | "it" => Ok(StopWordLanguage::Italian),
            "portuguese" | "pt" => Ok(StopWordLanguage::Portuguese),
            "none" | "" => Ok(StopWordLanguage::None),
            other => Err(format!(
                "unknown stop-word language '{other}' \
                 (expected english, spanish, french, german, italian, portuguese or none)"
            )),
        }
    }
}

/// A closed set of lowercase function words excluded from the vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// An empty set: nothing is filtered.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn english() -> Self {
        Self::for_language(StopWordLanguage::English)
    }

    pub fn for_language(language: StopWordLanguage) -> Self {
        let list = match language {
            StopWordLanguage::English => LANGUAGE::English,
            StopWordLanguage::Spanish => LANGUAGE::Spanish,
            StopWordLanguage::French => LANGUAGE::French,
            StopWordLanguage::German => LANGUAGE::German,
            StopWordLanguage::Italian => LANGUAGE::Italian,
            StopWordLanguage::Portuguese => LANGUAGE::Portuguese,
            StopWordLanguage::None => return Self::none(),
        };
        let words: Vec<String> = get(list);
        Self::from_words(words)
    }

    /// Build a set from an explicit list. Entries are lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Split `text` into lowercase tokens of at least `min_len` characters.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty() && t.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// Tokenize and drop stop words in one pass.
pub fn content_tokens(text: &str, min_len: usize, stop_words: &StopWords) -> Vec<String> {
    tokenize(text, min_len)
        .into_iter()
        .filter(|t| !stop_words.contains(t))
        .collect()
}
