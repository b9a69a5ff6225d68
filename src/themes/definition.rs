// Theme definitions — named keyword lists loaded from a JSON table.
//
// The table is either rows of (theme, keyword) pairs, as exported from a
// spreadsheet, or a mapping from theme name to keyword list. Keywords are
// case folded once here so matching never has to fold them again.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::scalar_text;
use crate::error::SourceError;

/// A named group of case-folded keywords, de-duplicated in original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    name: String,
    keywords: Vec<String>,
}

impl Theme {
    /// Empty keyword strings are discarded: an empty needle would match
    /// every comment.
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.clone()))
            .collect();
        Self {
            name: name.into(),
            keywords,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when any keyword occurs in `folded_text`, which must already be
    /// lowercased.
    pub fn matches_folded(&self, folded_text: &str) -> bool {
        self.keywords.iter().any(|k| folded_text.contains(k.as_str()))
    }

    /// Case-insensitive substring match against raw text.
    pub fn matches(&self, text: &str) -> bool {
        self.matches_folded(&text.to_lowercase())
    }
}

/// Why a theme was dropped while building a ThemeSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThemeIssueReason {
    NoKeywords,
    DuplicateName,
    MissingName,
    /// The keyword cell or list has the wrong JSON type
    MalformedKeywords,
}

impl fmt::Display for ThemeIssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThemeIssueReason::NoKeywords => "no keywords",
            ThemeIssueReason::DuplicateName => "duplicate theme name",
            ThemeIssueReason::MissingName => "missing theme name",
            ThemeIssueReason::MalformedKeywords => "malformed keyword list",
        };
        write!(f, "{s}")
    }
}

/// A theme that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeIssue {
    pub theme: String,
    pub reason: ThemeIssueReason,
}

/// A theme name with its raw keywords, or the reason they were unusable.
type Definition = (String, Result<Vec<String>, ThemeIssueReason>);

/// Validated themes in definition order, names unique, none empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeSet {
    themes: Vec<Theme>,
}

impl ThemeSet {
    /// Group `(theme, keyword)` rows by theme in order of first appearance.
    pub fn from_pairs<I, N, K>(pairs: I) -> (Self, Vec<ThemeIssue>)
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: Into<String>,
    {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, keyword) in pairs {
            grouped.entry(name.into()).or_default().push(keyword.into());
        }
        Self::from_definitions(grouped)
    }

    /// Build from `(name, keywords)` definitions. Later definitions reusing
    /// a name are dropped, as are themes left without keywords.
    pub fn from_definitions<I, K>(definitions: I) -> (Self, Vec<ThemeIssue>)
    where
        I: IntoIterator<Item = (String, K)>,
        K: IntoIterator<Item = String>,
    {
        Self::validate(
            definitions
                .into_iter()
                .map(|(name, keywords)| (name, Ok(keywords.into_iter().collect()))),
        )
    }

    fn validate<I>(definitions: I) -> (Self, Vec<ThemeIssue>)
    where
        I: IntoIterator<Item = Definition>,
    {
        let mut themes: Vec<Theme> = Vec::new();
        let mut issues = Vec::new();

        for (name, keywords) in definitions {
            let mut reason = if name.trim().is_empty() {
                Some(ThemeIssueReason::MissingName)
            } else if themes.iter().any(|t| t.name == name) {
                Some(ThemeIssueReason::DuplicateName)
            } else {
                None
            };

            let theme = match keywords {
                Ok(keywords) => Theme::new(name, keywords),
                Err(malformed) => {
                    reason = reason.or(Some(malformed));
                    Theme::new(name, Vec::<String>::new())
                }
            };
            let reason = reason.or_else(|| {
                theme
                    .keywords
                    .is_empty()
                    .then_some(ThemeIssueReason::NoKeywords)
            });

            match reason {
                Some(reason) => {
                    warn!(theme = %theme.name, %reason, "Dropping invalid theme");
                    issues.push(ThemeIssue {
                        theme: theme.name,
                        reason,
                    });
                }
                None => themes.push(theme),
            }
        }

        (Self { themes }, issues)
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// The two shapes a theme table comes in. Entries are kept exactly as
/// written, so a name repeated in the mapping form is still seen twice.
#[derive(Debug)]
enum ThemeFile {
    Rows(Vec<Value>),
    Mapping(Vec<(String, Value)>),
}

impl<'de> Deserialize<'de> for ThemeFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ThemeFileVisitor)
    }
}

struct ThemeFileVisitor;

impl<'de> Visitor<'de> for ThemeFileVisitor {
    type Value = ThemeFile;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of theme rows or a map of theme name to keywords")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ThemeFile, A::Error> {
        let mut rows = Vec::new();
        while let Some(row) = seq.next_element::<Value>()? {
            rows.push(row);
        }
        Ok(ThemeFile::Rows(rows))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ThemeFile, A::Error> {
        let mut entries = Vec::new();
        while let Some(entry) = map.next_entry::<String, Value>()? {
            entries.push(entry);
        }
        Ok(ThemeFile::Mapping(entries))
    }
}

/// Look up a row cell under its lowercase or spreadsheet column name.
fn row_cell<'a>(row: &'a Value, column: &str, alias: &str) -> Option<&'a Value> {
    row.get(column).or_else(|| row.get(alias))
}

/// The keyword held by one row cell. Null or absent is no keyword.
fn row_keyword(cell: Option<&Value>) -> Result<Option<String>, ThemeIssueReason> {
    match cell {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_text(value)
            .map(Some)
            .ok_or(ThemeIssueReason::MalformedKeywords),
    }
}

/// A mapping value must be a list; non-scalar list items are ignored.
fn keyword_list(value: &Value) -> Result<Vec<String>, ThemeIssueReason> {
    match value {
        Value::Array(items) => Ok(items.iter().filter_map(scalar_text).collect()),
        _ => Err(ThemeIssueReason::MalformedKeywords),
    }
}

/// Group rows by theme name in order of first appearance. A row whose
/// name cell is missing or not a scalar files under the blank name.
fn group_rows(rows: &[Value]) -> Vec<Definition> {
    let mut grouped: IndexMap<String, Result<Vec<String>, ThemeIssueReason>> = IndexMap::new();
    for row in rows {
        let name = row_cell(row, "theme", "Theme")
            .and_then(scalar_text)
            .unwrap_or_default();
        let keyword = row_keyword(row_cell(row, "keyword", "Keyword"));
        // A row with an empty keyword cell still declares the theme
        let slot = grouped.entry(name).or_insert_with(|| Ok(Vec::new()));
        match keyword {
            Ok(Some(keyword)) => {
                if let Ok(keywords) = slot {
                    keywords.push(keyword);
                }
            }
            Ok(None) => {}
            Err(reason) => *slot = Err(reason),
        }
    }
    grouped.into_iter().collect()
}

/// Themes read from a file, plus whatever had to be dropped.
#[derive(Debug)]
pub struct ThemeLoad {
    pub themes: ThemeSet,
    pub issues: Vec<ThemeIssue>,
}

/// Parse a theme definition table from JSON text.
///
/// Only a document that is neither an array nor an object is an error. A
/// malformed theme inside a well-formed table is dropped as a `ThemeIssue`.
pub fn parse_themes(json: &str) -> Result<ThemeLoad, serde_json::Error> {
    let file: ThemeFile = serde_json::from_str(json)?;

    let definitions = match file {
        ThemeFile::Rows(rows) => group_rows(&rows),
        ThemeFile::Mapping(entries) => entries
            .into_iter()
            .map(|(name, keywords)| {
                let keywords = keyword_list(&keywords);
                (name, keywords)
            })
            .collect(),
    };
    let (themes, issues) = ThemeSet::validate(definitions);

    Ok(ThemeLoad { themes, issues })
}

/// Load the theme definition file at `path`.
pub fn load_themes(path: &Path) -> Result<ThemeLoad, SourceError> {
    let json = fs::read_to_string(path).map_err(|e| SourceError::unavailable(path, e))?;
    let load = parse_themes(&json).map_err(|e| SourceError::unavailable(path, e))?;
    info!(
        path = %path.display(),
        themes = load.themes.len(),
        dropped = load.issues.len(),
        "Loaded theme definitions"
    );
    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_folds_and_dedupes_keywords() {
        let theme = Theme::new("animals", ["Cat", "cat", "", "DOG"]);
        assert_eq!(theme.keywords(), &["cat", "dog"]);
    }

    #[test]
    fn test_theme_substring_match() {
        let theme = Theme::new("animals", ["cat"]);
        assert!(theme.matches("I have a CAT"));
        // Literal substring, not whole word
        assert!(theme.matches("concatenate"));
        assert!(!theme.matches("I like trains"));
    }

    #[test]
    fn test_from_pairs_groups_in_first_seen_order() {
        let (set, issues) = ThemeSet::from_pairs([
            ("racing", "pit"),
            ("animals", "cat"),
            ("racing", "lap"),
        ]);
        assert!(issues.is_empty());
        let names: Vec<&str> = set.themes().iter().map(Theme::name).collect();
        assert_eq!(names, vec!["racing", "animals"]);
        assert_eq!(set.get("racing").unwrap().keywords(), &["pit", "lap"]);
    }

    #[test]
    fn test_invalid_themes_dropped() {
        let (set, issues) = ThemeSet::from_definitions(vec![
            ("animals".to_string(), vec!["cat".to_string()]),
            ("empty".to_string(), vec![String::new()]),
            ("animals".to_string(), vec!["dog".to_string()]),
            ("  ".to_string(), vec!["x".to_string()]),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("animals").unwrap().keywords(), &["cat"]);
        let reasons: Vec<ThemeIssueReason> = issues.iter().map(|i| i.reason).collect();
        assert_eq!(
            reasons,
            vec![
                ThemeIssueReason::NoKeywords,
                ThemeIssueReason::DuplicateName,
                ThemeIssueReason::MissingName,
            ]
        );
    }

    #[test]
    fn test_parse_rows_with_spreadsheet_columns() {
        let json = r#"[
            {"Theme": "animals", "Keyword": "cat"},
            {"Theme": "animals", "Keyword": "Dog"},
            {"Theme": "years", "Keyword": 1994},
            {"Theme": "blank", "Keyword": null}
        ]"#;
        let load = parse_themes(json).unwrap();
        assert_eq!(load.themes.len(), 2);
        assert_eq!(load.themes.get("animals").unwrap().keywords(), &["cat", "dog"]);
        assert_eq!(load.themes.get("years").unwrap().keywords(), &["1994"]);
        assert_eq!(
            load.issues,
            vec![ThemeIssue {
                theme: "blank".to_string(),
                reason: ThemeIssueReason::NoKeywords,
            }]
        );
    }

    #[test]
    fn test_parse_mapping() {
        let json = r#"{"animals": ["cat", "dog"], "nothing": []}"#;
        let load = parse_themes(json).unwrap();
        assert_eq!(load.themes.len(), 1);
        assert_eq!(load.issues[0].theme, "nothing");
        assert_eq!(load.issues[0].reason, ThemeIssueReason::NoKeywords);
    }

    #[test]
    fn test_parse_mapping_keeps_repeated_names() {
        let load = parse_themes(r#"{"animals": ["cat"], "animals": ["dog"]}"#).unwrap();
        assert_eq!(load.themes.get("animals").unwrap().keywords(), &["cat"]);
        assert_eq!(
            load.issues,
            vec![ThemeIssue {
                theme: "animals".to_string(),
                reason: ThemeIssueReason::DuplicateName,
            }]
        );
    }

    #[test]
    fn test_parse_mapping_malformed_theme_dropped() {
        let load = parse_themes(r#"{"a": "cat", "b": ["bird"], "c": {"x": 1}}"#).unwrap();
        assert_eq!(load.themes.len(), 1);
        assert!(load.themes.get("b").is_some());
        let reasons: Vec<ThemeIssueReason> = load.issues.iter().map(|i| i.reason).collect();
        assert_eq!(
            reasons,
            vec![ThemeIssueReason::MalformedKeywords, ThemeIssueReason::MalformedKeywords]
        );
    }

    #[test]
    fn test_parse_rows_malformed_cells_dropped() {
        let json = r#"[
            {"Theme": "animals", "Keyword": "cat"},
            {"Theme": ["not", "a", "name"], "Keyword": "x"},
            {"Theme": "lists", "Keyword": "ok"},
            {"Theme": "lists", "Keyword": ["bad"]},
            {"Theme": 2024, "Keyword": "season"},
            "not a row"
        ]"#;
        let load = parse_themes(json).unwrap();
        let names: Vec<&str> = load.themes.themes().iter().map(Theme::name).collect();
        assert_eq!(names, vec!["animals", "2024"]);
        assert_eq!(
            load.issues,
            vec![
                ThemeIssue {
                    theme: String::new(),
                    reason: ThemeIssueReason::MissingName,
                },
                ThemeIssue {
                    theme: "lists".to_string(),
                    reason: ThemeIssueReason::MalformedKeywords,
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_themes("42").is_err());
        assert!(parse_themes("not json").is_err());
    }
}
