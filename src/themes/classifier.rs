// Theme classifier — tag each comment with the themes it mentions and
// summarize what share of comments mention each theme.
//
// A theme matches when any of its keywords appears in the case-folded
// comment text as a literal substring. Matching is not
// word-bounded: "cat" matches "concatenate".

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

use super::comments::CommentRecord;
use super::definition::Theme;

/// Share of comments mentioning a theme, or NoData when there were no
/// comments to divide by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    Value(f64),
    NoData,
}

impl Percentage {
    pub fn of(matched: usize, total: usize) -> Self {
        if total == 0 {
            Percentage::NoData
        } else {
            Percentage::Value(matched as f64 / total as f64 * 100.0)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Percentage::Value(v) => Some(*v),
            Percentage::NoData => None,
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percentage::Value(v) => write!(f, "{v:.2}%"),
            Percentage::NoData => write!(f, "no data"),
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSummary {
    pub theme: String,
    pub matched: usize,
    pub total: usize,
    pub percentage: Percentage,
}

/// A comment with one membership flag per theme, in theme order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedComment {
    pub record: CommentRecord,
    pub memberships: IndexMap<String, bool>,
}

impl ClassifiedComment {
    pub fn mentions(&self, theme: &str) -> Option<bool> {
        self.memberships.get(theme).copied()
    }

    /// The original fields followed by one boolean per theme.
    ///
    /// A theme named like an existing field is written as `<theme> [theme]`
    /// so the original value survives.
    pub fn to_object(&self) -> IndexMap<String, Value> {
        let mut object = self.record.fields().clone();
        for (theme, &hit) in &self.memberships {
            let key = if object.contains_key(theme) {
                format!("{theme} [theme]")
            } else {
                theme.clone()
            };
            object.insert(key, Value::Bool(hit));
        }
        object
    }
}

impl Serialize for ClassifiedComment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_object().serialize(serializer)
    }
}

/// Per-comment memberships plus the per-theme summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub comments: Vec<ClassifiedComment>,
    pub summary: Vec<ThemeSummary>,
}

impl Classification {
    pub fn percentage(&self, theme: &str) -> Option<Percentage> {
        self.summary
            .iter()
            .find(|s| s.theme == theme)
            .map(|s| s.percentage)
    }
}

/// Classify every record against every theme.
///
/// An empty record list gives every theme a `NoData` percentage. A theme
/// with no keywords never matches, so its percentage is 0 whenever there
/// are comments.
pub fn classify(records: Vec<CommentRecord>, themes: &[Theme]) -> Classification {
    let mut matched = vec![0usize; themes.len()];

    let comments: Vec<ClassifiedComment> = records
        .into_iter()
        .map(|record| {
            let folded = record.text().to_lowercase();
            let memberships = themes
                .iter()
                .enumerate()
                .map(|(i, theme)| {
                    let hit = theme.matches_folded(&folded);
                    if hit {
                        matched[i] += 1;
                    }
                    (theme.name().to_string(), hit)
                })
                .collect();
            ClassifiedComment {
                record,
                memberships,
            }
        })
        .collect();

    let total = comments.len();
    if total == 0 {
        warn!(themes = themes.len(), "No comments to classify");
    }

    let summary = themes
        .iter()
        .zip(matched)
        .map(|(theme, matched)| ThemeSummary {
            theme: theme.name().to_string(),
            matched,
            total,
            percentage: Percentage::of(matched, total),
        })
        .collect();

    info!(comments = total, themes = themes.len(), "Classified comments");

    Classification { comments, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::comments::DEFAULT_TEXT_FIELD;

    fn records(texts: &[&str]) -> Vec<CommentRecord> {
        texts.iter().map(|t| CommentRecord::from_text(*t)).collect()
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(Percentage::of(0, 0), Percentage::NoData);
        assert_eq!(Percentage::of(1, 4), Percentage::Value(25.0));
        assert_eq!(Percentage::of(3, 3), Percentage::Value(100.0));
    }

    #[test]
    fn test_percentage_display() {
        assert_eq!(Percentage::of(2, 3).to_string(), "66.67%");
        assert_eq!(Percentage::NoData.to_string(), "no data");
    }

    #[test]
    fn test_percentage_serializes_null_for_no_data() {
        assert_eq!(serde_json::to_string(&Percentage::NoData).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Percentage::Value(50.0)).unwrap(), "50.0");
    }

    #[test]
    fn test_themes_match_independently() {
        let themes = vec![
            Theme::new("animals", ["cat"]),
            Theme::new("pets", ["cat", "hamster"]),
        ];
        let result = classify(records(&["my cat", "a hamster"]), &themes);
        assert_eq!(result.comments[0].mentions("animals"), Some(true));
        assert_eq!(result.comments[0].mentions("pets"), Some(true));
        assert_eq!(result.comments[1].mentions("animals"), Some(false));
        assert_eq!(result.percentage("pets"), Some(Percentage::Value(100.0)));
    }

    #[test]
    fn test_empty_keyword_theme_is_zero() {
        let themes = vec![Theme::new("empty", Vec::<String>::new())];
        let result = classify(records(&["anything at all", ""]), &themes);
        assert_eq!(result.percentage("empty"), Some(Percentage::Value(0.0)));
    }

    #[test]
    fn test_to_object_avoids_field_collision() {
        let themes = vec![Theme::new(DEFAULT_TEXT_FIELD, ["great"])];
        let result = classify(records(&["Great video"]), &themes);
        let object = result.comments[0].to_object();
        assert_eq!(object["COMMENT CONTENT"], Value::String("Great video".to_string()));
        assert_eq!(object["COMMENT CONTENT [theme]"], Value::Bool(true));
    }
}
