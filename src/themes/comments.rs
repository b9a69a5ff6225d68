// Comment records — viewer comments as written by the comment downloader.
//
// Each record is a JSON object with one text field plus any metadata
// (date, link, video title...). Every field is kept, in its original order,
// so an augmented record can be written back out without loss.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::scalar_text;
use crate::error::SourceError;

/// Field holding the comment body in the downloader's export.
pub const DEFAULT_TEXT_FIELD: &str = "COMMENT CONTENT";

/// One comment: its text plus every original field, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    text: String,
    fields: IndexMap<String, Value>,
}

impl CommentRecord {
    /// A bare comment with a single `DEFAULT_TEXT_FIELD` field.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut fields = IndexMap::new();
        fields.insert(DEFAULT_TEXT_FIELD.to_string(), Value::String(text.clone()));
        Self { text, fields }
    }

    /// Take the text from `text_field`. A null body reads as empty text;
    /// a missing field or a non-scalar body is an error.
    pub fn from_object(fields: IndexMap<String, Value>, text_field: &str) -> Result<Self, String> {
        let text = match fields.get(text_field) {
            None => return Err(format!("missing text field '{text_field}'")),
            Some(Value::Null) => String::new(),
            Some(value) => scalar_text(value)
                .ok_or_else(|| format!("text field '{text_field}' is not a scalar"))?,
        };
        Ok(Self { text, fields })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}

impl Serialize for CommentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Records read from a comment source, plus every item that was skipped.
#[derive(Debug, Default)]
pub struct CommentLoad {
    pub records: Vec<CommentRecord>,
    pub skipped: Vec<SourceError>,
}

/// Parse a JSON array of comment objects. Elements that aren't usable
/// records are skipped and reported as `<source>#<index>`.
pub fn parse_comments(json: &str, source: &str, text_field: &str) -> Result<CommentLoad, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array of comment objects".to_string());
    };

    let mut load = CommentLoad::default();
    for (i, item) in items.into_iter().enumerate() {
        let result = match item {
            Value::Object(map) => CommentRecord::from_object(map.into_iter().collect(), text_field),
            _ => Err("not a JSON object".to_string()),
        };
        match result {
            Ok(record) => load.records.push(record),
            Err(reason) => {
                let item = format!("{source}#{i}");
                warn!(item = %item, %reason, "Skipping unreadable comment");
                load.skipped.push(SourceError::unreadable(item, reason));
            }
        }
    }
    Ok(load)
}

/// Load comments from a JSON file, or from every `*.json` file in a
/// directory (sorted by file name, concatenated).
///
/// In directory mode a file that can't be read or parsed is skipped; in
/// single-file mode it makes the whole source unavailable.
pub fn load_comments(path: &Path, text_field: &str) -> Result<CommentLoad, SourceError> {
    let load = if path.is_dir() {
        load_comment_dir(path, text_field)?
    } else {
        let json = fs::read_to_string(path).map_err(|e| SourceError::unavailable(path, e))?;
        parse_comments(&json, &display_name(path), text_field)
            .map_err(|reason| SourceError::unavailable(path, reason))?
    };

    info!(
        path = %path.display(),
        comments = load.records.len(),
        skipped = load.skipped.len(),
        "Loaded comments"
    );
    Ok(load)
}

fn load_comment_dir(dir: &Path, text_field: &str) -> Result<CommentLoad, SourceError> {
    let entries = fs::read_dir(dir).map_err(|e| SourceError::unavailable(dir, e))?;

    let mut load = CommentLoad::default();
    let paths = json_files(dir, entries.map(|entry| entry.map(|e| e.path())), &mut load.skipped);

    for path in paths {
        let name = display_name(&path);
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| parse_comments(&json, &name, text_field));

        match parsed {
            Ok(file_load) => {
                debug!(file = %name, comments = file_load.records.len(), "Read comment file");
                load.records.extend(file_load.records);
                load.skipped.extend(file_load.skipped);
            }
            Err(reason) => {
                warn!(file = %name, %reason, "Skipping unreadable comment file");
                load.skipped.push(SourceError::unreadable(name, reason));
            }
        }
    }
    Ok(load)
}

/// The `*.json` files among `entries`, sorted by file name. Entries that
/// can't be listed are recorded in `skipped`.
fn json_files<I>(dir: &Path, entries: I, skipped: &mut Vec<SourceError>) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                if is_json && path.is_file() {
                    paths.push(path);
                }
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unlistable directory entry");
                skipped.push(SourceError::unreadable(dir.display().to_string(), e));
            }
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
