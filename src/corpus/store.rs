// Corpus store — load every transcript in a directory into a Corpus.
//
// Transcripts are plain-text files, one per recording, written upstream by
// the speech-to-text step. A directory we can't list is fatal; a single file
// we can't read is skipped and reported.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::Corpus;
use crate::error::SourceError;

/// Which directory entries count as documents.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    /// File extension without the leading dot, compared case-insensitively
    pub extension: String,
    /// File names to leave out even when the extension matches
    /// (e.g. our own keyword report written next to the transcripts)
    pub exclude: Vec<String>,
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl DocumentFilter {
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            exclude: Vec::new(),
        }
    }

    pub fn excluding(mut self, file_name: impl Into<String>) -> Self {
        self.exclude.push(file_name.into());
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        let ext_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
        let excluded = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.exclude.iter().any(|x| x == n));
        ext_matches && !excluded
    }
}

/// The loaded corpus plus every item that had to be skipped.
#[derive(Debug)]
pub struct CorpusLoad {
    pub corpus: Corpus,
    pub skipped: Vec<SourceError>,
}

/// Load all matching files in `dir`, sorted by file name.
///
/// Files are identified by their file name. Returns `SourceUnavailable` only
/// when the directory itself can't be listed.
pub fn load_dir(dir: &Path, filter: &DocumentFilter) -> Result<CorpusLoad, SourceError> {
    let entries = fs::read_dir(dir).map_err(|e| SourceError::unavailable(dir, e))?;

    let mut skipped = Vec::new();
    let mut paths: Vec<PathBuf> = Vec::new();

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && filter.accepts(&path) {
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

    let mut corpus = Corpus::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(file = %name, bytes = text.len(), "Read transcript");
                corpus.push(name, text);
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping unreadable transcript");
                skipped.push(SourceError::unreadable(name, e));
            }
        }
    }

    info!(
        dir = %dir.display(),
        documents = corpus.len(),
        skipped = skipped.len(),
        "Loaded transcript corpus"
    );

    Ok(CorpusLoad { corpus, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vidlex_store_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_filter_extension_case_insensitive() {
        let filter = DocumentFilter::with_extension(".txt");
        assert!(filter.accepts(Path::new("a.TXT")));
        assert!(filter.accepts(Path::new("dir/b.txt")));
        assert!(!filter.accepts(Path::new("c.json")));
        assert!(!filter.accepts(Path::new("no_extension")));
    }

    #[test]
    fn test_filter_excludes_named_files() {
        let filter = DocumentFilter::default().excluding("keywords.txt");
        assert!(!filter.accepts(Path::new("out/keywords.txt")));
        assert!(filter.accepts(Path::new("out/episode.txt")));
    }

    #[test]
    fn test_load_sorted_and_skips_bad_utf8() {
        let dir = scratch_dir("sorted");
        fs::write(dir.join("b.txt"), "second").unwrap();
        fs::write(dir.join("a.txt"), "first").unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();
        fs::write(dir.join("broken.txt"), [0xff, 0xfe, 0xfd]).unwrap();

        let load = load_dir(&dir, &DocumentFilter::default()).unwrap();
        assert_eq!(
            load.corpus.identifiers(),
            &["a.txt".to_string(), "b.txt".to_string()]
        );
        assert_eq!(load.skipped.len(), 1);
        assert!(matches!(
            &load.skipped[0],
            SourceError::ItemUnreadable { item, .. } if item == "broken.txt"
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_dir_is_unavailable() {
        let dir = std::env::temp_dir().join("vidlex_store_definitely_missing_dir");
        let err = load_dir(&dir, &DocumentFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::SourceUnavailable { .. }));
    }
}
