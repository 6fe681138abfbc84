//! Word-list backed profanity filter.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::domain::ProfanityFilter;

#[derive(Debug, Error)]
pub enum ProfanityLoadError {
    #[error("failed to read word list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list '{path}' is not a JSON array of strings: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Blocks an exact, lower-cased set of words.
#[derive(Debug, Clone, Default)]
pub struct WordListFilter {
    words: HashSet<String>,
}

impl WordListFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let words: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(words))
    }

    /// Load and merge word lists. `.json` files hold an array of strings,
    /// anything else is read as newline-separated text.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ProfanityLoadError> {
        let mut filter = Self::default();
        for path in paths {
            let path = path.as_ref();
            let contents = std::fs::read_to_string(path).map_err(|source| ProfanityLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            let loaded = if is_json {
                Self::from_json(&contents).map_err(|source| ProfanityLoadError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            } else {
                Self::from_text(&contents)
            };
            tracing::info!("Loaded {} blocked word(s) from '{}'", loaded.len(), path.display());
            filter.words.extend(loaded.words);
        }
        Ok(filter)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ProfanityFilter for WordListFilter {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contains_profanity;

    #[test]
    fn test_from_text_skips_blank_lines_and_comments() {
        // テスト項目: 空行とコメント行は無視され、単語は小文字化される
        // given (前提条件):
        let text = "# blocked words\nDarn\n\n  heck  \n";

        // when (操作):
        let filter = WordListFilter::from_text(text);

        // then (期待する結果):
        assert_eq!(filter.len(), 2);
        assert!(filter.contains("darn"));
        assert!(filter.contains("heck"));
    }

    #[test]
    fn test_filter_checks_whole_words_case_insensitively() {
        // テスト項目: 大文字・小文字を区別せず、単語単位で判定される
        // given (前提条件):
        let filter = WordListFilter::new(["darn"]);

        // when (操作) / then (期待する結果):
        assert!(contains_profanity(&filter, "oh DARN it"));
        assert!(!contains_profanity(&filter, "darned socks"));
    }

    #[test]
    fn test_load_files_merges_json_and_text() {
        // テスト項目: JSON 配列とテキストの単語リストを読み込んで統合できる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("words.json");
        let text_path = dir.path().join("extra.txt");
        std::fs::write(&json_path, r#"["alpha", "Beta"]"#).unwrap();
        std::fs::write(&text_path, "gamma\n").unwrap();

        // when (操作):
        let filter = WordListFilter::load_files(&[json_path, text_path]).unwrap();

        // then (期待する結果):
        assert_eq!(filter.len(), 3);
        assert!(filter.contains("beta"));
        assert!(filter.contains("gamma"));
    }

    #[test]
    fn test_load_files_reports_bad_json() {
        // テスト項目: 不正な JSON の単語リストは Json エラーになる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, r#"{"word": 1}"#).unwrap();

        // when (操作):
        let result = WordListFilter::load_files(&[path]);

        // then (期待する結果):
        assert!(matches!(result, Err(ProfanityLoadError::Json { .. })));
    }

    #[test]
    fn test_load_files_reports_missing_file() {
        // テスト項目: 存在しないファイルは Io エラーになる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();

        // when (操作):
        let result = WordListFilter::load_files(&[dir.path().join("missing.txt")]);

        // then (期待する結果):
        assert!(matches!(result, Err(ProfanityLoadError::Io { .. })));
    }
}
