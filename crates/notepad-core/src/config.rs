//! Editor configuration and persisted user preferences.

use crate::Encoding;
use crate::history::DEFAULT_UNDO_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Delay after the last edit before the document is committed to the undo history.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(500);
/// Delay after the last edit before an active search is re-run.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Engine tuning for [`CommandExecutor`](crate::CommandExecutor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots.
    pub undo_limit: usize,
    /// Debounce delay for history commits.
    pub commit_delay: Duration,
    /// Debounce delay for re-searching after edits.
    pub search_delay: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            commit_delay: DEFAULT_COMMIT_DELAY,
            search_delay: DEFAULT_SEARCH_DELAY,
        }
    }
}

/// Font sizes offered by the shell.
pub const FONT_SIZES: [u16; 7] = [10, 12, 14, 16, 18, 20, 24];

/// User-facing settings that survive restarts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Editor font size in points. Terminal frontends cannot size fonts and only carry
    /// this through so a shared preferences file keeps it.
    pub font_size: u16,
    /// Show the line number gutter.
    pub show_line_numbers: bool,
    /// Soft-wrap long lines.
    pub word_wrap: bool,
    /// Dark color scheme.
    pub dark_mode: bool,
    /// Preferred UI language code; `None` means auto-detect.
    pub language: Option<String>,
    /// Encoding used for new documents.
    pub encoding: Encoding,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_size: 14,
            show_line_numbers: false,
            word_wrap: true,
            dark_mode: false,
            language: None,
            encoding: Encoding::Utf8,
        }
    }
}

/// Errors while loading or saving preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Reading or writing the preferences file failed.
    #[error("preferences I/O error: {0}")]
    Io(#[from] io::Error),
    /// The preferences file is not valid JSON.
    #[error("invalid preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

impl Preferences {
    /// Load preferences from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let contents = fs::read_to_string(path)?;
        let mut prefs: Self = serde_json::from_str(&contents)?;
        prefs.normalize();
        Ok(prefs)
    }

    /// Load preferences, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        match Self::load(path) {
            Ok(prefs) => Ok(prefs),
            Err(PreferencesError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Write preferences as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn normalize(&mut self) {
        if !FONT_SIZES.contains(&self.font_size) {
            self.font_size = Preferences::default().font_size;
        }
        if self
            .language
            .as_deref()
            .is_some_and(|lang| lang.trim().is_empty())
        {
            self.language = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"darkMode": true}"#).unwrap();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.font_size, 14);
        assert!(prefs.word_wrap);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let prefs = Preferences {
            font_size: 18,
            language: Some("ja".to_string()),
            encoding: Encoding::ShiftJis,
            ..Preferences::default()
        };
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load_or_default(dir.path().join("missing.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_invalid_values_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"fontSize": 13, "language": "  "}"#).unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.font_size, 14);
        assert_eq!(prefs.language, None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Preferences::load_or_default(&path),
            Err(PreferencesError::Json(_))
        ));
    }
}
