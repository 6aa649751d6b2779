//! The document owned by the editor and plain-text helpers over it.

use crate::{Encoding, LineEnding};
use unicode_segmentation::UnicodeSegmentation;

/// Position coordinates (0-based line and column, in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// Line index (0-based).
    pub line: usize,
    /// Column in characters (0-based).
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A text document plus the file metadata the editor tracks for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Full document text.
    pub content: String,
    /// File name the document was opened from or last saved as.
    pub file_name: Option<String>,
    /// Encoding used when saving.
    pub encoding: Encoding,
    /// Line ending used when saving.
    pub line_ending: LineEnding,
    /// Unsaved changes exist.
    pub modified: bool,
}

impl Document {
    /// Create an empty, unmodified document.
    pub fn new() -> Self {
        Self::default()
    }

    /// File name, or `default_name` for a document that was never saved.
    pub fn display_name<'a>(&'a self, default_name: &'a str) -> &'a str {
        self.file_name.as_deref().unwrap_or(default_name)
    }

    /// Window title: `"name * - App"` where `" *"` marks unsaved changes.
    pub fn title(&self, app_title: &str, default_name: &str) -> String {
        let modified_mark = if self.modified { " *" } else { "" };
        format!(
            "{}{} - {}",
            self.display_name(default_name),
            modified_mark,
            app_title
        )
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Number of lines (`N` newlines make `N + 1` lines).
    pub fn line_count(&self) -> usize {
        line_count(&self.content)
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.content.unicode_words().count()
    }
}

/// Number of lines in `text` (`N` newlines make `N + 1` lines).
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Line/column of a character offset (clamped to the end of `text`).
pub fn cursor_position(text: &str, char_offset: usize) -> Position {
    let mut line = 0;
    let mut column = 0;
    for ch in text.chars().take(char_offset) {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Position::new(line, column)
}

/// Character offset of a line/column position, clamped to the line and the document.
pub fn position_to_offset(text: &str, position: Position) -> usize {
    let mut offset = 0;
    for (idx, line) in text.split('\n').enumerate() {
        let len = line.chars().count();
        if idx == position.line {
            return offset + position.column.min(len);
        }
        offset += len + 1;
    }
    text.chars().count()
}

/// Number of selected characters between two offsets (in either order).
pub fn selection_len(start: usize, end: usize) -> usize {
    start.abs_diff(end)
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Replace the selection `start..end` with a tab.
///
/// Returns the new text and the caret offset after the inserted tab.
pub fn insert_tab(text: &str, start: usize, end: usize) -> (String, usize) {
    let (start, end) = (start.min(end), start.max(end));
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);

    let mut out = String::with_capacity(text.len() + 1);
    out.push_str(&text[..start_byte]);
    out.push('\t');
    out.push_str(&text[end_byte..]);
    (out, start + 1)
}

/// Remove one leading tab from the line containing `caret`.
///
/// Returns `None` if that line does not start with a tab; otherwise the new text and caret
/// (moved left by one, but never before the line start).
pub fn remove_tab(text: &str, caret: usize) -> Option<(String, usize)> {
    let caret_byte = byte_offset(text, caret);
    let line_start_byte = text[..caret_byte].rfind('\n').map_or(0, |idx| idx + 1);
    if !text[line_start_byte..].starts_with('\t') {
        return None;
    }

    let line_start = text[..line_start_byte].chars().count();
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..line_start_byte]);
    out.push_str(&text[line_start_byte + 1..]);
    Some((out, caret.saturating_sub(1).max(line_start)))
}
