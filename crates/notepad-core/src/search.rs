//! Literal find/replace.
//!
//! All public inputs and outputs use **character offsets** (Unicode scalar values), not byte
//! offsets. The search term is always treated as literal text: it is escaped before being
//! compiled, so characters such as `.` or `(` typed by the user never act as a pattern.
//!
//! Two layers are provided:
//!
//! - free functions ([`find_all`], [`find_next`], [`find_prev`]) that scan a `&str`
//! - [`SearchEngine`], the stateful search session used by the editor (cached matches,
//!   current match, circular navigation, replace one / replace all)

use regex::{Regex, RegexBuilder};

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search. Defaults to `false`.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
}

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Create a new match range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The escaped search pattern failed to compile (e.g. size limits).
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Display classification of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// No search term, or a re-scan after an edit is still pending.
    Ready,
    /// A term is set but nothing matched.
    NotFound,
    /// `current` is 1-based for display.
    Matches {
        /// 1-based index of the selected match (0 if none is selected).
        current: usize,
        /// Total number of matches.
        total: usize,
    },
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    pub(crate) fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn compile_search_regex(term: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(SearchError::InvalidPattern)
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: SearchMatch) -> bool {
    if m.is_empty() {
        return false;
    }

    let before = if m.start == 0 {
        None
    } else {
        index.char_at(text, m.start - 1)
    };
    let after = index.char_at(text, m.end);

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn accept(text: &str, index: &CharIndex, options: SearchOptions, m: SearchMatch) -> bool {
    !m.is_empty() && (!options.whole_word || is_whole_word(text, index, m))
}

/// Find all non-overlapping occurrences of `term` in `text`, left to right.
///
/// Returns an empty list if `term` is empty.
pub fn find_all(
    text: &str,
    term: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile_search_regex(term, options)?;
    let index = CharIndex::new(text);
    Ok(scan(text, &re, &index, options))
}

/// Left-to-right scan. A rejected candidate only consumes its first character, so an
/// overlapping candidate right after it can still match.
fn scan(text: &str, re: &Regex, index: &CharIndex, options: SearchOptions) -> Vec<SearchMatch> {
    let mut matches = Vec::new();
    let mut start_char = 0;
    while start_char < index.char_count() {
        let Some(m) = re.find_at(text, index.char_to_byte(start_char)) else {
            break;
        };
        let candidate = SearchMatch::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));
        if accept(text, index, options, candidate) {
            matches.push(candidate);
            start_char = candidate.end;
        } else {
            start_char = candidate.start + 1;
        }
    }
    matches
}

/// Find the next occurrence of `term` at or after `from_char`.
pub fn find_next(
    text: &str,
    term: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if term.is_empty() {
        return Ok(None);
    }

    let re = compile_search_regex(term, options)?;
    let index = CharIndex::new(text);

    let mut start_char = from_char.min(index.char_count());
    loop {
        let Some(m) = re.find_at(text, index.char_to_byte(start_char)) else {
            return Ok(None);
        };

        let candidate = SearchMatch::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));
        if accept(text, &index, options, candidate) {
            return Ok(Some(candidate));
        }
        if candidate.end >= index.char_count() {
            return Ok(None);
        }
        start_char = candidate.start + 1;
    }
}

/// Find the last occurrence of `term` that ends at or before `from_char`.
pub fn find_prev(
    text: &str,
    term: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if term.is_empty() {
        return Ok(None);
    }

    let re = compile_search_regex(term, options)?;
    let index = CharIndex::new(text);

    Ok(scan(text, &re, &index, options)
        .into_iter()
        .take_while(|m| m.end <= from_char)
        .last())
}

/// Replace each `range` in `text` with `replacement`.
///
/// Ranges must be sorted and non-overlapping; they are applied from the highest offset down so
/// that earlier offsets stay valid while later spans are rewritten.
pub(crate) fn replace_ranges(text: &mut String, ranges: &[SearchMatch], replacement: &str) {
    let index = CharIndex::new(text);
    let byte_ranges: Vec<(usize, usize)> = ranges
        .iter()
        .map(|m| (index.char_to_byte(m.start), index.char_to_byte(m.end)))
        .collect();

    for (start, end) in byte_ranges.into_iter().rev() {
        text.replace_range(start..end, replacement);
    }
}

/// Search session over the current document text.
///
/// Matches are never patched incrementally: every edit made through the engine re-runs the
/// full scan.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    term: String,
    options: SearchOptions,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
    /// The text changed since the last scan.
    stale: bool,
}

impl SearchEngine {
    /// Create an engine with default options and no term.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given options.
    pub fn with_options(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Current search options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Change the options. Cached matches are dropped; the next navigation re-scans.
    pub fn set_options(&mut self, options: SearchOptions) {
        if self.options != options {
            self.options = options;
            self.matches.clear();
            self.current = None;
            self.stale = !self.term.is_empty();
        }
    }

    /// Cached matches in document order.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Index of the selected match.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The selected match span, for the host to highlight.
    pub fn current_match(&self) -> Option<SearchMatch> {
        self.current.and_then(|idx| self.matches.get(idx).copied())
    }

    /// Returns `true` if the text changed since the last scan.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Display status for the current search.
    ///
    /// Never reports [`SearchStatus::NotFound`] for a stale search: nothing has been scanned yet.
    pub fn status(&self) -> SearchStatus {
        if self.term.is_empty() || self.stale {
            SearchStatus::Ready
        } else if self.matches.is_empty() {
            SearchStatus::NotFound
        } else {
            SearchStatus::Matches {
                current: self.current.map_or(0, |idx| idx + 1),
                total: self.matches.len(),
            }
        }
    }

    /// Scan `content` for `term` from scratch and select the first match.
    pub fn search(&mut self, content: &str, term: &str) -> SearchStatus {
        self.term = term.to_string();
        self.rescan(content)
    }

    /// Re-run the scan with the stored term.
    pub fn rescan(&mut self, content: &str) -> SearchStatus {
        self.matches.clear();
        self.current = None;
        self.stale = false;

        if self.term.is_empty() {
            return SearchStatus::Ready;
        }

        self.matches = match find_all(content, &self.term, self.options) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::warn!("search for {:?} failed: {}", self.term, err);
                Vec::new()
            }
        };
        if !self.matches.is_empty() {
            self.current = Some(0);
        }

        tracing::debug!(
            term = %self.term,
            matches = self.matches.len(),
            "search completed"
        );
        self.status()
    }

    /// Select the next match, wrapping from last to first.
    ///
    /// With no cached matches this runs a fresh search instead of moving.
    pub fn find_next(&mut self, content: &str) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            self.rescan(content);
            return self.current_match();
        }

        let next = match self.current {
            Some(idx) => (idx + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next);
        self.current_match()
    }

    /// Select the previous match, wrapping from first to last.
    ///
    /// With no cached matches this runs a fresh search instead of moving.
    pub fn find_previous(&mut self, content: &str) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            self.rescan(content);
            return self.current_match();
        }

        let prev = match self.current {
            Some(idx) if idx > 0 => idx - 1,
            _ => self.matches.len() - 1,
        };
        self.current = Some(prev);
        self.current_match()
    }

    /// Replace the selected match in `content`, then re-scan.
    ///
    /// A stale search is re-scanned first, which selects the first match.
    ///
    /// Returns `false` (and leaves `content` untouched) if no match is selected.
    pub fn replace_one(&mut self, content: &mut String, replacement: &str) -> bool {
        if self.stale {
            self.rescan(content);
        }
        let Some(target) = self.current_match() else {
            return false;
        };

        replace_ranges(content, &[target], replacement);
        self.rescan(content);
        true
    }

    /// Replace every cached match in `content`, then re-scan.
    ///
    /// Uses the match list computed before any replacement, so occurrences of the term inside
    /// `replacement` are not replaced again. Returns the number of replaced spans.
    pub fn replace_all(&mut self, content: &mut String, replacement: &str) -> usize {
        if self.stale {
            self.rescan(content);
        }
        if self.matches.is_empty() {
            return 0;
        }

        let count = self.matches.len();
        let matches = std::mem::take(&mut self.matches);
        replace_ranges(content, &matches, replacement);
        self.rescan(content);
        count
    }

    /// Drop the term and all matches (search UI closed).
    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.current = None;
        self.stale = false;
    }

    /// Drop cached matches but keep the term, forcing the next navigation or replace to
    /// re-scan.
    pub fn invalidate(&mut self) {
        self.matches.clear();
        self.current = None;
        self.stale = !self.term.is_empty();
    }
}
