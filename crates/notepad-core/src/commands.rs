//! Command Interface Layer
//!
//! Provides a unified command interface for frontend integration.
//!
//! # Overview
//!
//! [`CommandExecutor`] owns the document, its edit history and the search session, and is the
//! only place where they are mutated. Hosts translate input events (keys, menu items, toolbar
//! buttons) into [`Command`] values, either directly or through the named dispatch table
//! ([`Command::from_name`]), and render whatever the executor exposes afterwards.
//!
//! - **Edits**: replace the text, insert/delete, tab handling, commit, undo, redo
//! - **Search**: search, next/previous, replace one, replace all
//! - **Files**: new document, load, encoding/line ending, save preparation
//!
//! Edits do not touch the history immediately. They schedule a debounced commit that fires
//! once input has been quiet for [`EditorConfig::commit_delay`]; hosts drive it with
//! [`CommandExecutor::tick`].
//!
//! # Example
//!
//! ```rust
//! use notepad_core::{Command, CommandExecutor, EditCommand, SearchCommand};
//!
//! let mut executor = CommandExecutor::new();
//!
//! executor.execute(Command::Edit(EditCommand::SetText {
//!     text: "ababab".to_string(),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::Commit)).unwrap();
//!
//! executor.execute(Command::Search(SearchCommand::Search {
//!     term: "ab".to_string(),
//! })).unwrap();
//! executor.execute(Command::Search(SearchCommand::ReplaceAll {
//!     replacement: "X".to_string(),
//! })).unwrap();
//! assert_eq!(executor.content(), "XXX");
//!
//! executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
//! assert_eq!(executor.content(), "ababab");
//! ```

use crate::config::EditorConfig;
use crate::debounce::{DebounceKey, Debouncer};
use crate::document::{self, Document};
use crate::history::EditHistory;
use crate::search::{SearchEngine, SearchMatch, SearchOptions, SearchStatus, replace_ranges};
use crate::status::Status;
use crate::{Encoding, LineEnding};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the whole document with the text currently shown by the host.
    SetText {
        /// New document text.
        text: String,
    },
    /// Insert text at a character offset
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete a character range
    Delete {
        /// Character offset of the deletion start.
        start: usize,
        /// Length of the deletion in characters.
        length: usize,
    },
    /// Replace the selection `start..end` with a tab.
    InsertTab {
        /// Selection start (character offset).
        start: usize,
        /// Selection end (character offset).
        end: usize,
    },
    /// Remove one leading tab from the caret's line.
    RemoveTab {
        /// Caret character offset.
        caret: usize,
    },
    /// Record the current document in the history now, skipping the debounce.
    Commit,
    /// Revert to the previous snapshot
    Undo,
    /// Re-apply the last undone snapshot
    Redo,
}

/// Find/replace commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Scan the document for `term` and select the first match.
    Search {
        /// Literal search term.
        term: String,
    },
    /// Select the next match (wrapping).
    FindNext,
    /// Select the previous match (wrapping).
    FindPrevious,
    /// Replace the selected match.
    ReplaceOne {
        /// Replacement text.
        replacement: String,
    },
    /// Replace every match.
    ReplaceAll {
        /// Replacement text.
        replacement: String,
    },
    /// Change case sensitivity / whole-word matching.
    SetOptions {
        /// New options.
        options: SearchOptions,
    },
    /// Close the search UI: drop the term and matches.
    Close,
}

/// Document lifecycle commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    /// Start a new empty document.
    New,
    /// Replace the document with loaded file contents.
    Load {
        /// Name of the loaded file.
        file_name: String,
        /// Decoded file contents.
        content: String,
    },
    /// Change the encoding used for saving.
    SetEncoding {
        /// New encoding.
        encoding: Encoding,
    },
    /// Change the line ending used for saving.
    SetLineEnding {
        /// New line ending.
        line_ending: LineEnding,
    },
    /// Produce the text to write. Overrides are stored on the document.
    PrepareSave {
        /// Target file name; defaults to the document's current name.
        file_name: Option<String>,
        /// Encoding override.
        encoding: Option<Encoding>,
        /// Line ending override.
        line_ending: Option<LineEnding>,
    },
    /// The host finished writing the file.
    MarkSaved,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Find/replace commands
    Search(SearchCommand),
    /// Document lifecycle commands
    File(FileCommand),
}

/// Names accepted by [`Command::from_name`], for commands that take no arguments.
pub const COMMAND_NAMES: [&str; 8] = [
    "commit",
    "undo",
    "redo",
    "find-next",
    "find-previous",
    "close-search",
    "new",
    "mark-saved",
];

impl Command {
    /// Look up an argument-free command by name.
    pub fn from_name(name: &str) -> Result<Command, CommandError> {
        let command = match name {
            "commit" => Command::Edit(EditCommand::Commit),
            "undo" => Command::Edit(EditCommand::Undo),
            "redo" => Command::Edit(EditCommand::Redo),
            "find-next" => Command::Search(SearchCommand::FindNext),
            "find-previous" => Command::Search(SearchCommand::FindPrevious),
            "close-search" => Command::Search(SearchCommand::Close),
            "new" => Command::File(FileCommand::New),
            "mark-saved" => Command::File(FileCommand::MarkSaved),
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Edit(cmd) => match cmd {
                EditCommand::SetText { .. } => "set-text",
                EditCommand::Insert { .. } => "insert",
                EditCommand::Delete { .. } => "delete",
                EditCommand::InsertTab { .. } => "insert-tab",
                EditCommand::RemoveTab { .. } => "remove-tab",
                EditCommand::Commit => "commit",
                EditCommand::Undo => "undo",
                EditCommand::Redo => "redo",
            },
            Command::Search(cmd) => match cmd {
                SearchCommand::Search { .. } => "search",
                SearchCommand::FindNext => "find-next",
                SearchCommand::FindPrevious => "find-previous",
                SearchCommand::ReplaceOne { .. } => "replace-one",
                SearchCommand::ReplaceAll { .. } => "replace-all",
                SearchCommand::SetOptions { .. } => "set-search-options",
                SearchCommand::Close => "close-search",
            },
            Command::File(cmd) => match cmd {
                FileCommand::New => "new",
                FileCommand::Load { .. } => "load",
                FileCommand::SetEncoding { .. } => "set-encoding",
                FileCommand::SetLineEnding { .. } => "set-line-ending",
                FileCommand::PrepareSave { .. } => "prepare-save",
                FileCommand::MarkSaved => "mark-saved",
            },
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_name(s.trim())
    }
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Nothing to do (empty history, no selected match, unchanged text, ...)
    NoOp,
    /// Success, returns the new document text (undo/redo)
    Text(String),
    /// Success, returns the caret offset after a tab edit
    Caret(usize),
    /// A match is selected (half-open char offsets)
    SearchMatch {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// The term has no occurrences
    SearchNotFound,
    /// No search term
    SearchReady,
    /// How many occurrences were replaced
    ReplaceResult {
        /// Number of occurrences replaced.
        replaced: usize,
    },
    /// Text ready to be written by the host
    SaveReady {
        /// Target file name.
        file_name: String,
        /// Document text converted to the target line ending.
        text: String,
        /// Encoding to write `text` with.
        encoding: Encoding,
    },
}

/// Command error type
///
/// Empty history, empty search terms and missing matches are not errors; they produce
/// [`CommandResult::NoOp`] or a search status instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Offset past the end of the document
    #[error("Invalid offset: {0}")]
    InvalidOffset(usize),
    /// Range past the end of the document
    #[error("Invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// No command with this name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// Saving requires a file name
    #[error("File name cannot be empty")]
    EmptyFileName,
}

fn search_result(status: SearchStatus, current: Option<SearchMatch>) -> CommandResult {
    match (status, current) {
        (SearchStatus::Ready, _) => CommandResult::SearchReady,
        (_, Some(m)) => CommandResult::SearchMatch {
            start: m.start,
            end: m.end,
        },
        _ => CommandResult::SearchNotFound,
    }
}

/// Command executor
///
/// Owns the [`Document`], [`EditHistory`], [`SearchEngine`] and the debounce schedule.
/// After any sequence of commits, undos and redos the document content equals the top of the
/// undo stack; between an edit and its (debounced) commit it is ahead of it.
#[derive(Debug)]
pub struct CommandExecutor {
    document: Document,
    history: EditHistory,
    search: SearchEngine,
    debouncer: Debouncer<DebounceKey>,
    config: EditorConfig,
    /// Content at the last new/load/save, used to derive `Document::modified`.
    clean_content: String,
    status: Status,
    revision: u64,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Create an executor with an empty document and default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an executor with an empty document.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            document: Document::new(),
            history: EditHistory::with_limit(config.undo_limit),
            search: SearchEngine::new(),
            debouncer: Debouncer::new(),
            config,
            clean_content: String::new(),
            status: Status::Ready,
            revision: 0,
        }
    }

    /// Execute a command using the wall clock.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.execute_at(command, Instant::now())
    }

    /// Execute a command at `now`.
    ///
    /// Debounced work that is already due runs first, so it is applied in order.
    pub fn execute_at(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        self.tick(now);
        tracing::debug!(command = command.name(), "execute");

        match command {
            Command::Edit(cmd) => self.execute_edit(cmd, now),
            Command::Search(cmd) => Ok(self.execute_search(cmd, now)),
            Command::File(cmd) => self.execute_file(cmd),
        }
    }

    /// Run debounced work whose deadline has passed. Returns `true` if anything ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self.debouncer.poll(now);
        for key in &due {
            match key {
                DebounceKey::Commit => {
                    self.history.commit(&self.document.content);
                }
                DebounceKey::Search => {
                    let status = self.search.rescan(&self.document.content);
                    self.status = status.into();
                }
            }
        }
        !due.is_empty()
    }

    /// Current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current document text.
    pub fn content(&self) -> &str {
        &self.document.content
    }

    /// Edit history.
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Search session.
    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    /// Engine configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Status of the last operation.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Can undo. A pending commit counts, since undo flushes it first.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.has_uncommitted_changes()
    }

    /// Can redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && !self.has_uncommitted_changes()
    }

    /// The selected match, for the host to highlight and scroll to.
    pub fn current_match(&self) -> Option<SearchMatch> {
        self.search.current_match()
    }

    /// Display status of the search session.
    pub fn search_status(&self) -> SearchStatus {
        self.search.status()
    }

    /// Counter bumped whenever the document content is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if a debounced commit is scheduled.
    pub fn has_pending_commit(&self) -> bool {
        self.debouncer.is_pending(DebounceKey::Commit)
    }

    /// Returns `true` if a debounced re-search is scheduled.
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending(DebounceKey::Search)
    }

    /// Earliest pending debounce deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    fn has_uncommitted_changes(&self) -> bool {
        self.has_pending_commit() && self.history.current() != self.document.content
    }

    fn execute_edit(
        &mut self,
        command: EditCommand,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::SetText { text } => Ok(self.apply_text(text, now)),
            EditCommand::Insert { offset, text } => {
                let char_count = self.document.char_count();
                if offset > char_count {
                    return Err(CommandError::InvalidOffset(offset));
                }
                if text.is_empty() {
                    return Ok(CommandResult::NoOp);
                }
                let mut content = self.document.content.clone();
                replace_ranges(&mut content, &[SearchMatch::new(offset, offset)], &text);
                Ok(self.apply_text(content, now))
            }
            EditCommand::Delete { start, length } => {
                let end = start.saturating_add(length);
                if end > self.document.char_count() {
                    return Err(CommandError::InvalidRange { start, end });
                }
                if length == 0 {
                    return Ok(CommandResult::NoOp);
                }
                let mut content = self.document.content.clone();
                replace_ranges(&mut content, &[SearchMatch::new(start, end)], "");
                Ok(self.apply_text(content, now))
            }
            EditCommand::InsertTab { start, end } => {
                let char_count = self.document.char_count();
                if start.max(end) > char_count {
                    return Err(CommandError::InvalidRange { start, end });
                }
                let (content, caret) = document::insert_tab(&self.document.content, start, end);
                self.apply_text(content, now);
                Ok(CommandResult::Caret(caret))
            }
            EditCommand::RemoveTab { caret } => {
                if caret > self.document.char_count() {
                    return Err(CommandError::InvalidOffset(caret));
                }
                match document::remove_tab(&self.document.content, caret) {
                    Some((content, caret)) => {
                        self.apply_text(content, now);
                        Ok(CommandResult::Caret(caret))
                    }
                    None => Ok(CommandResult::NoOp),
                }
            }
            EditCommand::Commit => {
                self.debouncer.cancel(DebounceKey::Commit);
                if self.history.commit(&self.document.content) {
                    Ok(CommandResult::Success)
                } else {
                    Ok(CommandResult::NoOp)
                }
            }
            EditCommand::Undo => {
                self.flush_pending_commit();
                let Some(snapshot) = self.history.undo().map(str::to_string) else {
                    return Ok(CommandResult::NoOp);
                };
                self.restore_snapshot(snapshot.clone(), now);
                Ok(CommandResult::Text(snapshot))
            }
            EditCommand::Redo => {
                self.flush_pending_commit();
                let Some(snapshot) = self.history.redo().map(str::to_string) else {
                    return Ok(CommandResult::NoOp);
                };
                self.restore_snapshot(snapshot.clone(), now);
                Ok(CommandResult::Text(snapshot))
            }
        }
    }

    fn execute_search(&mut self, command: SearchCommand, now: Instant) -> CommandResult {
        match command {
            SearchCommand::Search { term } => {
                self.debouncer.cancel(DebounceKey::Search);
                let status = self.search.search(&self.document.content, &term);
                self.status = status.into();
                search_result(status, self.search.current_match())
            }
            SearchCommand::FindNext => {
                self.debouncer.cancel(DebounceKey::Search);
                self.search.find_next(&self.document.content);
                self.status = self.search.status().into();
                search_result(self.search.status(), self.search.current_match())
            }
            SearchCommand::FindPrevious => {
                self.debouncer.cancel(DebounceKey::Search);
                self.search.find_previous(&self.document.content);
                self.status = self.search.status().into();
                search_result(self.search.status(), self.search.current_match())
            }
            SearchCommand::ReplaceOne { replacement } => {
                self.flush_pending_search();
                let mut content = std::mem::take(&mut self.document.content);
                let replaced = self.search.replace_one(&mut content, &replacement);
                self.document.content = content;
                if !replaced {
                    return CommandResult::NoOp;
                }
                self.status = self.search.status().into();
                self.after_content_change(now, false);
                CommandResult::ReplaceResult { replaced: 1 }
            }
            SearchCommand::ReplaceAll { replacement } => {
                self.flush_pending_search();
                let mut content = std::mem::take(&mut self.document.content);
                let replaced = self.search.replace_all(&mut content, &replacement);
                self.document.content = content;
                if replaced == 0 {
                    return CommandResult::NoOp;
                }
                self.status = Status::Replaced { count: replaced };
                self.after_content_change(now, false);
                CommandResult::ReplaceResult { replaced }
            }
            SearchCommand::SetOptions { options } => {
                self.search.set_options(options);
                if !self.search.term().is_empty() {
                    let status = self.search.rescan(&self.document.content);
                    self.status = status.into();
                }
                CommandResult::Success
            }
            SearchCommand::Close => {
                self.debouncer.cancel(DebounceKey::Search);
                self.search.clear();
                self.status = Status::Ready;
                CommandResult::Success
            }
        }
    }

    fn execute_file(&mut self, command: FileCommand) -> Result<CommandResult, CommandError> {
        match command {
            FileCommand::New => {
                self.document = Document {
                    encoding: self.document.encoding,
                    line_ending: self.document.line_ending,
                    ..Document::new()
                };
                self.reset_session("");
                self.status = Status::NewFile;
                Ok(CommandResult::Success)
            }
            FileCommand::Load { file_name, content } => {
                let encoding = Encoding::detect_from_file_name(&file_name, self.document.encoding);
                let line_ending = if content.contains('\n') || content.contains('\r') {
                    LineEnding::detect_in_text(&content)
                } else {
                    self.document.line_ending
                };
                let content = LineEnding::normalize(&content);
                self.reset_session(&content);
                self.document = Document {
                    content,
                    file_name: Some(file_name.clone()),
                    encoding,
                    line_ending,
                    modified: false,
                };
                tracing::debug!(file_name = %file_name, %encoding, %line_ending, "document loaded");
                self.status = Status::FileOpened {
                    file_name,
                    encoding,
                };
                Ok(CommandResult::Success)
            }
            FileCommand::SetEncoding { encoding } => {
                if self.document.encoding == encoding {
                    return Ok(CommandResult::NoOp);
                }
                self.document.encoding = encoding;
                self.status = Status::EncodingChanged(encoding);
                Ok(CommandResult::Success)
            }
            FileCommand::SetLineEnding { line_ending } => {
                if self.document.line_ending == line_ending {
                    return Ok(CommandResult::NoOp);
                }
                self.document.line_ending = line_ending;
                self.status = Status::LineEndingChanged(line_ending);
                Ok(CommandResult::Success)
            }
            FileCommand::PrepareSave {
                file_name,
                encoding,
                line_ending,
            } => {
                let file_name = file_name
                    .or_else(|| self.document.file_name.clone())
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .ok_or(CommandError::EmptyFileName)?;

                if let Some(encoding) = encoding {
                    self.document.encoding = encoding;
                }
                if let Some(line_ending) = line_ending {
                    self.document.line_ending = line_ending;
                }
                self.document.file_name = Some(file_name.clone());

                Ok(CommandResult::SaveReady {
                    file_name,
                    text: self.document.line_ending.apply_to_text(&self.document.content),
                    encoding: self.document.encoding,
                })
            }
            FileCommand::MarkSaved => {
                self.clean_content = self.document.content.clone();
                self.document.modified = false;
                self.status = Status::FileSaved {
                    encoding: self.document.encoding,
                    line_ending: self.document.line_ending,
                };
                Ok(CommandResult::Success)
            }
        }
    }

    fn apply_text(&mut self, text: String, now: Instant) -> CommandResult {
        if text == self.document.content {
            return CommandResult::NoOp;
        }
        self.document.content = text;
        self.search.invalidate();
        self.after_content_change(now, true);
        CommandResult::Success
    }

    /// Refresh the modified flag and schedule the debounced commit (and re-search if asked).
    fn after_content_change(&mut self, now: Instant, research: bool) {
        self.revision += 1;
        self.document.modified = self.document.content != self.clean_content;
        self.debouncer
            .schedule(DebounceKey::Commit, now, self.config.commit_delay);
        if research && !self.search.term().is_empty() {
            self.debouncer
                .schedule(DebounceKey::Search, now, self.config.search_delay);
        }
    }

    fn flush_pending_commit(&mut self) {
        if self.debouncer.cancel(DebounceKey::Commit) {
            self.history.commit(&self.document.content);
        }
    }

    /// Run a debounced re-search now so a replace never acts on offsets from older text.
    fn flush_pending_search(&mut self) {
        if self.debouncer.cancel(DebounceKey::Search) || self.search.is_stale() {
            self.search.rescan(&self.document.content);
        }
    }

    fn restore_snapshot(&mut self, snapshot: String, now: Instant) {
        self.revision += 1;
        self.status = Status::Ready;
        self.document.content = snapshot;
        self.document.modified = self.document.content != self.clean_content;
        self.search.invalidate();
        if !self.search.term().is_empty() {
            self.debouncer
                .schedule(DebounceKey::Search, now, self.config.search_delay);
        }
    }

    fn reset_session(&mut self, content: &str) {
        self.revision += 1;
        self.history.reset_to(content);
        self.debouncer.clear();
        self.search.invalidate();
        self.clean_content = content.to_string();
    }
}
