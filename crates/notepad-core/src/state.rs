//! Editor State Interface
//!
//! Provides a complete state query interface for the editor, used for frontend rendering and state synchronization.
//!
//! # Overview
//!
//! The state interface layer exposes the editor's internal state to the frontend in a structured, immutable manner.
//! It supports:
//!
//! - **State Queries**: Retrieve document, history, search and status information
//! - **Version Tracking**: Track state changes through version numbers
//! - **Change Notifications**: Subscribe to state change events
//!
//! # Example
//!
//! ```rust
//! use notepad_core::{Command, EditCommand, EditorStateManager};
//!
//! let mut manager = EditorStateManager::new();
//!
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! manager.execute(Command::Edit(EditCommand::SetText {
//!     text: "Hello".to_string(),
//! })).unwrap();
//!
//! let doc_state = manager.get_document_state();
//! assert!(doc_state.is_modified);
//! assert_eq!(doc_state.version, 1);
//! ```

use crate::search::{SearchMatch, SearchOptions, SearchStatus};
use crate::status::Status;
use crate::{
    Command, CommandError, CommandExecutor, CommandResult, EditorConfig, Encoding, LineEnding,
};
use std::time::Instant;

/// Document state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Total document line count
    pub line_count: usize,
    /// Total document character count
    pub char_count: usize,
    /// Total document word count
    pub word_count: usize,
    /// Total document byte count (UTF-8)
    pub byte_count: usize,
    /// Whether document has unsaved changes
    pub is_modified: bool,
    /// File name, if the document was opened or saved
    pub file_name: Option<String>,
    /// Encoding used for saving
    pub encoding: Encoding,
    /// Line ending used for saving
    pub line_ending: LineEnding,
    /// State version number (incremented after each change)
    pub version: u64,
}

/// Undo/redo stack state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRedoState {
    /// Can undo
    pub can_undo: bool,
    /// Can redo
    pub can_redo: bool,
    /// Undo stack depth
    pub undo_depth: usize,
    /// Redo stack depth
    pub redo_depth: usize,
    /// A debounced commit is waiting for input to settle
    pub commit_pending: bool,
}

/// Search session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Current term (empty when search is closed)
    pub term: String,
    /// Active options
    pub options: SearchOptions,
    /// Number of cached matches
    pub match_count: usize,
    /// Selected match span
    pub current_match: Option<SearchMatch>,
    /// Index of the selected match
    pub current_index: Option<usize>,
    /// Display status
    pub status: SearchStatus,
}

/// Status line message: a translation key plus named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Translation key
    pub key: &'static str,
    /// Named parameters
    pub params: Vec<(&'static str, String)>,
}

impl From<&Status> for StatusMessage {
    fn from(status: &Status) -> Self {
        Self {
            key: status.key(),
            params: status.params(),
        }
    }
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified
    DocumentModified,
    /// Undo/redo stacks changed
    HistoryChanged,
    /// Search term, options, matches or selection changed
    SearchChanged,
    /// File name, encoding, line ending or saved flag changed
    FileChanged,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

impl StateChange {
    /// Create a new state change record.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
        }
    }
}

/// Complete editor state snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Document state
    pub document: DocumentState,
    /// Undo/redo state
    pub undo_redo: UndoRedoState,
    /// Search state
    pub search: SearchState,
    /// Status line message
    pub status: StatusMessage,
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Cheap comparison key for detecting which parts of the state a command touched.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    revision: u64,
    history: (u64, bool),
    search: (String, SearchOptions, usize, Option<usize>, bool),
    file: (Option<String>, Encoding, LineEnding, bool),
}

impl Fingerprint {
    fn capture(executor: &CommandExecutor) -> Self {
        let document = executor.document();
        let search = executor.search();
        Self {
            revision: executor.revision(),
            history: (
                executor.history().generation(),
                executor.has_pending_commit(),
            ),
            search: (
                search.term().to_string(),
                search.options(),
                search.matches().len(),
                search.current_index(),
                search.is_stale(),
            ),
            file: (
                document.file_name.clone(),
                document.encoding,
                document.line_ending,
                document.modified,
            ),
        }
    }

    fn changes_since(&self, before: &Fingerprint) -> Vec<StateChangeType> {
        let mut changes = Vec::new();
        if self.revision != before.revision {
            changes.push(StateChangeType::DocumentModified);
        }
        if self.history != before.history {
            changes.push(StateChangeType::HistoryChanged);
        }
        if self.search != before.search {
            changes.push(StateChangeType::SearchChanged);
        }
        if self.file != before.file {
            changes.push(StateChangeType::FileChanged);
        }
        changes
    }
}

/// Editor state manager
///
/// `EditorStateManager` wraps the command executor ([`CommandExecutor`]) and provides:
///
/// - **State Queries**: Retrieve state snapshots (document, history, search, status)
/// - **Version Tracking**: Increment the version number once per state-changing command or tick
/// - **Change Notifications**: Notify subscribers of each kind of change via callbacks
///
/// Commands that succeed without changing anything (undo on an empty history, find-next with
/// no matches, ...) leave the version untouched.
///
/// # Example
///
/// ```rust
/// use notepad_core::{Command, EditCommand, EditorStateManager};
///
/// let mut manager = EditorStateManager::new();
///
/// manager.subscribe(|change| {
///     println!("Version {} -> {}: {:?}",
///         change.old_version, change.new_version, change.change_type);
/// });
///
/// // Nothing to undo: no-op, no version bump
/// manager.execute(Command::Edit(EditCommand::Undo)).unwrap();
/// assert_eq!(manager.version(), 0);
/// ```
pub struct EditorStateManager {
    /// Command executor
    executor: CommandExecutor,
    /// State version number
    state_version: u64,
    /// State change callback list
    callbacks: Vec<StateChangeCallback>,
}

impl Default for EditorStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStateManager {
    /// Create a state manager over an empty document
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a state manager with custom engine configuration
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            executor: CommandExecutor::with_config(config),
            state_version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Get a reference to the command executor
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Current document text
    pub fn content(&self) -> &str {
        self.executor.content()
    }

    /// Window title, e.g. `"notes.txt * - Simple Notepad"`.
    pub fn title(&self, app_title: &str, default_name: &str) -> String {
        self.executor.document().title(app_title, default_name)
    }

    /// Execute a command using the wall clock.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.execute_at(command, Instant::now())
    }

    /// Execute a command at `now` and notify subscribers of what changed.
    pub fn execute_at(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<CommandResult, CommandError> {
        let before = Fingerprint::capture(&self.executor);
        let result = self.executor.execute_at(command, now);
        // Due debounced work may have run even if the command itself failed.
        self.publish_changes(&before);
        result
    }

    /// Run due debounced work (history commit, re-search). Returns `true` if anything ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = Fingerprint::capture(&self.executor);
        let ran = self.executor.tick(now);
        if ran {
            self.publish_changes(&before);
        }
        ran
    }

    /// Earliest pending debounce deadline, for sizing the host's event poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.executor.next_deadline()
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Get complete editor state snapshot
    pub fn get_full_state(&self) -> EditorState {
        EditorState {
            document: self.get_document_state(),
            undo_redo: self.get_undo_redo_state(),
            search: self.get_search_state(),
            status: self.get_status_message(),
        }
    }

    /// Get document state
    pub fn get_document_state(&self) -> DocumentState {
        let document = self.executor.document();
        DocumentState {
            line_count: document.line_count(),
            char_count: document.char_count(),
            word_count: document.word_count(),
            byte_count: document.content.len(),
            is_modified: document.modified,
            file_name: document.file_name.clone(),
            encoding: document.encoding,
            line_ending: document.line_ending,
            version: self.state_version,
        }
    }

    /// Get undo/redo state
    pub fn get_undo_redo_state(&self) -> UndoRedoState {
        let history = self.executor.history();
        UndoRedoState {
            can_undo: self.executor.can_undo(),
            can_redo: self.executor.can_redo(),
            undo_depth: history.undo_depth(),
            redo_depth: history.redo_depth(),
            commit_pending: self.executor.has_pending_commit(),
        }
    }

    /// Get search state
    pub fn get_search_state(&self) -> SearchState {
        let search = self.executor.search();
        SearchState {
            term: search.term().to_string(),
            options: search.options(),
            match_count: search.matches().len(),
            current_match: search.current_match(),
            current_index: search.current_index(),
            status: search.status(),
        }
    }

    /// Get the status line message
    pub fn get_status_message(&self) -> StatusMessage {
        StatusMessage::from(self.executor.status())
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    fn publish_changes(&mut self, before: &Fingerprint) {
        let changes = Fingerprint::capture(&self.executor).changes_since(before);
        if changes.is_empty() {
            return;
        }

        let old_version = self.state_version;
        self.state_version += 1;
        for change_type in changes {
            let change = StateChange::new(change_type, old_version, self.state_version);
            self.notify_callbacks(&change);
        }
    }

    /// Notify all callbacks
    fn notify_callbacks(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}
