#![warn(missing_docs)]
//! Notepad Core - Headless Plain-Text Editor Kernel
//!
//! # Overview
//!
//! `notepad-core` is the headless engine behind Simple Notepad: snapshot-based undo/redo,
//! literal find/replace, and the document metadata (file name, encoding, line ending) a plain
//! text editor tracks. It does no rendering and no file I/O; a host (the terminal shell in
//! `notepad-tui`, or any other frontend) feeds it commands and renders the resulting state.
//!
//! # Core Features
//!
//! - **Snapshot History**: full-text undo/redo snapshots, bounded to 100 entries by default
//! - **Debounced Commits**: rapid edits collapse into one history step once input settles
//! - **Literal Search**: case-insensitive by default, circular next/previous, replace one/all
//! - **Line Endings & Encodings**: detection on load, conversion on save
//! - **State Tracking**: Version number mechanism and Change Notifications system
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  State Management (versions, callbacks)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Command Interface (CommandExecutor)        │  ← Dispatch + debouncing
//! ├─────────────────────────────────────────────┤
//! │  EditHistory  │  SearchEngine  │  Document  │  ← Engines
//! ├─────────────────────────────────────────────┤
//! │  LineEnding  │  Encoding  │  Preferences    │  ← File metadata + config
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using Command Interface
//!
//! ```rust
//! use notepad_core::{Command, CommandExecutor, CommandResult, EditCommand};
//!
//! let mut executor = CommandExecutor::new();
//!
//! executor.execute(Command::Edit(EditCommand::SetText {
//!     text: "Hello".to_string(),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::Commit)).unwrap();
//!
//! let result = executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
//! assert_eq!(result, CommandResult::Text(String::new()));
//! ```
//!
//! ## Using State Management
//!
//! ```rust
//! use notepad_core::EditorStateManager;
//!
//! let mut manager = EditorStateManager::new();
//!
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! let doc_state = manager.get_document_state();
//! println!("Line count: {}, Characters: {}", doc_state.line_count, doc_state.char_count);
//! ```
//!
//! # Module Description
//!
//! - [`history`] - Snapshot undo/redo stacks
//! - [`search`] - Literal find/replace over character offsets
//! - [`document`] - Document model and plain-text helpers
//! - [`line_ending`] / [`encoding`] - File format metadata
//! - [`debounce`] - Deadline scheduling for commits and re-search
//! - [`commands`] - Unified command interface
//! - [`state`] - State management and query interface
//! - [`config`] - Engine configuration and persisted preferences
//! - [`status`] - Status line messages as translation keys
//!
//! # Offsets
//!
//! All offsets in the public API are character offsets (Unicode scalar values), never bytes.

pub mod commands;
pub mod config;
pub mod debounce;
pub mod document;
pub mod encoding;
pub mod history;
pub mod line_ending;
pub mod search;
pub mod state;
pub mod status;

pub use commands::{
    COMMAND_NAMES, Command, CommandError, CommandExecutor, CommandResult, EditCommand,
    FileCommand, SearchCommand,
};
pub use config::{EditorConfig, Preferences, PreferencesError};
pub use debounce::{DebounceKey, Debouncer};
pub use document::{Document, Position};
pub use encoding::{Encoding, EncodingError};
pub use history::{DEFAULT_UNDO_LIMIT, EditHistory};
pub use line_ending::LineEnding;
pub use search::{SearchEngine, SearchError, SearchMatch, SearchOptions, SearchStatus};
pub use state::{
    DocumentState, EditorState, EditorStateManager, SearchState, StateChange,
    StateChangeCallback, StateChangeType, StatusMessage, UndoRedoState,
};
pub use status::Status;
