//! Status line messages.
//!
//! The core never formats user-facing text itself. Each [`Status`] maps to a translation key
//! plus named parameters, which the host resolves through its translation service.

use crate::search::SearchStatus;
use crate::{Encoding, LineEnding};

/// Outcome of the last operation, for the host's status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Idle.
    #[default]
    Ready,
    /// A new empty document was created.
    NewFile,
    /// A file was loaded.
    FileOpened {
        /// Loaded file name.
        file_name: String,
        /// Encoding tag chosen for the file.
        encoding: Encoding,
    },
    /// The document was saved.
    FileSaved {
        /// Encoding it was saved with.
        encoding: Encoding,
        /// Line ending it was saved with.
        line_ending: LineEnding,
    },
    /// The document encoding was changed.
    EncodingChanged(Encoding),
    /// The document line ending was changed.
    LineEndingChanged(LineEnding),
    /// The search term has no occurrences.
    NotFound,
    /// `current` of `total` matches is selected (1-based).
    Matches {
        /// 1-based selected match.
        current: usize,
        /// Total match count.
        total: usize,
    },
    /// Replace-all finished.
    Replaced {
        /// Number of replaced occurrences.
        count: usize,
    },
}

impl From<SearchStatus> for Status {
    fn from(status: SearchStatus) -> Self {
        match status {
            SearchStatus::Ready => Status::Ready,
            SearchStatus::NotFound => Status::NotFound,
            SearchStatus::Matches { current, total } => Status::Matches { current, total },
        }
    }
}

impl Status {
    /// Translation key for this status.
    pub fn key(&self) -> &'static str {
        match self {
            Status::Ready => "status.ready",
            Status::NewFile => "status.newFile",
            Status::FileOpened { .. } => "status.fileOpenedNamed",
            Status::FileSaved { .. } => "status.fileSavedWith",
            Status::EncodingChanged(_) => "status.encodingChanged",
            Status::LineEndingChanged(_) => "status.lineEndingChanged",
            Status::NotFound => "search.notFound",
            Status::Matches { .. } => "search.results",
            Status::Replaced { .. } => "search.replaced",
        }
    }

    /// Named parameters interpolated into the translated string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Status::Ready | Status::NewFile | Status::NotFound => Vec::new(),
            Status::FileOpened {
                file_name,
                encoding,
            } => vec![
                ("name", file_name.clone()),
                ("encoding", encoding.to_string()),
            ],
            Status::FileSaved {
                encoding,
                line_ending,
            } => vec![
                ("encoding", encoding.to_string()),
                ("lineEnding", line_ending.to_string()),
            ],
            Status::EncodingChanged(encoding) => vec![("encoding", encoding.to_string())],
            Status::LineEndingChanged(line_ending) => {
                vec![("lineEnding", line_ending.to_string())]
            }
            Status::Matches { current, total } => vec![
                ("current", current.to_string()),
                ("total", total.to_string()),
            ],
            Status::Replaced { count } => vec![("count", count.to_string())],
        }
    }
}
