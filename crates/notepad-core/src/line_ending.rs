//! Line ending helpers.
//!
//! Documents are edited with whatever newlines the host hands over. The preferred line ending
//! is tracked per document and applied when the text is prepared for saving.

use std::fmt;
use std::str::FromStr;

/// The newline sequence used when saving a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[serde(rename = "LF")]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    #[default]
    #[serde(rename = "CRLF")]
    Crlf,
    /// Classic Mac CR (`'\r'`).
    #[serde(rename = "CR")]
    Cr,
}

impl LineEnding {
    /// All supported line endings, in menu order.
    pub const ALL: [LineEnding; 3] = [LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr];

    /// Detect the line ending used by `text`.
    ///
    /// Policy: any CRLF wins, then any lone CR, otherwise LF.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else if text.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    /// Convert CRLF and lone CR to LF.
    pub fn normalize(text: &str) -> String {
        text.replace("\r\n", "\n").replace('\r', "\n")
    }

    /// Convert `text` (with any mix of newlines) to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        let normalized = Self::normalize(text);
        match self {
            Self::Lf => normalized,
            Self::Crlf => normalized.replace('\n', "\r\n"),
            Self::Cr => normalized.replace('\n', "\r"),
        }
    }

    /// Label shown in the status bar and save dialog.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
            Self::Cr => "CR",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown line ending label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown line ending: {0}")]
pub struct ParseLineEndingError(pub String);

impl FromStr for LineEnding {
    type Err = ParseLineEndingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LF" => Ok(Self::Lf),
            "CRLF" => Ok(Self::Crlf),
            "CR" => Ok(Self::Cr),
            _ => Err(ParseLineEndingError(s.to_string())),
        }
    }
}
