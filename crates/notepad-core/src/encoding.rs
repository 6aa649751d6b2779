//! Document encoding tags.
//!
//! The editor keeps text as Rust `String`s; an [`Encoding`] only records how the host should
//! write the document back. The Unicode encodings can be produced here directly, the legacy
//! Japanese encodings are left to the host platform.

use std::fmt;
use std::str::FromStr;

/// Encoding tag carried by a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum Encoding {
    /// UTF-8 without BOM.
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    /// UTF-8 with a leading byte order mark.
    #[serde(rename = "UTF-8-BOM")]
    Utf8Bom,
    /// UTF-16, little endian, with BOM.
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    /// UTF-16, big endian, with BOM.
    #[serde(rename = "UTF-16BE")]
    Utf16Be,
    /// Shift_JIS.
    #[serde(rename = "Shift_JIS")]
    ShiftJis,
    /// EUC-JP.
    #[serde(rename = "EUC-JP")]
    EucJp,
}

/// Encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The label does not name a known encoding.
    #[error("unknown encoding: {0}")]
    UnknownLabel(String),
    /// The encoding cannot be produced by the editor core.
    #[error("encoding {0} must be produced by the host")]
    Unsupported(Encoding),
}

const EXTENSIONS_FORCING_UTF8: [&str; 5] = ["js", "ts", "json", "html", "css"];

impl Encoding {
    /// All supported encodings, in menu order.
    pub const ALL: [Encoding; 6] = [
        Encoding::Utf8,
        Encoding::Utf8Bom,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::ShiftJis,
        Encoding::EucJp,
    ];

    /// Display label (as shown in the status bar).
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8-BOM",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::ShiftJis => "Shift_JIS",
            Self::EucJp => "EUC-JP",
        }
    }

    /// Returns `true` if [`Encoding::encode`] can produce bytes for this encoding.
    pub fn is_unicode(self) -> bool {
        matches!(
            self,
            Self::Utf8 | Self::Utf8Bom | Self::Utf16Le | Self::Utf16Be
        )
    }

    /// Guess the encoding for a file being opened.
    ///
    /// Web source files are always UTF-8; anything else keeps the `current` selection.
    pub fn detect_from_file_name(file_name: &str, current: Encoding) -> Encoding {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if EXTENSIONS_FORCING_UTF8.contains(&ext.as_str()) {
            Encoding::Utf8
        } else {
            current
        }
    }

    /// Encode `text` into bytes.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf8Bom => {
                let mut out = Vec::with_capacity(text.len() + 3);
                out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                out.extend_from_slice(text.as_bytes());
                Ok(out)
            }
            Self::Utf16Le => {
                let mut out = vec![0xFF, 0xFE];
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                Ok(out)
            }
            Self::Utf16Be => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                Ok(out)
            }
            Self::ShiftJis | Self::EucJp => Err(EncodingError::Unsupported(self)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-bom" | "utf-8 bom" | "utf8-bom" => Ok(Self::Utf8Bom),
            "utf-16le" | "utf-16" => Ok(Self::Utf16Le),
            "utf-16be" => Ok(Self::Utf16Be),
            "shift-jis" | "sjis" => Ok(Self::ShiftJis),
            "euc-jp" => Ok(Self::EucJp),
            _ => Err(EncodingError::UnknownLabel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.label().parse::<Encoding>(), Ok(encoding));
        }
        assert_eq!("sjis".parse::<Encoding>(), Ok(Encoding::ShiftJis));
        assert!("latin-9".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_detect_from_file_name() {
        assert_eq!(
            Encoding::detect_from_file_name("app.JSON", Encoding::ShiftJis),
            Encoding::Utf8
        );
        assert_eq!(
            Encoding::detect_from_file_name("notes.txt", Encoding::ShiftJis),
            Encoding::ShiftJis
        );
        assert_eq!(
            Encoding::detect_from_file_name("README", Encoding::EucJp),
            Encoding::EucJp
        );
    }

    #[test]
    fn test_encode_unicode_variants() {
        assert_eq!(Encoding::Utf8.encode("hi").unwrap(), b"hi".to_vec());
        assert_eq!(
            Encoding::Utf8Bom.encode("hi").unwrap(),
            vec![0xEF, 0xBB, 0xBF, b'h', b'i']
        );
        assert_eq!(
            Encoding::Utf16Le.encode("A").unwrap(),
            vec![0xFF, 0xFE, 0x41, 0x00]
        );
        assert_eq!(
            Encoding::Utf16Be.encode("A").unwrap(),
            vec![0xFE, 0xFF, 0x00, 0x41]
        );
    }

    #[test]
    fn test_legacy_encodings_are_host_side() {
        assert_eq!(
            Encoding::ShiftJis.encode("x"),
            Err(EncodingError::Unsupported(Encoding::ShiftJis))
        );
        assert!(!Encoding::EucJp.is_unicode());
    }
}
