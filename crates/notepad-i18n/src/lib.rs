#![warn(missing_docs)]
//! `notepad-i18n` - translation lookup and locale validation for the notepad shell.
//!
//! Locale tables are flat JSON objects (`"status.ready": "Ready"`) bundled into the binary.
//! There is no global translator: hosts create a [`Translator`] and pass it where strings are
//! rendered.
//!
//! ```rust
//! use notepad_i18n::Translator;
//!
//! let translator = Translator::new("fr-CA").unwrap();
//! assert_eq!(translator.language(), "fr");
//! assert_eq!(
//!     translator.t("search.results", &[("current", "1"), ("total", "4")]),
//!     "1 / 4 correspondances"
//! );
//! ```

pub mod languages;
pub mod translator;
pub mod validate;

pub use languages::{
    DEFAULT_LANGUAGE, LanguageInfo, available_languages, fallback_chain, is_language_supported,
    language_info, resolve_language,
};
pub use translator::{LocaleError, LocaleTable, Translator, bundled_locales, interpolate};
pub use validate::{Issue, ValidationReport, validate_all, validate_locale};
