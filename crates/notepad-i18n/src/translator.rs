//! Translation lookup with language fallback.

use crate::languages::{DEFAULT_LANGUAGE, available_languages, fallback_chain};
use std::collections::BTreeMap;
use thiserror::Error;

/// A flat `key -> translated string` table.
pub type LocaleTable = BTreeMap<String, String>;

const BUNDLED_LOCALES: [(&str, &str); 5] = [
    ("en", include_str!("../locales/en.json")),
    ("zh", include_str!("../locales/zh.json")),
    ("es", include_str!("../locales/es.json")),
    ("fr", include_str!("../locales/fr.json")),
    ("ja", include_str!("../locales/ja.json")),
];

/// Errors while loading locale tables.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// A locale file is not a flat JSON object of strings.
    #[error("invalid locale file for {code}: {source}")]
    Parse {
        /// Language code of the offending file.
        code: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// No table was provided for the default language.
    #[error("missing locale table for the default language")]
    MissingDefault,
}

/// Parse one locale file.
pub fn parse_locale(code: &str, json: &str) -> Result<LocaleTable, LocaleError> {
    serde_json::from_str(json).map_err(|source| LocaleError::Parse {
        code: code.to_string(),
        source,
    })
}

/// Parse every bundled locale, keyed by language code.
pub fn bundled_locales() -> Result<BTreeMap<String, LocaleTable>, LocaleError> {
    BUNDLED_LOCALES
        .iter()
        .map(|(code, json)| parse_locale(code, json).map(|table| (code.to_string(), table)))
        .collect()
}

/// Replace `{name}` placeholders in `template` with the matching parameter values.
///
/// Placeholders without a matching parameter are left untouched. Substituted values are
/// copied as-is and never scanned for placeholders themselves.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail[1..].find(['{', '}']).map(|i| i + 1) else {
            out.push_str(tail);
            return out;
        };
        if tail.as_bytes()[close] == b'{' {
            // Stray '{': keep it and rescan from the next brace.
            out.push_str(&tail[..close]);
            rest = &tail[close..];
            continue;
        }
        let name = &tail[1..close];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Translation service for one active language.
///
/// Lookups fall back from the active language to English, then to the key itself.
#[derive(Debug, Clone)]
pub struct Translator {
    tables: BTreeMap<String, LocaleTable>,
    language: String,
}

impl Translator {
    /// Create a translator over the bundled locales.
    ///
    /// Unsupported codes resolve through [`fallback_chain`], ending at English.
    pub fn new(code: &str) -> Result<Self, LocaleError> {
        Self::with_tables(bundled_locales()?, code)
    }

    /// Create a translator over custom tables. The table for English is required.
    pub fn with_tables(
        tables: BTreeMap<String, LocaleTable>,
        code: &str,
    ) -> Result<Self, LocaleError> {
        if !tables.contains_key(DEFAULT_LANGUAGE) {
            return Err(LocaleError::MissingDefault);
        }

        let mut translator = Self {
            tables,
            language: DEFAULT_LANGUAGE.to_string(),
        };
        translator.set_language(code);
        Ok(translator)
    }

    /// Active language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switch the active language. Returns `false` (and keeps the current one) if neither
    /// `code` nor its language prefix has a table.
    pub fn set_language(&mut self, code: &str) -> bool {
        let resolved = fallback_chain(code)
            .into_iter()
            .find(|candidate| self.tables.contains_key(*candidate));

        // English is only accepted when asked for, not as the universal fallback.
        let asked_for_default = code
            .split(['-', '_'])
            .next()
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DEFAULT_LANGUAGE));

        match resolved {
            Some(lang) if lang != DEFAULT_LANGUAGE || asked_for_default => {
                if self.language != lang {
                    tracing::info!(from = %self.language, to = lang, "language changed");
                    self.language = lang.to_string();
                }
                true
            }
            _ => {
                tracing::warn!("language {code:?} is not supported");
                false
            }
        }
    }

    /// Native name of the active language.
    pub fn native_name(&self) -> &'static str {
        available_languages()
            .iter()
            .find(|lang| lang.code == self.language)
            .map_or("English", |lang| lang.native_name)
    }

    /// Returns `true` if the active language or English defines `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Translate `key`, interpolating `{name}` placeholders from `params`.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.lookup(key) {
            Some(template) => interpolate(template, params),
            None => {
                tracing::warn!("translation key {key:?} not found");
                key.to_string()
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        [self.language.as_str(), DEFAULT_LANGUAGE]
            .into_iter()
            .filter_map(|lang| self.tables.get(lang))
            .find_map(|table| table.get(key))
            .map(String::as_str)
    }
}
