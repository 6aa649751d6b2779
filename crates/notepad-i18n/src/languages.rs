//! Supported UI languages and fallback resolution.

/// Metadata for a supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Language code (e.g. `ja`).
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    /// Name in the language itself.
    pub native_name: &'static str,
    /// Country code for flag display.
    pub country: &'static str,
}

/// Fallback language for missing keys and unsupported codes.
pub const DEFAULT_LANGUAGE: &str = "en";

const LANGUAGES: [LanguageInfo; 5] = [
    LanguageInfo {
        code: "en",
        name: "English",
        native_name: "English",
        country: "US",
    },
    LanguageInfo {
        code: "zh",
        name: "Chinese (Simplified)",
        native_name: "中文（简体）",
        country: "CN",
    },
    LanguageInfo {
        code: "es",
        name: "Spanish",
        native_name: "Español",
        country: "ES",
    },
    LanguageInfo {
        code: "fr",
        name: "French",
        native_name: "Français",
        country: "FR",
    },
    LanguageInfo {
        code: "ja",
        name: "Japanese",
        native_name: "日本語",
        country: "JP",
    },
];

/// All supported languages, in menu order.
pub fn available_languages() -> &'static [LanguageInfo] {
    &LANGUAGES
}

/// Look up a language by code (case-insensitive).
pub fn language_info(code: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code))
}

/// Returns `true` if translations exist for `code`.
pub fn is_language_supported(code: &str) -> bool {
    language_info(code).is_some()
}

/// Languages to try for `code`, most specific first.
///
/// `zh-CN` yields `["zh", "en"]`: the full code (if supported), its prefix, then English.
/// Only supported codes are returned.
pub fn fallback_chain(code: &str) -> Vec<&'static str> {
    let prefix = code.split(['-', '_']).next().unwrap_or(code);
    let mut chain = Vec::with_capacity(3);

    for candidate in [code, prefix, DEFAULT_LANGUAGE] {
        if let Some(info) = language_info(candidate)
            && !chain.contains(&info.code)
        {
            chain.push(info.code);
        }
    }
    chain
}

/// Pick the UI language: a saved preference wins, then the system locale, then English.
///
/// `system` accepts POSIX locale strings such as `ja_JP.UTF-8`.
pub fn resolve_language(preferred: Option<&str>, system: Option<&str>) -> &'static str {
    if let Some(info) = preferred.and_then(language_info) {
        return info.code;
    }

    system
        .map(|locale| locale.split(['.', '@']).next().unwrap_or(locale))
        .filter(|locale| !locale.is_empty() && *locale != "C" && *locale != "POSIX")
        .and_then(|locale| fallback_chain(locale).first().copied())
        .unwrap_or(DEFAULT_LANGUAGE)
}
