//! Locale table validation.
//!
//! Checks a translation against the English template: completeness, empty values,
//! placeholder preservation and values likely too long for their UI slot.

use crate::languages::DEFAULT_LANGUAGE;
use crate::translator::{LocaleError, LocaleTable, bundled_locales};
use std::collections::BTreeSet;
use std::fmt;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// The template key has no translation.
    MissingKey(String),
    /// The translation has a key the template does not.
    ExtraKey(String),
    /// The translation is blank.
    EmptyValue(String),
    /// The translation's `{placeholders}` differ from the template's.
    PlaceholderMismatch {
        /// Key of the translation.
        key: String,
        /// Placeholders in the template.
        expected: Vec<String>,
        /// Placeholders in the translation.
        found: Vec<String>,
    },
    /// The translation exceeds the length limit for its kind of key.
    TooLong {
        /// Key of the translation.
        key: String,
        /// Length in characters.
        len: usize,
        /// Limit for this key.
        limit: usize,
    },
}

impl Issue {
    /// Errors fail validation; the rest are warnings.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Issue::MissingKey(_) | Issue::EmptyValue(_) | Issue::PlaceholderMismatch { .. }
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingKey(key) => write!(f, "missing translation key: {key}"),
            Issue::ExtraKey(key) => write!(f, "extra translation key: {key}"),
            Issue::EmptyValue(key) => write!(f, "empty translation: {key}"),
            Issue::PlaceholderMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "parameter mismatch in {key}: expected {}, got {}",
                expected.join(","),
                found.join(",")
            ),
            Issue::TooLong { key, len, limit } => {
                write!(f, "potentially long translation: {key} ({len} > {limit} chars)")
            }
        }
    }
}

/// Result of validating one locale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Language code that was validated.
    pub code: String,
    /// Findings, in key order.
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Findings that fail validation.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    /// Findings that only warrant a look.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Returns `true` if there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Character limit for a translation, by key kind.
pub fn length_limit(key: &str) -> usize {
    if key.starts_with("mobile.") {
        15
    } else if key.contains("button") || key.contains("btn") {
        20
    } else if key.contains("title") || key.contains("placeholder") {
        50
    } else {
        100
    }
}

fn placeholders(value: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        found.push(after[..close].to_string());
        rest = &after[close + 1..];
    }
    found.sort();
    found
}

/// Validate `locale` against `template`.
pub fn validate_locale(code: &str, template: &LocaleTable, locale: &LocaleTable) -> ValidationReport {
    let template_keys: BTreeSet<&String> = template.keys().collect();
    let locale_keys: BTreeSet<&String> = locale.keys().collect();

    let mut issues: Vec<Issue> = template_keys
        .difference(&locale_keys)
        .map(|key| Issue::MissingKey(key.to_string()))
        .collect();
    issues.extend(
        locale_keys
            .difference(&template_keys)
            .map(|key| Issue::ExtraKey(key.to_string())),
    );

    for (key, value) in locale {
        if value.trim().is_empty() {
            issues.push(Issue::EmptyValue(key.clone()));
            continue;
        }

        if let Some(template_value) = template.get(key) {
            let expected = placeholders(template_value);
            let found = placeholders(value);
            if expected != found {
                issues.push(Issue::PlaceholderMismatch {
                    key: key.clone(),
                    expected,
                    found,
                });
            }
        }

        let len = value.chars().count();
        let limit = length_limit(key);
        if len > limit {
            issues.push(Issue::TooLong {
                key: key.clone(),
                len,
                limit,
            });
        }
    }

    let report = ValidationReport {
        code: code.to_string(),
        issues,
    };
    for issue in &report.issues {
        if issue.is_error() {
            tracing::error!(language = code, "{issue}");
        } else {
            tracing::warn!(language = code, "{issue}");
        }
    }
    report
}

/// Validate every bundled locale (English included) against the English table.
pub fn validate_all() -> Result<Vec<ValidationReport>, LocaleError> {
    let locales = bundled_locales()?;
    let template = locales
        .get(DEFAULT_LANGUAGE)
        .ok_or(LocaleError::MissingDefault)?;

    Ok(locales
        .iter()
        .map(|(code, locale)| validate_locale(code, template, locale))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(entries: &[(&str, &str)]) -> LocaleTable {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bundled_locales_are_valid() {
        for report in validate_all().unwrap() {
            assert!(
                report.is_valid(),
                "{}: {:?}",
                report.code,
                report.errors().collect::<Vec<_>>()
            );
            assert_eq!(report.warnings().count(), 0, "{}", report.code);
        }
    }

    #[test]
    fn test_missing_extra_and_empty() {
        let template = table(&[("a", "A"), ("b", "B")]);
        let locale = table(&[("a", "  "), ("c", "C")]);
        let report = validate_locale("xx", &template, &locale);

        assert_eq!(
            report.issues,
            vec![
                Issue::MissingKey("b".to_string()),
                Issue::ExtraKey("c".to_string()),
                Issue::EmptyValue("a".to_string()),
            ]
        );
        assert!(!report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_placeholder_mismatch() {
        let template = table(&[("search.results", "{current} / {total} matches")]);
        let locale = table(&[("search.results", "{current} von {count}")]);
        let report = validate_locale("de", &template, &locale);

        assert_eq!(
            report.issues,
            vec![Issue::PlaceholderMismatch {
                key: "search.results".to_string(),
                expected: vec!["current".to_string(), "total".to_string()],
                found: vec!["count".to_string(), "current".to_string()],
            }]
        );
    }

    #[test]
    fn test_length_limits() {
        assert_eq!(length_limit("mobile.save"), 15);
        assert_eq!(length_limit("saveAs.title"), 50);
        assert_eq!(length_limit("search.placeholder"), 50);
        assert_eq!(length_limit("status.ready"), 100);

        let template = table(&[("mobile.save", "Save")]);
        let locale = table(&[("mobile.save", "Enregistrer sous")]);
        let report = validate_locale("fr", &template, &locale);
        assert!(report.is_valid());
        assert_eq!(
            report.issues,
            vec![Issue::TooLong {
                key: "mobile.save".to_string(),
                len: 16,
                limit: 15,
            }]
        );
    }
}
