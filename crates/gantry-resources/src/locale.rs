//! Locale code validation.
//!
//! Store listings, release notes, and release names are organized into one
//! directory per locale. Directory names must follow a BCP 47-like grammar:
//! a two or three letter language code, optionally followed by a two letter
//! region ("en-US"), a three digit region ("es-419"), or a four letter
//! script ("zh-Hans").

use crate::error::{ResourceError, Result};
use std::path::Path;

/// A validated locale code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleCode {
    language: String,
    subtag: Option<String>,
}

impl LocaleCode {
    /// Parses a locale code, rejecting anything outside the accepted grammar.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        let invalid = || ResourceError::InvalidLocale {
            name: code.to_string(),
            path: Path::new(code).to_path_buf(),
        };

        let mut parts = code.split('-');
        let language = parts.next().ok_or_else(invalid)?;
        if !(2..=3).contains(&language.len())
            || !language.chars().all(|c| c.is_ascii_lowercase())
        {
            return Err(invalid());
        }

        let subtag = match parts.next() {
            None => None,
            Some(sub) => {
                let region = sub.len() == 2 && sub.chars().all(|c| c.is_ascii_uppercase());
                let numeric = sub.len() == 3 && sub.chars().all(|c| c.is_ascii_digit());
                let script = sub.len() == 4
                    && sub.chars().all(|c| c.is_ascii_alphabetic())
                    && sub.chars().next().is_some_and(|c| c.is_ascii_uppercase());
                if !(region || numeric || script) {
                    return Err(invalid());
                }
                Some(sub.to_string())
            }
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            language: language.to_string(),
            subtag,
        })
    }

    /// Returns the full locale code (e.g., "en-US").
    pub fn code(&self) -> String {
        match &self.subtag {
            Some(sub) => format!("{}-{}", self.language, sub),
            None => self.language.clone(),
        }
    }

    /// Returns the language part.
    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Checks whether a directory name is an acceptable locale code.
pub fn is_valid_locale(name: &str) -> bool {
    LocaleCode::parse(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_language() {
        assert!(is_valid_locale("en"));
        assert!(is_valid_locale("fil"));
    }

    #[test]
    fn accepts_language_with_region() {
        assert!(is_valid_locale("en-US"));
        assert!(is_valid_locale("pt-BR"));
        assert!(is_valid_locale("es-419"));
    }

    #[test]
    fn accepts_script_subtags() {
        assert!(is_valid_locale("zh-Hans"));
        assert!(is_valid_locale("zh-Hant"));
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(!is_valid_locale(""));
        assert!(!is_valid_locale("english"));
        assert!(!is_valid_locale("EN-us"));
        assert!(!is_valid_locale("en-us"));
        assert!(!is_valid_locale("en-USA"));
        assert!(!is_valid_locale("en-US-x"));
        assert!(!is_valid_locale("graphics"));
    }

    #[test]
    fn round_trips_code() {
        assert_eq!(LocaleCode::parse("de-DE").unwrap().code(), "de-DE");
        assert_eq!(LocaleCode::parse("ja").unwrap().code(), "ja");
        assert_eq!(LocaleCode::parse("de-DE").unwrap().language(), "de");
    }
}
