//! Locale identifiers and their translation file paths.
//!
//! A locale such as `"fr"` lives in `fr.json`, while a regional locale such
//! as `"zh-cn"` lives in a directory named after its region: `zh/cn.json`.

use crate::error::{Result, TranspubError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the region and the sub-locale.
pub const LOCALE_SEPARATOR: char = '-';

/// A validated locale identifier such as `fr` or `zh-cn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId(String);

impl LocaleId {
    /// Parses and validates a locale identifier.
    ///
    /// Accepted characters are ASCII alphanumerics, `_` and `-`. The
    /// separator may not start or end the identifier, nor repeat.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(TranspubError::invalid_locale(raw, "must not be empty"));
        }

        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == LOCALE_SEPARATOR))
        {
            return Err(TranspubError::invalid_locale(
                raw,
                format!("unsupported character '{}'", bad),
            ));
        }

        if raw.split(LOCALE_SEPARATOR).any(str::is_empty) {
            return Err(TranspubError::invalid_locale(
                raw,
                format!("empty segment around '{}'", LOCALE_SEPARATOR),
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `(region, sub-locale)` for regional locales.
    ///
    /// Only the first separator splits; `zh-hant-tw` yields `("zh", "hant-tw")`.
    pub fn region_split(&self) -> Option<(&str, &str)> {
        self.0.split_once(LOCALE_SEPARATOR)
    }

    /// Path of this locale's file relative to the translations directory.
    ///
    /// ```
    /// use transpub_core::locale::LocaleId;
    ///
    /// assert_eq!(LocaleId::parse("zh-cn").unwrap().file_path(), "zh/cn.json");
    /// assert_eq!(LocaleId::parse("fr").unwrap().file_path(), "fr.json");
    /// ```
    pub fn file_path(&self) -> String {
        match self.region_split() {
            Some((region, sub)) => format!("{}/{}.json", region, sub),
            None => format!("{}.json", self.0),
        }
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleId {
    type Err = TranspubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleId {
    type Error = TranspubError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LocaleId> for String {
    fn from(value: LocaleId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(raw: &str) -> String {
        LocaleId::parse(raw).unwrap().file_path()
    }

    #[test]
    fn test_plain_locale_maps_to_root_file() {
        assert_eq!(path_of("fr"), "fr.json");
        assert_eq!(path_of("de"), "de.json");
        assert_eq!(path_of("pt_BR"), "pt_BR.json");
    }

    #[test]
    fn test_regional_locale_maps_to_region_directory() {
        assert_eq!(path_of("zh-cn"), "zh/cn.json");
        assert_eq!(path_of("pt-br"), "pt/br.json");
    }

    #[test]
    fn test_only_first_separator_splits() {
        assert_eq!(path_of("zh-hant-tw"), "zh/hant-tw.json");
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let locale = LocaleId::parse("es-mx").unwrap();
        assert_eq!(locale.file_path(), locale.file_path());
        assert_eq!(locale.file_path(), path_of("es-mx"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(LocaleId::parse("").unwrap_err().is_invalid_locale());
    }

    #[test]
    fn test_rejects_path_characters() {
        assert!(LocaleId::parse("../fr").is_err());
        assert!(LocaleId::parse("fr/ca").is_err());
        assert!(LocaleId::parse("fr ca").is_err());
    }

    #[test]
    fn test_rejects_dangling_separator() {
        assert!(LocaleId::parse("-fr").is_err());
        assert!(LocaleId::parse("fr-").is_err());
        assert!(LocaleId::parse("zh--cn").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let locale: LocaleId = serde_json::from_str("\"zh-cn\"").unwrap();
        assert_eq!(locale.as_str(), "zh-cn");
        assert!(serde_json::from_str::<LocaleId>("\"\"").is_err());
    }
}
