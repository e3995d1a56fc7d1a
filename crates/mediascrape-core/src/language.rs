//! Supported scraping languages.
//!
//! A fixed registry of two-letter language codes, optionally with a country
//! variant (`pt-BR`). Lookups are pure and the table is `'static`, so any
//! number of callers can read it concurrently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ScrapeError;

/// A supported language, optionally narrowed to a country variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Language {
    /// ISO 639-1 code, lowercase.
    code: &'static str,
    /// ISO 3166-1 alpha-2 country, uppercase.
    country: Option<&'static str>,
    /// Native display name.
    name: &'static str,
}

/// Builds a registry entry.
const fn entry(code: &'static str, country: Option<&'static str>, name: &'static str) -> Language {
    Language {
        code,
        country,
        name,
    }
}

/// Every language the scrapers accept.
const SUPPORTED: &[Language] = &[
    entry("cs", None, "Český"),
    entry("de", None, "Deutsch"),
    entry("da", None, "Dansk"),
    entry("en", None, "English"),
    entry("es", None, "Español"),
    entry("fa", None, "Persian"),
    entry("fi", None, "Suomi"),
    entry("fr", None, "Française"),
    entry("hu", None, "Magyar"),
    entry("it", None, "Italiano"),
    entry("nl", None, "Nederlands"),
    entry("no", None, "Norsk"),
    entry("pl", None, "Język polski"),
    entry("pt", None, "Portuguese"),
    entry("pt", Some("BR"), "Portuguese (Brazil)"),
    entry("ro", None, "Română"),
    entry("ru", None, "русский язык"),
    entry("sl", None, "Slovenščina"),
    entry("sk", None, "Slovenčina"),
    entry("sv", None, "Svenska"),
    entry("tr", None, "Türkçe"),
    entry("zh", None, "Chinese"),
];

impl Language {
    /// English, the registry default.
    pub const ENGLISH: Self = entry("en", None, "English");

    /// Two-letter language code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Country variant, if any.
    #[must_use]
    pub const fn country(&self) -> Option<&'static str> {
        self.country
    }

    /// Native display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// ISO 639-1 part, without region.
    #[must_use]
    pub const fn language_part(&self) -> &'static str {
        self.code
    }

    /// Combined tag as TMDB expects it: `en`, `pt-BR`.
    #[must_use]
    pub fn tag(&self) -> String {
        self.country.map_or_else(
            || String::from(self.code),
            |country| format!("{}-{country}", self.code),
        )
    }

    /// Iterates the whole registry in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        SUPPORTED.iter().copied()
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Resolves a code such as `de`, `pt_BR` or `pt-br` against the registry.
///
/// # Errors
///
/// Returns `ScrapeError::UnknownLanguage` when the code is not supported.
pub fn resolve(code: &str) -> Result<Language, ScrapeError> {
    let normalized = code.trim().replace('_', "-");
    let (lang, country) = match normalized.split_once('-') {
        Some((lang, country)) => (lang.to_ascii_lowercase(), Some(country.to_ascii_uppercase())),
        None => (normalized.to_ascii_lowercase(), None),
    };

    SUPPORTED
        .iter()
        .find(|candidate| candidate.code == lang && candidate.country == country.as_deref())
        .copied()
        .ok_or_else(|| ScrapeError::UnknownLanguage(String::from(code)))
}

/// Returns the first two characters of a language code.
///
/// Used wherever a catalog expects an ISO 639-1 code without region.
#[must_use]
pub fn language_part(code: &str) -> &str {
    code.get(..2).unwrap_or(code)
}

impl FromStr for Language {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        resolve(&code).map_err(serde::de::Error::custom)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.tag()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_plain_code() {
        // Arrange & Act
        let lang = resolve("de").unwrap();

        // Assert
        assert_eq!(lang.code(), "de");
        assert_eq!(lang.country(), None);
        assert_eq!(lang.tag(), "de");
        assert_eq!(lang.to_string(), "Deutsch");
    }

    #[test]
    fn test_resolve_country_variant_spellings() {
        // Arrange & Act
        let underscore = resolve("pt_BR").unwrap();
        let dash = resolve("pt-BR").unwrap();
        let lower = resolve("pt-br").unwrap();

        // Assert
        assert_eq!(underscore, dash);
        assert_eq!(dash, lower);
        assert_eq!(dash.tag(), "pt-BR");
        assert_eq!(dash.language_part(), "pt");
    }

    #[test]
    fn test_country_variant_differs_from_plain() {
        // Arrange & Act & Assert
        assert_ne!(resolve("pt").unwrap(), resolve("pt-BR").unwrap());
    }

    #[test]
    fn test_resolve_unknown_code() {
        // Arrange & Act
        let result = resolve("xx");

        // Assert
        assert!(matches!(result, Err(ScrapeError::UnknownLanguage(code)) if code == "xx"));
    }

    #[test]
    fn test_resolve_unknown_country_variant() {
        // Arrange & Act & Assert
        assert!(resolve("en-GB").is_err());
    }

    #[test]
    fn test_language_part() {
        // Arrange & Act & Assert
        assert_eq!(language_part("pt-BR"), "pt");
        assert_eq!(language_part("de"), "de");
        assert_eq!(language_part("e"), "e");
        assert_eq!(language_part(""), "");
    }

    #[test]
    fn test_registry_is_unique() {
        // Arrange
        let tags: Vec<String> = Language::all().map(|l| l.tag()).collect();

        // Act
        let mut deduped = tags.clone();
        deduped.sort();
        deduped.dedup();

        // Assert
        assert_eq!(tags.len(), deduped.len());
        assert_eq!(tags.len(), 22);
    }

    #[test]
    fn test_serde_uses_tag() {
        // Arrange
        let lang = resolve("pt_BR").unwrap();

        // Act
        let json = serde_json::to_string(&lang).unwrap();
        let parsed: Language = serde_json::from_str(&json).unwrap();

        // Assert
        assert_eq!(json, "\"pt-BR\"");
        assert_eq!(parsed, lang);
    }

    #[test]
    fn test_deserialize_field_from_owned_input() {
        // Arrange
        #[derive(Deserialize)]
        struct Section {
            language: Language,
            fallback: Language,
        }
        let body = format!(r#"{{"language":"{}","fallback":"en"}}"#, "pt_BR");

        // Act
        let section: Section = serde_json::from_str(&body).unwrap();

        // Assert
        assert_eq!(section.language, resolve("pt-BR").unwrap());
        assert_eq!(section.fallback, Language::ENGLISH);
    }

    #[test]
    fn test_serde_rejects_unknown() {
        // Arrange & Act
        let result: Result<Language, _> = serde_json::from_str("\"klingon\"");

        // Assert
        assert!(result.is_err());
    }
}
