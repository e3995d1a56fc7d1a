//! Per-provider scraping settings.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Title / plot fallback configuration.
///
/// Read once at the start of every provider operation; changing it never
/// affects a call already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FallbackSettings {
    /// Whether deficient text is repaired from the fallback language.
    pub enabled: bool,
    /// Language consulted for repairs.
    pub language: Language,
}

impl FallbackSettings {
    /// Enabled fallback to `language`.
    #[must_use]
    pub const fn to(language: Language) -> Self {
        Self {
            enabled: true,
            language,
        }
    }

    /// Whether a call in `requested` may consult the fallback language.
    ///
    /// False when fallback is disabled or the languages already match.
    #[must_use]
    pub fn applies_to(&self, requested: Language) -> bool {
        self.enabled && requested != self.language
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::language::resolve;

    #[test]
    fn test_default_is_disabled_english() {
        // Arrange & Act
        let settings = FallbackSettings::default();

        // Assert
        assert!(!settings.enabled);
        assert_eq!(settings.language, Language::ENGLISH);
    }

    #[test]
    fn test_applies_only_when_enabled_and_languages_differ() {
        // Arrange
        let de = resolve("de").unwrap();
        let en = Language::ENGLISH;

        // Act & Assert
        assert!(FallbackSettings::to(en).applies_to(de));
        assert!(!FallbackSettings::to(en).applies_to(en));
        assert!(!FallbackSettings::default().applies_to(de));
    }

    #[test]
    fn test_country_variant_counts_as_different() {
        // Arrange
        let pt = resolve("pt").unwrap();
        let pt_br = resolve("pt-BR").unwrap();

        // Act & Assert
        assert!(FallbackSettings::to(pt).applies_to(pt_br));
    }
}
