//! `AppConfig` struct, TOML loading and config path resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mediascrape_core::Language;
use mediascrape_core::config::FallbackSettings;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Scraper defaults.
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// `[scraper]` section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScraperConfig {
    /// Default result language (`de`, `pt-BR`, ...).
    pub language: Language,
    /// Certification country (ISO 3166-1), all countries when unset.
    pub country: Option<String>,
    /// Repair untranslated titles and blank plots from the fallback language.
    pub title_fallback: bool,
    /// Language consulted by the title fallback.
    pub title_fallback_language: Language,
    /// Image host override.
    pub image_base_url: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            language: Language::ENGLISH,
            country: None,
            title_fallback: false,
            title_fallback_language: Language::ENGLISH,
            image_base_url: None,
        }
    }
}

impl ScraperConfig {
    /// Fallback settings described by this section.
    #[must_use]
    pub const fn fallback(&self) -> FallbackSettings {
        FallbackSettings {
            enabled: self.title_fallback,
            language: self.title_fallback_language,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Else, if `XDG_CONFIG_HOME` is set, `$XDG_CONFIG_HOME/mediascrape/config.toml`.
/// - Otherwise `~/.config/mediascrape/config.toml`.
///
/// # Errors
///
/// Returns an error if no base directory can be determined.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").context("HOME environment variable is not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(base.join("mediascrape").join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use mediascrape_core::language::resolve;

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.scraper.language, Language::ENGLISH);
        assert!(!config.scraper.title_fallback);
        assert_eq!(config.scraper.fallback(), FallbackSettings::default());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_scraper_section() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[scraper]
language = "pt_BR"
country = "BR"
title_fallback = true
title_fallback_language = "en"
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.scraper.language, resolve("pt-BR").unwrap());
        assert_eq!(config.scraper.country.as_deref(), Some("BR"));
        assert_eq!(
            config.scraper.fallback(),
            FallbackSettings::to(Language::ENGLISH)
        );
        assert_eq!(config.scraper.image_base_url, None);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scraper]\ntitle_fallback = true\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert!(config.scraper.title_fallback);
        assert_eq!(config.scraper.language, Language::ENGLISH);
        assert_eq!(config.scraper.title_fallback_language, Language::ENGLISH);
    }

    #[test]
    fn test_load_unknown_language_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scraper]\nlanguage = \"xx\"\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/srv/media/scraper");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/media/scraper/config.toml"));
    }

    #[test]
    fn test_resolve_default_ends_with_app_dir() {
        // Arrange & Act
        let path = resolve_config_path(None).unwrap();

        // Assert
        assert!(path.ends_with("mediascrape/config.toml"));
    }
}
