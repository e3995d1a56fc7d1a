//! Error type returned across the provider boundary.

use crate::model::MediaKind;

/// Failures a caller can observe from a metadata provider.
///
/// Soft misses (no id, empty query, nothing found) are not errors; they come
/// back as empty results. Failures of a fallback-language fetch never surface
/// here either.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ScrapeError {
    /// Language code outside the supported set.
    #[error("unknown language code: {0:?}")]
    UnknownLanguage(String),

    /// The provider cannot handle this media kind for the requested operation.
    #[error("provider {provider} does not support media kind {kind}")]
    UnsupportedMediaKind {
        /// Provider id.
        provider: &'static str,
        /// Requested media kind.
        kind: MediaKind,
    },

    /// Transport or decoding failure on a primary-language fetch.
    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_unsupported_media_kind_display() {
        // Arrange
        let err = ScrapeError::UnsupportedMediaKind {
            provider: "tmdb",
            kind: MediaKind::TvEpisode,
        };

        // Act & Assert
        assert_eq!(
            err.to_string(),
            "provider tmdb does not support media kind tv-episode"
        );
    }

    #[test]
    fn test_catalog_error_is_transparent() {
        // Arrange
        let err = ScrapeError::from(anyhow!("TMDB API error (HTTP 500)"));

        // Act & Assert
        assert_eq!(err.to_string(), "TMDB API error (HTTP 500)");
    }

    #[test]
    fn test_unknown_language_display() {
        // Arrange & Act & Assert
        assert_eq!(
            ScrapeError::UnknownLanguage(String::from("xx")).to_string(),
            "unknown language code: \"xx\""
        );
    }
}
