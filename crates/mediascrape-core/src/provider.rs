//! Metadata provider contract and registry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::ScrapeError;
use crate::model::{MetadataRecord, ScrapeQuery, SearchQuery, SearchResult};

/// Static description of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Unique id, also used as the id namespace of its records.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// Unified metadata provider trait.
///
/// Soft misses (empty query, unresolvable id, unknown item) are returned as
/// empty values. Only a primary catalog failure or a media kind the provider
/// cannot handle is an error.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider description.
    fn info(&self) -> &ProviderInfo;

    /// Searches for items matching the query text.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::UnsupportedMediaKind` for media kinds the
    /// provider cannot search.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ScrapeError>;

    /// Scrapes the full metadata of one item.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Catalog` when the primary fetch fails.
    async fn scrape(&self, query: &ScrapeQuery) -> Result<MetadataRecord, ScrapeError>;

    /// Lists every episode of a show, season by season.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Catalog` when the show itself cannot be
    /// fetched, or `ScrapeError::UnsupportedMediaKind` for non-show providers.
    async fn episode_list(&self, query: &ScrapeQuery) -> Result<Vec<MetadataRecord>, ScrapeError>;
}

/// Explicitly registered providers, kept in registration order.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.info().id))
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider`, replacing an earlier one with the same id in place.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) {
        let id = provider.info().id;
        if let Some(slot) = self.providers.iter_mut().find(|p| p.info().id == id) {
            debug!(provider = id, "replacing registered provider");
            *slot = provider;
        } else {
            debug!(provider = id, "registering provider");
            self.providers.push(provider);
        }
    }

    /// Looks up a provider by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn MetadataProvider>> {
        self.providers.iter().find(|p| p.info().id == id).cloned()
    }

    /// Iterates providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MetadataProvider>> {
        self.providers.iter()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::MediaKind;

    struct Fixed {
        info: ProviderInfo,
    }

    impl Fixed {
        fn new(id: &'static str, name: &'static str) -> Arc<dyn MetadataProvider> {
            Arc::new(Self {
                info: ProviderInfo {
                    id,
                    name,
                    description: "",
                },
            })
        }
    }

    #[async_trait]
    impl MetadataProvider for Fixed {
        fn info(&self) -> &ProviderInfo {
            &self.info
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>, ScrapeError> {
            Ok(Vec::new())
        }

        async fn scrape(&self, _query: &ScrapeQuery) -> Result<MetadataRecord, ScrapeError> {
            Ok(MetadataRecord::new(self.info.id))
        }

        async fn episode_list(
            &self,
            _query: &ScrapeQuery,
        ) -> Result<Vec<MetadataRecord>, ScrapeError> {
            Err(ScrapeError::UnsupportedMediaKind {
                provider: self.info.id,
                kind: MediaKind::TvShow,
            })
        }
    }

    #[test]
    fn test_register_keeps_order() {
        // Arrange
        let mut registry = ProviderRegistry::new();

        // Act
        registry.register(Fixed::new("tmdb-tv", "TV"));
        registry.register(Fixed::new("tmdb-movie", "Movie"));

        // Assert
        let ids: Vec<&str> = registry.iter().map(|p| p.info().id).collect();
        assert_eq!(ids, vec!["tmdb-tv", "tmdb-movie"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_duplicate_replaces_in_place() {
        // Arrange
        let mut registry = ProviderRegistry::new();
        registry.register(Fixed::new("a", "first"));
        registry.register(Fixed::new("b", "other"));

        // Act
        registry.register(Fixed::new("a", "second"));

        // Assert
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().info().name, "second");
        assert_eq!(registry.iter().next().unwrap().info().id, "a");
    }

    #[test]
    fn test_get_unknown_is_none() {
        // Arrange
        let registry = ProviderRegistry::new();

        // Act & Assert
        assert!(registry.get("imdb").is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        // Arrange
        let provider = Fixed::new("a", "A");

        // Act
        let record = provider
            .scrape(&ScrapeQuery::new(MediaKind::Movie))
            .await
            .unwrap();
        let episodes = provider
            .episode_list(&ScrapeQuery::new(MediaKind::TvShow))
            .await;

        // Assert
        assert_eq!(record.provider_id, "a");
        assert!(matches!(
            episodes,
            Err(ScrapeError::UnsupportedMediaKind { provider: "a", .. })
        ));
    }
}
