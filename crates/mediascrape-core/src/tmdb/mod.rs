//! TMDB metadata provider.
//!
//! Wraps a [`TmdbApi`](mediascrape_api::tmdb::TmdbApi) catalog client and
//! exposes it through the [`MetadataProvider`](crate::provider::MetadataProvider)
//! contract with language fallback applied.

mod mapping;
#[cfg(test)]
mod mock;
mod provider;

/// Provider id and id namespace of TMDB records.
pub const PROVIDER_ID: &str = "tmdb";

pub use mapping::{DEFAULT_IMAGE_BASE_URL, ImageUrls, parse_date};
#[allow(clippy::module_name_repetitions)]
pub use provider::TmdbMetadataProvider;
