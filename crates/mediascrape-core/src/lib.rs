//! Metadata aggregation and language fallback for movies and TV shows.
//!
//! Providers map catalog payloads into one model and repair untranslated or
//! placeholder text from a configured fallback language.

/// Serialized catalog client handle.
pub mod catalog;
/// Fallback settings.
pub mod config;
/// Provider boundary error.
pub mod error;
/// Fallback reconciliation rules.
pub mod fallback;
/// Supported languages.
pub mod language;
/// Normalized metadata model.
pub mod model;
/// Provider contract and registry.
pub mod provider;
/// Text normalization and similarity.
pub mod score;
/// TMDB provider.
pub mod tmdb;

pub use error::ScrapeError;
pub use language::Language;
