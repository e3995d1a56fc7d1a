//! Remote catalog clients for mediascrape.
//!
//! Provides the TMDB API client and its raw response types.

/// TMDB API client.
pub mod tmdb;
