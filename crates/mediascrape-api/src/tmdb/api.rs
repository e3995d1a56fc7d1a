//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    AppendToResponse, SearchMovieParams, SearchTvParams, TmdbMovieDetails,
    TmdbSearchMovieResponse, TmdbSearchTvResponse, TmdbTvDetails, TmdbTvSeason,
};

/// TMDB API trait.
///
/// The remote catalog capability consumed by the metadata providers.
/// Detail and season lookups return `Ok(None)` when TMDB answers 404.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implement `TmdbApi` so the futures can cross task boundaries.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Searches for TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TmdbSearchTvResponse>;

    /// Searches for movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbSearchMovieResponse>;

    /// Fetches TV series details, optionally with appended sub-resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(
        &self,
        series_id: u64,
        language: &str,
        append: &[AppendToResponse],
    ) -> Result<Option<TmdbTvDetails>>;

    /// Fetches movie details, optionally with appended sub-resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(
        &self,
        movie_id: u64,
        language: &str,
        append: &[AppendToResponse],
    ) -> Result<Option<TmdbMovieDetails>>;

    /// Fetches TV season details including episode list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<Option<TmdbTvSeason>>;
}
