//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and returns the raw
//! search, details, and season payloads consumed by the metadata providers.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    AppendToResponse, SearchMovieParams, SearchTvParams, TmdbCastMember, TmdbCompany,
    TmdbContentRating, TmdbContentRatings, TmdbCountryReleases, TmdbCredits, TmdbEpisode,
    TmdbExternalIds, TmdbGenre, TmdbMovieDetails, TmdbMovieSearchResult, TmdbRelease,
    TmdbReleaseDates, TmdbSearchMovieResponse, TmdbSearchTvResponse, TmdbSeasonSummary,
    TmdbTvDetails, TmdbTvSearchResult, TmdbTvSeason,
};
