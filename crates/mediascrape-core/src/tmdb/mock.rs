//! In-memory TMDB catalog that records every call.
#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, bail};
use mediascrape_api::tmdb::{
    AppendToResponse, SearchMovieParams, SearchTvParams, TmdbApi, TmdbMovieDetails,
    TmdbMovieSearchResult, TmdbSearchMovieResponse, TmdbSearchTvResponse, TmdbTvDetails,
    TmdbTvSearchResult, TmdbTvSeason,
};

/// A recorded catalog request; the last field is always the language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SearchTv(String),
    SearchMovie(String),
    TvDetails(u64, String),
    MovieDetails(u64, String),
    TvSeason(u64, u32, String),
}

#[derive(Debug, Default)]
pub struct MockTmdb {
    tv_search: HashMap<String, Vec<TmdbTvSearchResult>>,
    movie_search: HashMap<String, Vec<TmdbMovieSearchResult>>,
    tv_details: HashMap<String, TmdbTvDetails>,
    movie_details: HashMap<String, TmdbMovieDetails>,
    seasons: HashMap<(u64, u32, String), TmdbTvSeason>,
    failing_languages: HashSet<String>,
    failing_seasons: HashSet<u32>,
    calls: Mutex<Vec<Call>>,
}

impl MockTmdb {
    pub fn with_tv_search(mut self, language: &str, results: Vec<TmdbTvSearchResult>) -> Self {
        self.tv_search.insert(String::from(language), results);
        self
    }

    pub fn with_movie_search(
        mut self,
        language: &str,
        results: Vec<TmdbMovieSearchResult>,
    ) -> Self {
        self.movie_search.insert(String::from(language), results);
        self
    }

    pub fn with_tv_details(mut self, language: &str, details: TmdbTvDetails) -> Self {
        self.tv_details.insert(String::from(language), details);
        self
    }

    pub fn with_movie_details(mut self, language: &str, details: TmdbMovieDetails) -> Self {
        self.movie_details.insert(String::from(language), details);
        self
    }

    pub fn with_season(mut self, show_id: u64, language: &str, season: TmdbTvSeason) -> Self {
        self.seasons.insert(
            (show_id, season.season_number, String::from(language)),
            season,
        );
        self
    }

    /// Every request in `language` fails.
    pub fn failing_language(mut self, language: &str) -> Self {
        self.failing_languages.insert(String::from(language));
        self
    }

    /// Every request for season `number` fails.
    pub fn failing_season(mut self, number: u32) -> Self {
        self.failing_seasons.insert(number);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, language: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing_languages.contains(language) {
            bail!("connection reset ({language})");
        }
        Ok(())
    }
}

impl TmdbApi for MockTmdb {
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TmdbSearchTvResponse> {
        self.record(Call::SearchTv(params.language.clone()), &params.language)?;
        let results = self
            .tv_search
            .get(&params.language)
            .cloned()
            .unwrap_or_default();
        Ok(TmdbSearchTvResponse {
            page: 1,
            total_pages: 1,
            total_results: u32::try_from(results.len()).unwrap(),
            results,
        })
    }

    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbSearchMovieResponse> {
        self.record(Call::SearchMovie(params.language.clone()), &params.language)?;
        let results = self
            .movie_search
            .get(&params.language)
            .cloned()
            .unwrap_or_default();
        Ok(TmdbSearchMovieResponse {
            page: 1,
            total_pages: 1,
            total_results: u32::try_from(results.len()).unwrap(),
            results,
        })
    }

    async fn tv_details(
        &self,
        series_id: u64,
        language: &str,
        _append: &[AppendToResponse],
    ) -> Result<Option<TmdbTvDetails>> {
        self.record(Call::TvDetails(series_id, String::from(language)), language)?;
        Ok(self
            .tv_details
            .get(language)
            .filter(|d| d.id == series_id)
            .cloned())
    }

    async fn movie_details(
        &self,
        movie_id: u64,
        language: &str,
        _append: &[AppendToResponse],
    ) -> Result<Option<TmdbMovieDetails>> {
        self.record(Call::MovieDetails(movie_id, String::from(language)), language)?;
        Ok(self
            .movie_details
            .get(language)
            .filter(|d| d.id == movie_id)
            .cloned())
    }

    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<Option<TmdbTvSeason>> {
        self.record(
            Call::TvSeason(series_id, season_number, String::from(language)),
            language,
        )?;
        if self.failing_seasons.contains(&season_number) {
            bail!("season {season_number} payload malformed");
        }
        Ok(self
            .seasons
            .get(&(series_id, season_number, String::from(language)))
            .cloned())
    }
}
