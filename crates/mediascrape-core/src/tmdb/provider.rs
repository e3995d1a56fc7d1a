//! TMDB aggregation engine.
//!
//! Every operation issues its primary-language fetches, maps the payloads,
//! and then consults the fallback language at most once per item (or once
//! per season). Primary scrape failures surface as [`ScrapeError::Catalog`];
//! fallback failures are logged and swallowed.

use anyhow::Context;
use async_trait::async_trait;
use mediascrape_api::tmdb::{
    AppendToResponse, SearchMovieParams, SearchTvParams, TmdbApi, TmdbEpisode, TmdbMovieDetails,
    TmdbTvDetails, TmdbTvSeason,
};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::catalog::CatalogHandle;
use crate::config::FallbackSettings;
use crate::error::ScrapeError;
use crate::fallback;
use crate::language::Language;
use crate::model::{ArtworkFilter, MediaKind, MetadataRecord, ScrapeQuery, SearchQuery, SearchResult};
use crate::provider::{MetadataProvider, ProviderInfo};
use crate::score;

use super::PROVIDER_ID;
use super::mapping::{self, DetailOptions, ImageUrls};

const INFO: ProviderInfo = ProviderInfo {
    id: PROVIDER_ID,
    name: "The Movie Database",
    description: "Movies, TV shows and episodes from themoviedb.org",
};

const SHOW_APPENDS: &[AppendToResponse] = &[
    AppendToResponse::Credits,
    AppendToResponse::ExternalIds,
    AppendToResponse::ContentRatings,
];

const MOVIE_APPENDS: &[AppendToResponse] = &[
    AppendToResponse::Credits,
    AppendToResponse::ExternalIds,
    AppendToResponse::ReleaseDates,
];

/// TMDB metadata provider for movies, shows and episodes.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbMetadataProvider<A> {
    catalog: CatalogHandle<A>,
    settings: RwLock<FallbackSettings>,
    images: ImageUrls,
}

impl<A> TmdbMetadataProvider<A> {
    /// Creates a provider owning `api`, with fallback disabled.
    pub fn new(api: A) -> Self {
        Self::with_handle(CatalogHandle::new(api))
    }

    /// Creates a provider sharing an existing catalog handle.
    pub fn with_handle(catalog: CatalogHandle<A>) -> Self {
        Self {
            catalog,
            settings: RwLock::new(FallbackSettings::default()),
            images: ImageUrls::default(),
        }
    }

    /// Sets the image URL builder.
    #[must_use]
    pub fn image_urls(mut self, images: ImageUrls) -> Self {
        self.images = images;
        self
    }

    /// Sets the initial fallback settings.
    #[must_use]
    pub fn fallback(mut self, settings: FallbackSettings) -> Self {
        self.settings = RwLock::new(settings);
        self
    }

    /// Current fallback settings.
    pub async fn fallback_settings(&self) -> FallbackSettings {
        *self.settings.read().await
    }

    /// Replaces the fallback settings for subsequent calls.
    pub async fn set_fallback_settings(&self, settings: FallbackSettings) {
        *self.settings.write().await = settings;
    }

    /// The shared catalog handle.
    pub const fn catalog(&self) -> &CatalogHandle<A> {
        &self.catalog
    }

    fn detail_options<'a>(&'a self, query: &'a ScrapeQuery) -> DetailOptions<'a> {
        DetailOptions {
            country: query.country.as_deref(),
            artwork: query.artwork,
            images: &self.images,
        }
    }
}

impl<A: TmdbApi + Sync> TmdbMetadataProvider<A> {
    // --- plain catalog fetches, one lock each ---

    async fn search_catalog(
        &self,
        query: &SearchQuery,
        language: Language,
    ) -> anyhow::Result<Vec<SearchResult>> {
        let text = query.query.trim();
        let tag = language.tag();
        match query.kind {
            MediaKind::TvShow => {
                let mut params = SearchTvParams::new(text).language(&tag);
                if let Some(year) = query.year {
                    params = params.first_air_date_year(year);
                }
                let response = {
                    let api = self.catalog.lock().await;
                    api.search_tv(&params)
                        .await
                        .with_context(|| format!("TV search for {text:?} in {tag} failed"))?
                };
                Ok(response
                    .results
                    .iter()
                    .map(|raw| mapping::tv_search_result(raw, text, &self.images))
                    .collect())
            }
            MediaKind::Movie => {
                let mut params = SearchMovieParams::new(text).language(&tag);
                if let Some(year) = query.year {
                    params = params.year(year);
                }
                let response = {
                    let api = self.catalog.lock().await;
                    api.search_movie(&params)
                        .await
                        .with_context(|| format!("movie search for {text:?} in {tag} failed"))?
                };
                Ok(response
                    .results
                    .iter()
                    .map(|raw| mapping::movie_search_result(raw, text, &self.images))
                    .collect())
            }
            // Rejected by `search` before any fetch.
            MediaKind::TvEpisode => Ok(Vec::new()),
        }
    }

    async fn fetch_show(
        &self,
        id: u64,
        language: Language,
        append: &[AppendToResponse],
    ) -> anyhow::Result<Option<TmdbTvDetails>> {
        let api = self.catalog.lock().await;
        api.tv_details(id, &language.tag(), append)
            .await
            .with_context(|| format!("TV details {id} in {} failed", language.tag()))
    }

    async fn fetch_movie(
        &self,
        id: u64,
        language: Language,
        append: &[AppendToResponse],
    ) -> anyhow::Result<Option<TmdbMovieDetails>> {
        let api = self.catalog.lock().await;
        api.movie_details(id, &language.tag(), append)
            .await
            .with_context(|| format!("movie details {id} in {} failed", language.tag()))
    }

    async fn fetch_season(
        &self,
        id: u64,
        season: u32,
        language: Language,
    ) -> anyhow::Result<Option<TmdbTvSeason>> {
        let api = self.catalog.lock().await;
        api.tv_season(id, season, &language.tag())
            .await
            .with_context(|| format!("season {season} of {id} in {} failed", language.tag()))
    }

    // --- primary fetch + reconcile ---

    async fn scrape_show(
        &self,
        query: &ScrapeQuery,
        settings: FallbackSettings,
    ) -> Result<MetadataRecord, ScrapeError> {
        let Some(id) = query.resolve_id(PROVIDER_ID) else {
            debug!("no TMDB id to scrape");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let opts = self.detail_options(query);

        let Some(raw) = self.fetch_show(id, query.language, SHOW_APPENDS).await? else {
            debug!(id, "show not found");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let mut md = mapping::tv_show_record(&raw, opts);

        if settings.applies_to(query.language)
            && fallback::record_needs_fallback(&md, query.language)
        {
            debug!(id, fallback = %settings.language.tag(), "show text deficient, trying fallback");
            let candidate = self
                .fetch_show(id, settings.language, &[])
                .await
                .map(|found| found.map(|raw| mapping::tv_show_record(&raw, opts)));
            apply_item_fallback(&mut md, candidate, query.language);
        }
        Ok(md)
    }

    async fn scrape_movie(
        &self,
        query: &ScrapeQuery,
        settings: FallbackSettings,
    ) -> Result<MetadataRecord, ScrapeError> {
        let Some(id) = query.resolve_id(PROVIDER_ID) else {
            debug!("no TMDB id to scrape");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let opts = self.detail_options(query);

        let Some(raw) = self.fetch_movie(id, query.language, MOVIE_APPENDS).await? else {
            debug!(id, "movie not found");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let mut md = mapping::movie_record(&raw, opts);

        if settings.applies_to(query.language)
            && fallback::record_needs_fallback(&md, query.language)
        {
            debug!(id, fallback = %settings.language.tag(), "movie text deficient, trying fallback");
            let candidate = self
                .fetch_movie(id, settings.language, &[])
                .await
                .map(|found| found.map(|raw| mapping::movie_record(&raw, opts)));
            apply_item_fallback(&mut md, candidate, query.language);
        }
        Ok(md)
    }

    async fn scrape_episode(
        &self,
        query: &ScrapeQuery,
        settings: FallbackSettings,
    ) -> Result<MetadataRecord, ScrapeError> {
        let (Some(id), Some(season)) = (query.resolve_id(PROVIDER_ID), query.season) else {
            debug!("episode scrape needs a TMDB id and a season");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let aired = query.metadata.as_ref().and_then(|md| md.release_date);
        if query.episode.is_none() && aired.is_none() {
            debug!("episode scrape needs an episode number or an air date");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        }

        let Some(raw) = self.fetch_season(id, season, query.language).await? else {
            debug!(id, season, "season not found");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let Some(found) = find_episode(&raw.episodes, query.episode, aired) else {
            debug!(id, season, episode = ?query.episode, "episode not found");
            return Ok(MetadataRecord::new(PROVIDER_ID));
        };
        let number = found.episode_number;
        let mut md = mapping::episode_record(found, season, query.artwork, &self.images);

        if settings.applies_to(query.language)
            && fallback::episode_needs_fallback(&md, query.episode)
        {
            debug!(id, season, number, "episode text deficient, trying fallback");
            match self.fetch_season(id, season, settings.language).await {
                Ok(Some(other)) => {
                    match other.episodes.iter().find(|e| e.episode_number == number) {
                        Some(candidate) => {
                            let candidate = mapping::episode_record(
                                candidate,
                                season,
                                ArtworkFilter::All,
                                &self.images,
                            );
                            fallback::patch_episode(&mut md, &candidate, query.episode);
                        }
                        None => debug!(season, number, "fallback season lacks episode"),
                    }
                }
                Ok(None) => debug!(season, "fallback season not found"),
                Err(e) => debug!(error = %e, "fallback unavailable"),
            }
        }
        Ok(md)
    }

    async fn season_episodes(
        &self,
        id: u64,
        season: u32,
        query: &ScrapeQuery,
        settings: FallbackSettings,
    ) -> anyhow::Result<Vec<MetadataRecord>> {
        let Some(raw) = self.fetch_season(id, season, query.language).await? else {
            debug!(id, season, "season not found");
            return Ok(Vec::new());
        };
        let episodes: Vec<MetadataRecord> = raw
            .episodes
            .iter()
            .map(|e| mapping::episode_record(e, season, query.artwork, &self.images))
            .collect();

        if !settings.applies_to(query.language)
            || !episodes
                .iter()
                .any(|e| fallback::episode_needs_fallback(e, None))
        {
            return Ok(episodes);
        }

        debug!(id, season, fallback = %settings.language.tag(), "season has deficient episodes");
        match self.fetch_season(id, season, settings.language).await {
            Ok(Some(other)) => {
                let candidates: Vec<MetadataRecord> = other
                    .episodes
                    .iter()
                    .map(|e| mapping::episode_record(e, season, ArtworkFilter::All, &self.images))
                    .collect();
                Ok(fallback::reconcile_season(episodes, &candidates))
            }
            Ok(None) => {
                debug!(season, "fallback season not found");
                Ok(episodes)
            }
            Err(e) => {
                debug!(error = %e, "fallback unavailable");
                Ok(episodes)
            }
        }
    }
}

/// Merges a fallback fetch outcome into `md`; failures leave `md` untouched.
fn apply_item_fallback(
    md: &mut MetadataRecord,
    candidate: anyhow::Result<Option<MetadataRecord>>,
    requested: Language,
) {
    match candidate {
        Ok(Some(other)) => {
            if fallback::merge_record(md, &other, requested) {
                debug!("record patched from fallback");
            } else {
                debug!("fallback had nothing better");
            }
        }
        Ok(None) => debug!("fallback item not found"),
        Err(e) => debug!(error = %e, "fallback unavailable"),
    }
}

/// Finds an episode by number, else by air date.
fn find_episode(
    episodes: &[TmdbEpisode],
    number: Option<u32>,
    aired: Option<chrono::NaiveDate>,
) -> Option<&TmdbEpisode> {
    number
        .and_then(|n| episodes.iter().find(|e| e.episode_number == n))
        .or_else(|| {
            let aired = aired?;
            episodes
                .iter()
                .find(|e| mapping::parse_date(e.air_date.as_deref()) == Some(aired))
        })
}

#[async_trait]
impl<A: TmdbApi + Sync + 'static> MetadataProvider for TmdbMetadataProvider<A> {
    fn info(&self) -> &ProviderInfo {
        &INFO
    }

    #[instrument(skip_all, fields(kind = %query.kind, language = %query.language.tag()))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ScrapeError> {
        if query.kind == MediaKind::TvEpisode {
            return Err(ScrapeError::UnsupportedMediaKind {
                provider: PROVIDER_ID,
                kind: query.kind,
            });
        }
        if score::normalize(&query.query).is_empty() {
            debug!("empty search query");
            return Ok(Vec::new());
        }
        let settings = self.fallback_settings().await;

        let results = match self.search_catalog(query, query.language).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "search failed");
                return Ok(Vec::new());
            }
        };

        if !settings.applies_to(query.language)
            || !fallback::search_needs_fallback(&results, query.language)
        {
            return Ok(results);
        }

        debug!(fallback = %settings.language.tag(), "untranslated search results");
        match self.search_catalog(query, settings.language).await {
            Ok(other) => Ok(fallback::reconcile_search(results, other, query.language)),
            Err(e) => {
                debug!(error = %e, "fallback unavailable");
                Ok(results)
            }
        }
    }

    #[instrument(skip_all, fields(kind = %query.kind, language = %query.language.tag()))]
    async fn scrape(&self, query: &ScrapeQuery) -> Result<MetadataRecord, ScrapeError> {
        let settings = self.fallback_settings().await;
        match query.kind {
            MediaKind::Movie => self.scrape_movie(query, settings).await,
            MediaKind::TvShow => self.scrape_show(query, settings).await,
            MediaKind::TvEpisode => self.scrape_episode(query, settings).await,
        }
    }

    #[instrument(skip_all, fields(language = %query.language.tag()))]
    async fn episode_list(&self, query: &ScrapeQuery) -> Result<Vec<MetadataRecord>, ScrapeError> {
        if query.kind == MediaKind::Movie {
            return Err(ScrapeError::UnsupportedMediaKind {
                provider: PROVIDER_ID,
                kind: query.kind,
            });
        }
        let Some(id) = query.resolve_id(PROVIDER_ID) else {
            debug!("no TMDB id for episode list");
            return Ok(Vec::new());
        };
        let settings = self.fallback_settings().await;

        let Some(show) = self.fetch_show(id, query.language, &[]).await? else {
            debug!(id, "show not found");
            return Ok(Vec::new());
        };

        let mut episodes = Vec::new();
        for summary in &show.seasons {
            let season = summary.season_number;
            match self.season_episodes(id, season, query, settings).await {
                Ok(found) => episodes.extend(found),
                Err(e) => warn!(id, season, error = %e, "skipping season"),
            }
        }
        debug!(id, count = episodes.len(), "episode list complete");
        Ok(episodes)
    }
}
