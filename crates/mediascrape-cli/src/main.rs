//! mediascrape - movie and TV metadata scraper CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use mediascrape_api::tmdb::TmdbClient;
use mediascrape_core::Language;
use mediascrape_core::language::resolve;
use mediascrape_core::model::{MediaKind, MetadataRecord, ScrapeQuery, SearchQuery};
use mediascrape_core::provider::MetadataProvider;
use mediascrape_core::tmdb::{ImageUrls, PROVIDER_ID, TmdbMetadataProvider};
use serde::Serialize;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// Scrape jobs in flight at once during `batch`.
const BATCH_CONCURRENCY: usize = 4;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Enable title fallback for this run.
    #[arg(long, global = true, overrides_with = "no_fallback")]
    fallback: bool,

    /// Disable title fallback for this run.
    #[arg(long, global = true, overrides_with = "fallback")]
    no_fallback: bool,

    /// Fallback language for this run (e.g. "en").
    #[arg(long, global = true, value_parser = parse_language)]
    fallback_language: Option<Language>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies or TV shows by title.
    Search(SearchArgs),
    /// Scrape full metadata of a movie, show or episode.
    Scrape(ScrapeArgs),
    /// List every episode of a show.
    Episodes(EpisodesArgs),
    /// Scrape several movies or shows concurrently.
    Batch(BatchArgs),
}

/// Searchable media kinds.
#[derive(Clone, Copy, ValueEnum)]
enum ItemKind {
    /// Movies.
    Movie,
    /// TV shows.
    Tv,
}

impl From<ItemKind> for MediaKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Movie => Self::Movie,
            ItemKind::Tv => Self::TvShow,
        }
    }
}

/// Scrapable media kinds.
#[derive(Clone, Copy, ValueEnum)]
enum ScrapeKind {
    /// Movie.
    Movie,
    /// TV show.
    Tv,
    /// Single TV episode.
    Episode,
}

impl From<ScrapeKind> for MediaKind {
    fn from(kind: ScrapeKind) -> Self {
        match kind {
            ScrapeKind::Movie => Self::Movie,
            ScrapeKind::Tv => Self::TvShow,
            ScrapeKind::Episode => Self::TvEpisode,
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "Dark").
    #[arg(long, required = true)]
    query: String,
    /// Media kind to search.
    #[arg(long, value_enum)]
    kind: ItemKind,
    /// Result language (default: config, then "en").
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,
    /// Filter by release / first-air year.
    #[arg(long)]
    year: Option<u32>,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `scrape` subcommand.
#[derive(clap::Args)]
struct ScrapeArgs {
    /// TMDB id of the movie or show.
    #[arg(long, required = true)]
    id: u64,
    /// Media kind to scrape.
    #[arg(long, value_enum)]
    kind: ScrapeKind,
    /// Season number (episodes).
    #[arg(long)]
    season: Option<u32>,
    /// Episode number (episodes).
    #[arg(long)]
    episode: Option<u32>,
    /// Known air date, used when the episode number is unknown (YYYY-MM-DD).
    #[arg(long)]
    aired: Option<NaiveDate>,
    /// Certification country (e.g. "DE").
    #[arg(long)]
    country: Option<String>,
    /// Result language (default: config, then "en").
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,
    /// Print JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `episodes` subcommand.
#[derive(clap::Args)]
struct EpisodesArgs {
    /// TMDB id of the show.
    #[arg(long, required = true)]
    id: u64,
    /// Result language (default: config, then "en").
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `batch` subcommand.
#[derive(clap::Args)]
struct BatchArgs {
    /// Comma-separated TMDB ids (e.g. "70523,1399").
    #[arg(long, required = true, value_delimiter = ',')]
    ids: Vec<u64>,
    /// Media kind of every id.
    #[arg(long, value_enum)]
    kind: ItemKind,
    /// Result language (default: config, then "en").
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,
    /// Print JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

/// Parses a `--language` value against the supported set.
fn parse_language(code: &str) -> Result<Language, mediascrape_core::ScrapeError> {
    resolve(code)
}

/// Provider plus the defaults every command starts from.
struct Session {
    /// TMDB provider with fallback settings applied.
    provider: TmdbMetadataProvider<TmdbClient>,
    /// Default result language.
    language: Language,
    /// Default certification country.
    country: Option<String>,
}

impl Session {
    fn scrape_query(&self, kind: MediaKind, id: u64, language: Option<Language>) -> ScrapeQuery {
        let mut query = ScrapeQuery::new(kind)
            .language(language.unwrap_or(self.language))
            .id(PROVIDER_ID, id);
        query.country.clone_from(&self.country);
        query
    }
}

/// Builds a `TmdbClient` from the environment.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Loads the config, applies CLI overrides and builds the provider.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client cannot be built.
#[instrument(skip_all)]
fn open_session(cli: &Cli) -> Result<Session> {
    let config_path =
        resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let mut fallback = config.scraper.fallback();
    if cli.fallback {
        fallback.enabled = true;
    }
    if cli.no_fallback {
        fallback.enabled = false;
    }
    if let Some(language) = cli.fallback_language {
        fallback.language = language;
    }
    tracing::debug!(
        enabled = fallback.enabled,
        language = %fallback.language.tag(),
        "title fallback"
    );

    let mut provider = TmdbMetadataProvider::new(build_tmdb_client()?).fallback(fallback);
    if let Some(base) = &config.scraper.image_base_url {
        provider = provider.image_urls(ImageUrls::new(base.as_str()));
    }

    Ok(Session {
        provider,
        language: config.scraper.language,
        country: config.scraper.country,
    })
}

/// Prints `value` as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Logs a one-record summary.
fn log_record(md: &MetadataRecord) {
    tracing::info!(
        "{} ({})",
        md.title,
        md.year.map_or_else(|| String::from("-"), |y| y.to_string())
    );
    if md.original_title != md.title {
        tracing::info!("Original Title: {}", md.original_title);
    }
    for (namespace, id) in md.ids() {
        tracing::info!("  {namespace}: {id}");
    }
    if let Some(rating) = md.ratings.first() {
        tracing::info!("Rating: {:.1}/10 ({} votes)", rating.value, rating.votes);
    }
    for cert in &md.certifications {
        tracing::info!("Certification {}: {}", cert.country, cert.rating);
    }
    if !md.production_companies.is_empty() {
        tracing::info!("Companies: {}", md.production_companies.join(", "));
    }
    if !md.cast.is_empty() {
        tracing::info!("Cast: {} member(s)", md.cast.len());
    }
    tracing::info!(
        "Plot: {}",
        if md.plot.is_empty() { "-" } else { md.plot.as_str() }
    );
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the provider rejects the query.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, session: &Session) -> Result<()> {
    let mut query = SearchQuery::new(&args.query, args.kind.into())
        .language(args.language.unwrap_or(session.language));
    if let Some(year) = args.year {
        query = query.year(year);
    }

    let results = session
        .provider
        .search(&query)
        .await
        .context("search failed")?;

    if args.json {
        return print_json(&results);
    }

    tracing::info!("ID\tYear\tScore\tTitle");
    for r in &results {
        tracing::info!(
            "{}\t{}\t{:.2}\t{} ({})",
            r.id,
            r.year.map_or_else(|| String::from("-"), |y| y.to_string()),
            r.score,
            r.title,
            r.original_title,
        );
    }
    tracing::info!("Total: {} results", results.len());

    Ok(())
}

impl ScrapeArgs {
    /// Checks argument combinations clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if an episode scrape lacks its season or episode.
    fn validate(&self) -> Result<()> {
        if !matches!(self.kind, ScrapeKind::Episode) {
            return Ok(());
        }
        if self.season.is_none() {
            bail!("--season is required for --kind episode");
        }
        if self.episode.is_none() && self.aired.is_none() {
            bail!("--episode or --aired is required for --kind episode");
        }
        Ok(())
    }
}

/// Runs the `scrape` subcommand.
///
/// # Errors
///
/// Returns an error if the scrape fails.
#[instrument(skip_all)]
async fn run_scrape(args: &ScrapeArgs, session: &Session) -> Result<()> {
    let mut query = session.scrape_query(args.kind.into(), args.id, args.language);
    if let Some(country) = &args.country {
        query.country = Some(country.clone());
    }

    if matches!(args.kind, ScrapeKind::Episode) {
        query.season = args.season;
        query.episode = args.episode;
        if let Some(aired) = args.aired {
            let mut known = MetadataRecord::new(PROVIDER_ID);
            known.set_release_date(Some(aired));
            query.metadata = Some(known);
        }
    }

    let md = session
        .provider
        .scrape(&query)
        .await
        .with_context(|| format!("scrape of {} failed", args.id))?;

    if args.json {
        return print_json(&md);
    }
    if md.is_empty() {
        tracing::warn!("Nothing found for id {}", args.id);
        return Ok(());
    }
    log_record(&md);

    Ok(())
}

/// Runs the `episodes` subcommand.
///
/// # Errors
///
/// Returns an error if the show cannot be fetched.
#[instrument(skip_all)]
async fn run_episodes(args: &EpisodesArgs, session: &Session) -> Result<()> {
    let query = session.scrape_query(MediaKind::TvShow, args.id, args.language);

    let episodes = session
        .provider
        .episode_list(&query)
        .await
        .with_context(|| format!("episode list of {} failed", args.id))?;

    if args.json {
        return print_json(&episodes);
    }

    for ep in &episodes {
        tracing::info!(
            "  S{:02}E{:02}: {} (air_date: {})",
            ep.season_number.unwrap_or_default(),
            ep.episode_number.unwrap_or_default(),
            ep.title,
            ep.release_date
                .map_or_else(|| String::from("-"), |d| d.to_string()),
        );
    }
    tracing::info!("Total: {} episodes", episodes.len());

    Ok(())
}

/// Runs the `batch` subcommand.
///
/// Scrapes at most `BATCH_CONCURRENCY` ids at a time; every job shares the
/// same provider and therefore the same serialized catalog client.
///
/// # Errors
///
/// Returns an error if any scrape failed.
#[instrument(skip_all)]
async fn run_batch(args: &BatchArgs, session: &Session) -> Result<()> {
    let kind: MediaKind = args.kind.into();
    let outcomes: Vec<(u64, Result<MetadataRecord, mediascrape_core::ScrapeError>)> =
        futures::stream::iter(args.ids.iter().copied())
            .map(|id| {
                let query = session.scrape_query(kind, id, args.language);
                async move { (id, session.provider.scrape(&query).await) }
            })
            .buffer_unordered(BATCH_CONCURRENCY)
            .collect()
            .await;

    let mut records = Vec::with_capacity(outcomes.len());
    let mut failed: usize = 0;
    for (id, outcome) in outcomes {
        match outcome {
            Ok(md) if md.is_empty() => tracing::warn!(id, "nothing found"),
            Ok(md) => {
                tracing::info!(id, title = %md.title, "scraped");
                records.push(md);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "scrape failed");
                failed = failed.saturating_add(1);
            }
        }
    }

    if args.json {
        print_json(&records)?;
    }
    tracing::info!("Total: {} scraped, {} failed", records.len(), failed);

    if failed > 0 {
        bail!("{failed} of {} scrapes failed", args.ids.len());
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    if let Commands::Scrape(args) = &cli.command {
        args.validate()?;
    }
    let session = open_session(&cli)?;
    match &cli.command {
        Commands::Search(args) => run_search(args, &session).await,
        Commands::Scrape(args) => run_scrape(args, &session).await,
        Commands::Episodes(args) => run_episodes(args, &session).await,
        Commands::Batch(args) => run_batch(args, &session).await,
    }
}
