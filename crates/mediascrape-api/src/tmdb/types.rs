//! TMDB API response types and request parameters.

use serde::Deserialize;

// --- Search TV ---

/// Response from `search/tv` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchTvResponse {
    /// Current page number.
    pub page: u32,
    /// Search results.
    #[serde(default)]
    pub results: Vec<TmdbTvSearchResult>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single TV series search result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbTvSearchResult {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    #[serde(default)]
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// First air date (YYYY-MM-DD, empty or null when unknown).
    pub first_air_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- Search Movie ---

/// Response from `search/movie` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchMovieResponse {
    /// Current page number.
    pub page: u32,
    /// Search results.
    #[serde(default)]
    pub results: Vec<TmdbMovieSearchResult>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie search result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieSearchResult {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- Appended sub-responses ---

/// `credits` block appended to a details response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    /// Cast members in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

/// A cast member (also used for episode guest stars).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    #[serde(default)]
    pub name: String,
    /// Character played.
    pub character: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
    /// Billing order.
    pub order: Option<u32>,
}

/// `external_ids` block appended to a details response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbExternalIds {
    /// IMDb ID (e.g. "tt0944947").
    pub imdb_id: Option<String>,
    /// TheTVDB ID.
    pub tvdb_id: Option<u64>,
    /// `TVRage` ID.
    pub tvrage_id: Option<u64>,
}

/// `content_ratings` block appended to TV details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbContentRatings {
    /// Per-country ratings.
    #[serde(default)]
    pub results: Vec<TmdbContentRating>,
}

/// A single TV content rating.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbContentRating {
    /// Country (ISO 3166-1).
    pub iso_3166_1: String,
    /// Rating string (e.g. "TV-MA").
    #[serde(default)]
    pub rating: String,
}

/// `release_dates` block appended to movie details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbReleaseDates {
    /// Per-country release entries.
    #[serde(default)]
    pub results: Vec<TmdbCountryReleases>,
}

/// Releases of a movie in one country.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCountryReleases {
    /// Country (ISO 3166-1).
    pub iso_3166_1: String,
    /// Individual releases.
    #[serde(default)]
    pub release_dates: Vec<TmdbRelease>,
}

/// A single movie release.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbRelease {
    /// Certification string (may be empty).
    #[serde(default)]
    pub certification: String,
    /// Release date (ISO 8601 timestamp).
    pub release_date: Option<String>,
}

/// Production company entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    #[serde(default)]
    pub name: String,
}

/// Genre entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- TV Details ---

/// Response from `tv/{series_id}` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbTvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    #[serde(default)]
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Last air date.
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Season summaries.
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
    /// Status (e.g., "Returning Series", "Ended").
    pub status: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<TmdbCompany>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Appended credits.
    pub credits: Option<TmdbCredits>,
    /// Appended external IDs.
    pub external_ids: Option<TmdbExternalIds>,
    /// Appended content ratings.
    pub content_ratings: Option<TmdbContentRatings>,
}

/// Season summary within TV details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbSeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Number of episodes in this season.
    #[serde(default)]
    pub episode_count: u32,
    /// Air date of this season.
    pub air_date: Option<String>,
    /// Season name.
    #[serde(default)]
    pub name: String,
}

// --- Movie Details ---

/// Response from `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// IMDb ID (movies carry it at the top level).
    pub imdb_id: Option<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Status (e.g., "Released").
    pub status: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<TmdbCompany>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Appended credits.
    pub credits: Option<TmdbCredits>,
    /// Appended external IDs.
    pub external_ids: Option<TmdbExternalIds>,
    /// Appended release dates (certifications).
    pub release_dates: Option<TmdbReleaseDates>,
}

// --- TV Season Details ---

/// Response from `tv/{series_id}/season/{season_number}` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbTvSeason {
    /// Internal `MongoDB` ID.
    #[serde(rename = "_id", default)]
    pub internal_id: Option<String>,
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Season overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Episodes in this season.
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

/// A single episode within a season.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbEpisode {
    /// TMDB episode ID.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode name.
    #[serde(default)]
    pub name: String,
    /// Episode overview.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Season number.
    pub season_number: u32,
    /// Parent show ID.
    #[serde(default)]
    pub show_id: u64,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Vote average.
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u32>,
    /// Still image path.
    pub still_path: Option<String>,
    /// Guest stars.
    #[serde(default)]
    pub guest_stars: Vec<TmdbCastMember>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    pub success: bool,
}

// --- Request Parameters ---

/// Sub-resources that can be folded into a details response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendToResponse {
    /// Cast and crew.
    Credits,
    /// IMDb / TVDB / `TVRage` identifiers.
    ExternalIds,
    /// TV content ratings.
    ContentRatings,
    /// Movie release dates with certifications.
    ReleaseDates,
}

impl AppendToResponse {
    /// Returns the TMDB wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credits => "credits",
            Self::ExternalIds => "external_ids",
            Self::ContentRatings => "content_ratings",
            Self::ReleaseDates => "release_dates",
        }
    }

    /// Joins items into the comma-separated `append_to_response` value.
    #[must_use]
    pub fn join(items: &[Self]) -> String {
        items
            .iter()
            .map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parameters for `search/tv` endpoint.
#[derive(Debug, Clone)]
pub struct SearchTvParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by first air date year.
    pub first_air_date_year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchTvParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            first_air_date_year: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the first air date year filter.
    #[must_use]
    pub const fn first_air_date_year(mut self, year: u32) -> Self {
        self.first_air_date_year = Some(year);
        self
    }
}

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by year.
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            year: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}
