//! Provider-independent metadata model.
//!
//! Every provider maps its native payloads into these types. Text fields
//! default to empty strings, never `None`, so merge code can compare them
//! directly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Id namespace of IMDb.
pub const IMDB: &str = "imdb";
/// Id namespace of TheTVDB.
pub const TVDB: &str = "tvdb";
/// Id namespace of `TVRage`.
pub const TVRAGE: &str = "tvrage";

/// Rating scale every [`MediaRating`] is normalized to.
pub const RATING_SCALE: f64 = 10.0;

/// Kind of media a query or record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// Feature film.
    Movie,
    /// TV series as a whole.
    TvShow,
    /// Single episode of a TV series.
    TvEpisode,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Movie => "movie",
            Self::TvShow => "tv-show",
            Self::TvEpisode => "tv-episode",
        })
    }
}

/// Artwork categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    /// Cover / poster.
    Poster,
    /// Backdrop / fanart.
    Background,
    /// Episode still.
    Thumb,
}

/// Which artwork a scrape should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkFilter {
    /// Every kind.
    #[default]
    All,
    /// A single kind.
    Only(ArtworkKind),
}

impl ArtworkFilter {
    /// Whether artwork of `kind` passes the filter.
    #[must_use]
    pub fn allows(self, kind: ArtworkKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

/// Free-text search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw query text.
    pub query: String,
    /// Media kind to search for.
    pub kind: MediaKind,
    /// Requested result language.
    pub language: Language,
    /// Optional release / first-air year filter.
    pub year: Option<u32>,
}

impl SearchQuery {
    /// Creates a query in the default language.
    pub fn new(query: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            query: query.into(),
            kind,
            language: Language::default(),
            year: None,
        }
    }

    /// Sets the requested language.
    #[must_use]
    pub const fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}

/// One entry of a search result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Id of the provider that produced the entry.
    pub provider_id: String,
    /// Provider-native id of the item.
    pub id: String,
    /// Media kind.
    pub kind: MediaKind,
    /// Localized title.
    pub title: String,
    /// Title in the original language.
    pub original_title: String,
    /// Original language as declared by the catalog (ISO 639-1).
    pub original_language: String,
    /// Poster URL.
    pub poster_url: Option<String>,
    /// Release / first-air year.
    pub year: Option<i32>,
    /// Similarity of the title to the query text, 0.0 to 1.0.
    pub score: f64,
}

/// Scrape request for a single item, or for an episode list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeQuery {
    /// Media kind to scrape.
    pub kind: MediaKind,
    /// Requested result language.
    pub language: Language,
    /// Country used to select certifications (ISO 3166-1).
    pub country: Option<String>,
    /// Known external ids, keyed by namespace.
    pub ids: BTreeMap<String, String>,
    /// Search result the scrape was started from.
    pub result: Option<SearchResult>,
    /// Season number (episodes).
    pub season: Option<u32>,
    /// Episode number (episodes).
    pub episode: Option<u32>,
    /// Previously known metadata, used to match an episode by air date.
    pub metadata: Option<MetadataRecord>,
    /// Artwork kinds to keep.
    pub artwork: ArtworkFilter,
}

impl ScrapeQuery {
    /// Creates an empty query in the default language.
    #[must_use]
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            language: Language::default(),
            country: None,
            ids: BTreeMap::new(),
            result: None,
            season: None,
            episode: None,
            metadata: None,
            artwork: ArtworkFilter::All,
        }
    }

    /// Sets the requested language.
    #[must_use]
    pub const fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Records a known id.
    #[must_use]
    pub fn id(mut self, namespace: &str, value: impl ToString) -> Self {
        self.ids.insert(String::from(namespace), value.to_string());
        self
    }

    /// Starts the scrape from a prior search result.
    #[must_use]
    pub fn from_result(mut self, result: SearchResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Targets a single episode.
    #[must_use]
    pub const fn episode(mut self, season: u32, episode: u32) -> Self {
        self.season = Some(season);
        self.episode = Some(episode);
        self
    }

    /// Resolves the numeric id for `namespace`.
    ///
    /// The id embedded in a prior search result from the same provider wins
    /// over the explicit id map. Zero, unparsable and absent values all mean
    /// "cannot resolve".
    #[must_use]
    pub fn resolve_id(&self, namespace: &str) -> Option<u64> {
        let from_result = self
            .result
            .as_ref()
            .filter(|result| result.provider_id == namespace)
            .and_then(|result| result.id.trim().parse::<u64>().ok())
            .filter(|id| *id != 0);

        from_result.or_else(|| {
            self.ids
                .get(namespace)
                .and_then(|id| id.trim().parse::<u64>().ok())
                .filter(|id| *id != 0)
        })
    }
}

/// A rating from one source, normalized to a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRating {
    /// Rating source (e.g. "tmdb").
    pub source: String,
    /// Rating value on the 0-10 scale.
    pub value: f64,
    /// Number of votes.
    pub votes: u32,
    /// Declared maximum, always [`RATING_SCALE`] after construction.
    pub max_value: f64,
}

impl MediaRating {
    /// Creates a rating declared on a `0..=max_value` scale.
    #[must_use]
    pub fn new(source: impl Into<String>, value: f64, votes: u32, max_value: f64) -> Self {
        let value = if max_value > 0.0 {
            value * RATING_SCALE / max_value
        } else {
            value
        };
        Self {
            source: source.into(),
            value,
            votes,
            max_value: RATING_SCALE,
        }
    }
}

/// Role of a cast member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    /// Regular cast.
    Actor,
    /// Episode guest.
    GuestStar,
}

/// A credited person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person name.
    pub name: String,
    /// Character played.
    pub character: String,
    /// Role.
    pub kind: CastKind,
}

/// An artwork reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Artwork category.
    pub kind: ArtworkKind,
    /// Small preview URL.
    pub preview_url: String,
    /// Full-size URL.
    pub url: String,
    /// Language of any text in the image.
    pub language: Option<String>,
    /// Id of the item at the source.
    pub source_id: Option<u64>,
}

/// Age certification for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// Country (ISO 3166-1).
    pub country: String,
    /// Rating string as issued in that country.
    pub rating: String,
}

/// Full metadata of a movie, show, or episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Id of the provider that produced the record.
    pub provider_id: String,
    /// External ids, one per namespace.
    ids: BTreeMap<String, String>,
    /// Localized title.
    pub title: String,
    /// Title in the original language.
    pub original_title: String,
    /// Original language as declared by the catalog (ISO 639-1).
    pub original_language: String,
    /// Plot / overview.
    pub plot: String,
    /// Release or first-air date.
    pub release_date: Option<NaiveDate>,
    /// Release or first-air year.
    pub year: Option<i32>,
    /// Ratings in insertion order.
    pub ratings: Vec<MediaRating>,
    /// Cast in billing order.
    pub cast: Vec<CastMember>,
    /// Artwork in insertion order.
    pub artwork: Vec<Artwork>,
    /// Certifications in insertion order.
    pub certifications: Vec<Certification>,
    /// Genre names, deduplicated.
    pub genres: Vec<String>,
    /// Production companies, deduplicated.
    pub production_companies: Vec<String>,
    /// Production status (shows and movies).
    pub status: Option<String>,
    /// Season number when the record is an episode.
    pub season_number: Option<u32>,
    /// Episode number when the record is an episode.
    pub episode_number: Option<u32>,
}

impl MetadataRecord {
    /// Creates an empty record for `provider_id`.
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            ..Self::default()
        }
    }

    /// Sets the id for `namespace`, replacing any earlier value.
    ///
    /// Blank values and the numeric id `0` are ignored.
    pub fn set_id(&mut self, namespace: &str, value: impl ToString) {
        let value = value.to_string();
        let value = value.trim();
        if value.is_empty() || value == "0" {
            return;
        }
        self.ids.insert(String::from(namespace), String::from(value));
    }

    /// Returns the id for `namespace`.
    #[must_use]
    pub fn id(&self, namespace: &str) -> Option<&str> {
        self.ids.get(namespace).map(String::as_str)
    }

    /// All ids keyed by namespace.
    #[must_use]
    pub const fn ids(&self) -> &BTreeMap<String, String> {
        &self.ids
    }

    /// Sets the release date and derives the year from it.
    pub fn set_release_date(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.year = Some(date.year());
        }
        self.release_date = date;
    }

    /// Appends a rating.
    pub fn add_rating(&mut self, rating: MediaRating) {
        self.ratings.push(rating);
    }

    /// Appends a cast member.
    pub fn add_cast_member(&mut self, member: CastMember) {
        self.cast.push(member);
    }

    /// Appends an artwork entry.
    pub fn add_artwork(&mut self, artwork: Artwork) {
        self.artwork.push(artwork);
    }

    /// Appends a certification.
    pub fn add_certification(&mut self, certification: Certification) {
        self.certifications.push(certification);
    }

    /// Appends a genre unless it is blank or already listed.
    pub fn add_genre(&mut self, name: &str) {
        push_unique(&mut self.genres, name);
    }

    /// Appends a production company unless it is blank or already listed.
    pub fn add_production_company(&mut self, name: &str) {
        push_unique(&mut self.production_companies, name);
    }

    /// True when nothing was scraped into the record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.title.is_empty() && self.plot.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if name.is_empty() || list.iter().any(|c| c == name) {
        return;
    }
    list.push(String::from(name));
}
