//! Raw TMDB payload to metadata model mapping.

use chrono::NaiveDate;
use mediascrape_api::tmdb::{
    TmdbCastMember, TmdbContentRatings, TmdbEpisode, TmdbExternalIds, TmdbMovieDetails,
    TmdbMovieSearchResult, TmdbReleaseDates, TmdbTvDetails, TmdbTvSearchResult,
};

use crate::model::{
    Artwork, ArtworkFilter, ArtworkKind, CastKind, CastMember, Certification, IMDB, MediaKind,
    MediaRating, MetadataRecord, SearchResult, TVDB, TVRAGE,
};
use crate::score;

use super::PROVIDER_ID;

/// Default TMDB image host.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Builds image URLs from TMDB file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageUrls {
    /// Creates a builder for `base`, with or without a trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// URL of `path` rendered at `size` (`w185`, `original`, ...).
    #[must_use]
    pub fn url(&self, size: &str, path: &str) -> String {
        format!("{}{size}{path}", self.base)
    }

    fn artwork(
        &self,
        kind: ArtworkKind,
        path: Option<&str>,
        sizes: (&str, &str),
        source_id: u64,
    ) -> Option<Artwork> {
        let path = path.filter(|p| !p.is_empty())?;
        Some(Artwork {
            kind,
            preview_url: self.url(sizes.0, path),
            url: self.url(sizes.1, path),
            language: None,
            source_id: Some(source_id),
        })
    }

    fn poster(&self, path: Option<&str>, source_id: u64) -> Option<Artwork> {
        self.artwork(ArtworkKind::Poster, path, ("w185", "w342"), source_id)
    }

    fn background(&self, path: Option<&str>, source_id: u64) -> Option<Artwork> {
        self.artwork(ArtworkKind::Background, path, ("w300", "original"), source_id)
    }

    fn thumb(&self, path: Option<&str>, source_id: u64) -> Option<Artwork> {
        self.artwork(ArtworkKind::Thumb, path, ("w300", "original"), source_id)
    }
}

/// Parses a TMDB date (`YYYY-MM-DD`, possibly a full timestamp).
///
/// Empty strings, which TMDB sends for unknown dates, yield `None`.
#[must_use]
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn year_of(raw: Option<&str>) -> Option<i32> {
    parse_date(raw).map(|d| chrono::Datelike::year(&d))
}

/// Maps a TV search hit.
#[must_use]
pub fn tv_search_result(raw: &TmdbTvSearchResult, query: &str, images: &ImageUrls) -> SearchResult {
    SearchResult {
        provider_id: String::from(PROVIDER_ID),
        id: raw.id.to_string(),
        kind: MediaKind::TvShow,
        title: raw.name.clone(),
        original_title: raw.original_name.clone(),
        original_language: raw.original_language.clone(),
        poster_url: raw
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| images.url("w342", p)),
        year: year_of(raw.first_air_date.as_deref()),
        score: score::similarity(query, &raw.name),
    }
}

/// Maps a movie search hit.
#[must_use]
pub fn movie_search_result(
    raw: &TmdbMovieSearchResult,
    query: &str,
    images: &ImageUrls,
) -> SearchResult {
    SearchResult {
        provider_id: String::from(PROVIDER_ID),
        id: raw.id.to_string(),
        kind: MediaKind::Movie,
        title: raw.title.clone(),
        original_title: raw.original_title.clone(),
        original_language: raw.original_language.clone(),
        poster_url: raw
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| images.url("w342", p)),
        year: year_of(raw.release_date.as_deref()),
        score: score::similarity(query, &raw.title),
    }
}

/// Options shared by the detail mappers.
#[derive(Debug, Clone, Copy)]
pub struct DetailOptions<'a> {
    /// Country whose certifications are kept; all when `None`.
    pub country: Option<&'a str>,
    /// Artwork kinds to keep.
    pub artwork: ArtworkFilter,
    /// Image URL builder.
    pub images: &'a ImageUrls,
}

fn set_external_ids(md: &mut MetadataRecord, ids: Option<&TmdbExternalIds>) {
    let Some(ids) = ids else { return };
    if let Some(imdb) = &ids.imdb_id {
        md.set_id(IMDB, imdb);
    }
    if let Some(tvdb) = ids.tvdb_id {
        md.set_id(TVDB, tvdb);
    }
    if let Some(tvrage) = ids.tvrage_id {
        md.set_id(TVRAGE, tvrage);
    }
}

fn cast_members(cast: &[TmdbCastMember], kind: CastKind) -> impl Iterator<Item = CastMember> + '_ {
    cast.iter().map(move |c| CastMember {
        name: c.name.clone(),
        character: c.character.clone().unwrap_or_default(),
        kind,
    })
}

fn country_matches(country: Option<&str>, candidate: &str) -> bool {
    country.is_none_or(|c| c.eq_ignore_ascii_case(candidate))
}

fn tv_certifications(
    ratings: Option<&TmdbContentRatings>,
    country: Option<&str>,
) -> Vec<Certification> {
    ratings
        .map(|r| r.results.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|r| country_matches(country, &r.iso_3166_1) && !r.rating.trim().is_empty())
        .map(|r| Certification {
            country: r.iso_3166_1.clone(),
            rating: r.rating.trim().to_owned(),
        })
        .collect()
}

fn movie_certifications(
    releases: Option<&TmdbReleaseDates>,
    country: Option<&str>,
) -> Vec<Certification> {
    releases
        .map(|r| r.results.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|r| country_matches(country, &r.iso_3166_1))
        .filter_map(|r| {
            let rating = r
                .release_dates
                .iter()
                .map(|d| d.certification.trim())
                .find(|c| !c.is_empty())?;
            Some(Certification {
                country: r.iso_3166_1.clone(),
                rating: rating.to_owned(),
            })
        })
        .collect()
}

fn push_artwork(md: &mut MetadataRecord, filter: ArtworkFilter, artwork: Option<Artwork>) {
    if let Some(artwork) = artwork.filter(|a| filter.allows(a.kind)) {
        md.add_artwork(artwork);
    }
}

/// Maps TV show details.
#[must_use]
pub fn tv_show_record(raw: &TmdbTvDetails, opts: DetailOptions<'_>) -> MetadataRecord {
    let mut md = MetadataRecord::new(PROVIDER_ID);
    md.set_id(PROVIDER_ID, raw.id);
    set_external_ids(&mut md, raw.external_ids.as_ref());

    md.title.clone_from(&raw.name);
    md.original_title.clone_from(&raw.original_name);
    md.original_language.clone_from(&raw.original_language);
    md.plot = raw.overview.clone().unwrap_or_default();
    md.set_release_date(parse_date(raw.first_air_date.as_deref()));
    md.status.clone_from(&raw.status);
    md.add_rating(MediaRating::new(
        PROVIDER_ID,
        raw.vote_average,
        raw.vote_count,
        10.0,
    ));

    push_artwork(&mut md, opts.artwork, opts.images.poster(raw.poster_path.as_deref(), raw.id));
    push_artwork(
        &mut md,
        opts.artwork,
        opts.images.background(raw.backdrop_path.as_deref(), raw.id),
    );

    for genre in &raw.genres {
        md.add_genre(&genre.name);
    }
    for company in &raw.production_companies {
        md.add_production_company(&company.name);
    }
    if let Some(credits) = &raw.credits {
        for member in cast_members(&credits.cast, CastKind::Actor) {
            md.add_cast_member(member);
        }
    }
    for cert in tv_certifications(raw.content_ratings.as_ref(), opts.country) {
        md.add_certification(cert);
    }
    md
}

/// Maps movie details.
#[must_use]
pub fn movie_record(raw: &TmdbMovieDetails, opts: DetailOptions<'_>) -> MetadataRecord {
    let mut md = MetadataRecord::new(PROVIDER_ID);
    md.set_id(PROVIDER_ID, raw.id);
    if let Some(imdb) = &raw.imdb_id {
        md.set_id(IMDB, imdb);
    }
    set_external_ids(&mut md, raw.external_ids.as_ref());

    md.title.clone_from(&raw.title);
    md.original_title.clone_from(&raw.original_title);
    md.original_language.clone_from(&raw.original_language);
    md.plot = raw.overview.clone().unwrap_or_default();
    md.set_release_date(parse_date(raw.release_date.as_deref()));
    md.status.clone_from(&raw.status);
    md.add_rating(MediaRating::new(
        PROVIDER_ID,
        raw.vote_average,
        raw.vote_count,
        10.0,
    ));

    push_artwork(&mut md, opts.artwork, opts.images.poster(raw.poster_path.as_deref(), raw.id));
    push_artwork(
        &mut md,
        opts.artwork,
        opts.images.background(raw.backdrop_path.as_deref(), raw.id),
    );

    for genre in &raw.genres {
        md.add_genre(&genre.name);
    }
    for company in &raw.production_companies {
        md.add_production_company(&company.name);
    }
    if let Some(credits) = &raw.credits {
        for member in cast_members(&credits.cast, CastKind::Actor) {
            md.add_cast_member(member);
        }
    }
    for cert in movie_certifications(raw.release_dates.as_ref(), opts.country) {
        md.add_certification(cert);
    }
    md
}

/// Maps one episode of a season payload.
#[must_use]
pub fn episode_record(
    raw: &TmdbEpisode,
    season_number: u32,
    artwork: ArtworkFilter,
    images: &ImageUrls,
) -> MetadataRecord {
    let mut md = MetadataRecord::new(PROVIDER_ID);
    md.set_id(PROVIDER_ID, raw.id);
    md.season_number = Some(season_number);
    md.episode_number = Some(raw.episode_number);
    md.title.clone_from(&raw.name);
    md.plot = raw.overview.clone().unwrap_or_default();
    md.set_release_date(parse_date(raw.air_date.as_deref()));

    if let Some(average) = raw.vote_average {
        md.add_rating(MediaRating::new(
            PROVIDER_ID,
            average,
            raw.vote_count.unwrap_or_default(),
            10.0,
        ));
    }
    push_artwork(&mut md, artwork, images.thumb(raw.still_path.as_deref(), raw.id));
    for member in cast_members(&raw.guest_stars, CastKind::GuestStar) {
        md.add_cast_member(member);
    }
    md
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use mediascrape_api::tmdb::{TmdbMovieDetails, TmdbTvDetails, TmdbTvSeason};

    use super::*;

    fn tv_details() -> TmdbTvDetails {
        serde_json::from_str(include_str!("../../../../fixtures/tmdb/tv_details_70523.json"))
            .unwrap()
    }

    fn movie_details() -> TmdbMovieDetails {
        serde_json::from_str(include_str!("../../../../fixtures/tmdb/movie_details_268.json"))
            .unwrap()
    }

    fn opts<'a>(images: &'a ImageUrls, country: Option<&'a str>) -> DetailOptions<'a> {
        DetailOptions {
            country,
            artwork: ArtworkFilter::All,
            images,
        }
    }

    #[test]
    fn test_parse_date_variants() {
        // Arrange & Act & Assert
        assert_eq!(
            parse_date(Some("2017-12-01")),
            NaiveDate::from_ymd_opt(2017, 12, 1)
        );
        assert_eq!(
            parse_date(Some("1989-06-23T00:00:00.000Z")),
            NaiveDate::from_ymd_opt(1989, 6, 23)
        );
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_image_urls_trailing_slash() {
        // Arrange
        let a = ImageUrls::new("https://img.example/t/p");
        let b = ImageUrls::new("https://img.example/t/p/");

        // Act & Assert
        assert_eq!(a, b);
        assert_eq!(a.url("w342", "/x.jpg"), "https://img.example/t/p/w342/x.jpg");
    }

    #[test]
    fn test_tv_show_record_fields() {
        // Arrange
        let images = ImageUrls::default();

        // Act
        let md = tv_show_record(&tv_details(), opts(&images, None));

        // Assert
        assert_eq!(md.id(PROVIDER_ID), Some("70523"));
        assert_eq!(md.id(IMDB), Some("tt5753856"));
        assert_eq!(md.id(TVDB), Some("334824"));
        assert_eq!(md.original_language, "de");
        assert_eq!(md.year, Some(2017));
        assert_eq!(md.cast.len(), 2);
        assert_eq!(md.ratings.len(), 1);
        assert!(md.artwork.iter().any(|a| a.kind == ArtworkKind::Poster));
        assert!(md.production_companies.iter().all(|c| c.trim() == c));
        assert_eq!(md.genres, vec!["Krimi", "Drama"]);
        assert_eq!(md.certifications.len(), 2);
    }

    #[test]
    fn test_tv_certifications_filtered_by_country() {
        // Arrange
        let images = ImageUrls::default();

        // Act
        let md = tv_show_record(&tv_details(), opts(&images, Some("de")));

        // Assert
        assert_eq!(
            md.certifications,
            vec![Certification {
                country: String::from("DE"),
                rating: String::from("16"),
            }]
        );
    }

    #[test]
    fn test_movie_certification_skips_empty() {
        // Arrange
        let images = ImageUrls::default();

        // Act
        let md = movie_record(&movie_details(), opts(&images, Some("US")));

        // Assert
        assert_eq!(md.id(IMDB), Some("tt0096895"));
        assert_eq!(md.genres, vec!["Fantasy"]);
        assert_eq!(md.certifications.len(), 1);
        assert_eq!(md.certifications[0].rating, "PG-13");
    }

    #[test]
    fn test_artwork_filter_applied() {
        // Arrange
        let images = ImageUrls::default();
        let options = DetailOptions {
            country: None,
            artwork: ArtworkFilter::Only(ArtworkKind::Background),
            images: &images,
        };

        // Act
        let md = movie_record(&movie_details(), options);

        // Assert
        assert!(md.artwork.iter().all(|a| a.kind == ArtworkKind::Background));
    }

    #[test]
    fn test_episode_record_from_season() {
        // Arrange
        let season: TmdbTvSeason = serde_json::from_str(include_str!(
            "../../../../fixtures/tmdb/tv_season_70523_1.json"
        ))
        .unwrap();
        let images = ImageUrls::default();

        // Act
        let md = episode_record(&season.episodes[0], 1, ArtworkFilter::All, &images);

        // Assert
        assert_eq!(md.season_number, Some(1));
        assert_eq!(md.episode_number, Some(1));
        assert_eq!(md.title, "Geheimnisse");
        assert_eq!(md.cast[0].kind, CastKind::GuestStar);
        assert_eq!(
            md.artwork[0].url,
            "https://image.tmdb.org/t/p/original/a.jpg"
        );
    }

    #[test]
    fn test_search_result_score_and_year() {
        // Arrange
        let raw = TmdbTvSearchResult {
            id: 96_677,
            name: String::from("Dark Matter"),
            original_name: String::from("Dark Matter"),
            original_language: String::from("en"),
            first_air_date: Some(String::new()),
            ..TmdbTvSearchResult::default()
        };

        // Act
        let result = tv_search_result(&raw, "dark matter", &ImageUrls::default());

        // Assert
        assert_eq!(result.id, "96677");
        assert_eq!(result.year, None);
        assert!((result.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.poster_url, None);
    }
}
