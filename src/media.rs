//! Normalized view models and the pure functions that build them from upstream records.
//!
//! Nothing here touches the network. Every optional upstream field degrades to an
//! empty string, empty list or `None` instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tmdb::{image_url, BACKDROP_SIZES, POSTER_SIZES, PROFILE_SIZES, YOUTUBE_WATCH};

const MOVIE_CREW_JOBS: [&str; 4] = ["Producer", "Cinematography", "Editor", "Music"];
const WRITER_JOBS: [&str; 2] = ["Writer", "Screenplay"];
const TV_CREW_JOBS: [&str; 3] = ["Creator", "Executive Producer", "Producer"];
const TV_CAST_LIMIT: usize = 12;

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(anyhow::anyhow!("media type must be 'movie' or 'tv'")),
        }
    }
}

/// Listing-level view model shared by movies and TV shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub media_type: MediaType,
    pub year: String,
    pub rating: String,
    pub adult: bool,
    pub genres: Vec<String>,
    pub popularity: f64,
}

impl MediaSummary {
    pub fn detail_path(&self) -> String {
        format!("/details/{}/{}", self.media_type, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: String,
    pub name: String,
    pub character: String,
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: String,
    pub name: String,
    pub job: String,
}

/// The two-bucket search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub movies: Vec<MediaSummary>,
    #[serde(default)]
    pub tv: Vec<MediaSummary>,
}

impl SearchResultSet {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.tv.is_empty()
    }
}

// Upstream shapes. Sub-records the UI shows as-is keep their upstream field names.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default, deserialize_with = "null_as_default")]
    pub iso_3166_1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub iso_639_1: String,
    pub english_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub air_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub season_number: u32,
    pub episode_type: Option<String>,
    pub runtime: Option<u32>,
    pub still_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub air_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub season_number: u32,
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub created_at: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub video_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub official: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trailer {
    pub name: String,
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
    pub wikidata_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCastMember {
    pub id: u64,
    pub name: Option<String>,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCrewMember {
    pub id: u64,
    pub name: Option<String>,
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<RawCastMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<RawCrewMember>,
}

/// A movie record as returned by listing, search and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    pub id: u64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: Option<bool>,
    pub popularity: Option<f64>,
    pub genres: Option<Vec<Genre>>,
    pub belongs_to_collection: Option<Collection>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub runtime: Option<u32>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<String>,
    pub production_companies: Option<Vec<Company>>,
    pub production_countries: Option<Vec<Country>>,
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub credits: Option<RawCredits>,
}

/// A TV show record as returned by listing, search and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawShow {
    pub id: u64,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: Option<bool>,
    pub popularity: Option<f64>,
    pub genres: Option<Vec<Genre>>,
    pub created_by: Option<Vec<Creator>>,
    pub episode_run_time: Option<Vec<u32>>,
    pub homepage: Option<String>,
    pub in_production: Option<bool>,
    pub languages: Option<Vec<String>>,
    pub last_episode_to_air: Option<Episode>,
    pub next_episode_to_air: Option<Episode>,
    pub networks: Option<Vec<Network>>,
    pub number_of_episodes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub original_language: Option<String>,
    pub production_companies: Option<Vec<Company>>,
    pub production_countries: Option<Vec<Country>>,
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
    pub credits: Option<RawCredits>,
    #[serde(rename = "season/1")]
    pub first_season: Option<Season>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MediaSummary,
    pub belongs_to_collection: Option<Collection>,
    pub budget: u64,
    pub revenue: u64,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub original_language: String,
    pub original_title: String,
    pub production_companies: Vec<Company>,
    pub production_countries: Vec<Country>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub release_date: Option<String>,
    pub runtime: Option<String>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShowDetail {
    #[serde(flatten)]
    pub summary: MediaSummary,
    pub created_by: Vec<Creator>,
    pub creators: Vec<String>,
    pub episode_run_time: Vec<u32>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub homepage: Option<String>,
    pub in_production: bool,
    pub languages: Vec<String>,
    pub original_language: String,
    pub original_name: String,
    pub last_episode_to_air: Option<Episode>,
    pub next_episode_to_air: Option<Episode>,
    pub networks: Vec<Network>,
    pub number_of_episodes: u32,
    pub number_of_seasons: u32,
    pub production_companies: Vec<Company>,
    pub production_countries: Vec<Country>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub show_type: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub first_season: Option<Season>,
}

/// Full detail record; consumers match on the variant instead of branching per field.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MediaDetail {
    Movie(MovieDetail),
    Tv(TvShowDetail),
}

impl MediaDetail {
    pub fn summary(&self) -> &MediaSummary {
        match self {
            MediaDetail::Movie(m) => &m.summary,
            MediaDetail::Tv(t) => &t.summary,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            MediaDetail::Movie(_) => MediaType::Movie,
            MediaDetail::Tv(_) => MediaType::Tv,
        }
    }
}

/// First four characters of an upstream date, or empty when the date is absent.
pub fn format_year(date: Option<&str>) -> String {
    date.map(|d| d.chars().take(4).collect()).unwrap_or_default()
}

/// One-decimal average, ties rounded up (7.25 gives "7.3").
///
/// NOTE: a real 0.0 average renders the same as a missing one (empty string).
/// Kept for compatibility with existing consumers.
pub fn format_rating(average: Option<f64>) -> String {
    match average {
        Some(v) if v != 0.0 && v.is_finite() => format!("{:.1}", (v * 10.0).round() / 10.0),
        _ => String::new(),
    }
}

fn genre_names(genres: Option<&Vec<Genre>>) -> Vec<String> {
    genres
        .map(|g| g.iter().map(|x| x.name.clone()).collect())
        .unwrap_or_default()
}

pub fn format_movie(movie: &RawMovie) -> MediaSummary {
    MediaSummary {
        id: movie.id.to_string(),
        title: movie.title.clone().unwrap_or_default(),
        description: movie.overview.clone().unwrap_or_default(),
        poster_url: image_url(movie.poster_path.as_deref(), POSTER_SIZES.medium),
        backdrop_url: image_url(movie.backdrop_path.as_deref(), BACKDROP_SIZES.large),
        media_type: MediaType::Movie,
        year: format_year(movie.release_date.as_deref()),
        rating: format_rating(movie.vote_average),
        adult: movie.adult.unwrap_or(false),
        genres: genre_names(movie.genres.as_ref()),
        popularity: movie.popularity.unwrap_or_default(),
    }
}

pub fn format_tv_show(show: &RawShow) -> MediaSummary {
    MediaSummary {
        id: show.id.to_string(),
        title: show.name.clone().unwrap_or_default(),
        description: show.overview.clone().unwrap_or_default(),
        poster_url: image_url(show.poster_path.as_deref(), POSTER_SIZES.medium),
        backdrop_url: image_url(show.backdrop_path.as_deref(), BACKDROP_SIZES.large),
        media_type: MediaType::Tv,
        year: format_year(show.first_air_date.as_deref()),
        rating: format_rating(show.vote_average),
        adult: show.adult.unwrap_or(false),
        genres: genre_names(show.genres.as_ref()),
        popularity: show.popularity.unwrap_or_default(),
    }
}

pub fn format_cast_member(person: &RawCastMember) -> CastMember {
    CastMember {
        id: person.id.to_string(),
        name: person.name.clone().unwrap_or_default(),
        character: person.character.clone().unwrap_or_default(),
        profile_url: image_url(person.profile_path.as_deref(), PROFILE_SIZES.medium),
    }
}

pub fn format_crew_member(person: &RawCrewMember) -> CrewMember {
    CrewMember {
        id: person.id.to_string(),
        name: person.name.clone().unwrap_or_default(),
        job: person.job.clone().unwrap_or_default(),
    }
}

pub fn format_credits(credits: &RawCredits) -> Credits {
    Credits {
        cast: credits.cast.iter().map(format_cast_member).collect(),
        crew: credits.crew.iter().map(format_crew_member).collect(),
    }
}

/// `"2h 5m"` style runtime; `None` for missing or zero.
pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    match minutes {
        Some(m) if m > 0 => Some(format!("{}h {}m", m / 60, m % 60)),
        _ => None,
    }
}

fn crew_names_with_jobs(crew: &[RawCrewMember], jobs: &[&str]) -> Vec<String> {
    crew.iter()
        .filter(|p| p.job.as_deref().is_some_and(|j| jobs.contains(&j)))
        .map(|p| p.name.clone().unwrap_or_default())
        .collect()
}

fn crew_with_jobs(crew: &[RawCrewMember], jobs: &[&str]) -> Vec<CrewMember> {
    crew.iter()
        .filter(|p| p.job.as_deref().is_some_and(|j| jobs.contains(&j)))
        .map(format_crew_member)
        .collect()
}

pub fn movie_detail(movie: RawMovie) -> MovieDetail {
    let summary = format_movie(&movie);
    let credits = movie.credits.unwrap_or_default();

    MovieDetail {
        summary,
        belongs_to_collection: movie.belongs_to_collection,
        budget: movie.budget.unwrap_or_default(),
        revenue: movie.revenue.unwrap_or_default(),
        homepage: movie.homepage.filter(|h| !h.is_empty()),
        imdb_id: movie.imdb_id,
        original_language: movie.original_language.unwrap_or_default(),
        original_title: movie.original_title.unwrap_or_default(),
        production_companies: movie.production_companies.unwrap_or_default(),
        production_countries: movie.production_countries.unwrap_or_default(),
        spoken_languages: movie.spoken_languages.unwrap_or_default(),
        release_date: movie.release_date,
        runtime: format_runtime(movie.runtime),
        status: movie.status,
        tagline: movie.tagline,
        vote_average: movie.vote_average.unwrap_or_default(),
        vote_count: movie.vote_count.unwrap_or_default(),
        directors: crew_names_with_jobs(&credits.crew, &["Director"]),
        writers: crew_names_with_jobs(&credits.crew, &WRITER_JOBS),
        cast: credits.cast.iter().map(format_cast_member).collect(),
        crew: crew_with_jobs(&credits.crew, &MOVIE_CREW_JOBS),
    }
}

pub fn tv_show_detail(show: RawShow) -> TvShowDetail {
    let summary = format_tv_show(&show);
    let credits = show.credits.unwrap_or_default();
    let created_by = show.created_by.unwrap_or_default();
    let creators = created_by.iter().map(|c| c.name.clone()).collect();

    TvShowDetail {
        summary,
        created_by,
        creators,
        episode_run_time: show.episode_run_time.unwrap_or_default(),
        first_air_date: show.first_air_date,
        last_air_date: show.last_air_date,
        homepage: show.homepage.filter(|h| !h.is_empty()),
        in_production: show.in_production.unwrap_or(false),
        languages: show.languages.unwrap_or_default(),
        original_language: show.original_language.unwrap_or_default(),
        original_name: show.original_name.unwrap_or_default(),
        last_episode_to_air: show.last_episode_to_air,
        next_episode_to_air: show.next_episode_to_air,
        networks: show.networks.unwrap_or_default(),
        number_of_episodes: show.number_of_episodes.unwrap_or_default(),
        number_of_seasons: show.number_of_seasons.unwrap_or_default(),
        production_companies: show.production_companies.unwrap_or_default(),
        production_countries: show.production_countries.unwrap_or_default(),
        spoken_languages: show.spoken_languages.unwrap_or_default(),
        status: show.status,
        tagline: show.tagline,
        show_type: show.show_type,
        vote_average: show.vote_average.unwrap_or_default(),
        vote_count: show.vote_count.unwrap_or_default(),
        cast: credits
            .cast
            .iter()
            .take(TV_CAST_LIMIT)
            .map(format_cast_member)
            .collect(),
        crew: crew_with_jobs(&credits.crew, &TV_CREW_JOBS),
        first_season: show.first_season,
    }
}

/// Official YouTube trailers and teasers, in upstream order.
pub fn select_trailers(videos: &[Video], max: usize) -> Vec<Trailer> {
    videos
        .iter()
        .filter(|v| {
            v.site == "YouTube" && (v.video_type == "Trailer" || v.video_type == "Teaser") && v.official
        })
        .take(max)
        .map(|v| Trailer {
            name: v.name.clone(),
            key: v.key.clone(),
            url: format!("{YOUTUBE_WATCH}v={}", v.key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::PLACEHOLDER_IMAGE;
    use serde_json::json;

    fn raw_movie(value: serde_json::Value) -> RawMovie {
        serde_json::from_value(value).unwrap()
    }

    fn raw_show(value: serde_json::Value) -> RawShow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn movie_without_release_date_has_empty_year() {
        let m = format_movie(&raw_movie(json!({ "id": 1, "title": "No Date" })));
        assert_eq!(m.year, "");
        let m = format_movie(&raw_movie(json!({ "id": 1, "release_date": null })));
        assert_eq!(m.year, "");
        let m = format_movie(&raw_movie(json!({ "id": 1, "release_date": "" })));
        assert_eq!(m.year, "");
    }

    #[test]
    fn zero_vote_average_renders_empty_rating() {
        let m = format_movie(&raw_movie(json!({ "id": 1, "vote_average": 0 })));
        assert_eq!(m.rating, "");
        let m = format_movie(&raw_movie(json!({ "id": 1 })));
        assert_eq!(m.rating, "");
    }

    #[test]
    fn tv_show_without_first_air_date_has_empty_year() {
        let t = format_tv_show(&raw_show(json!({ "id": 1, "name": "No Date" })));
        assert_eq!(t.year, "");
        let t = format_tv_show(&raw_show(json!({ "id": 1, "first_air_date": null })));
        assert_eq!(t.year, "");
        let t = format_tv_show(&raw_show(json!({ "id": 1, "first_air_date": "" })));
        assert_eq!(t.year, "");
    }

    #[test]
    fn rating_ties_round_up() {
        assert_eq!(format_rating(Some(7.25)), "7.3");
        assert_eq!(format_rating(Some(6.75)), "6.8");
        assert_eq!(format_rating(Some(8.25)), "8.3");
        assert_eq!(format_rating(Some(2.25)), "2.3");
        assert_eq!(format_rating(Some(8.217)), "8.2");
        assert_eq!(format_rating(Some(10.0)), "10.0");
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let season: Season = serde_json::from_value(json!({
            "id": 9,
            "name": null,
            "overview": null,
            "season_number": null,
            "episodes": [{
                "id": 1, "name": null, "overview": null, "episode_number": null,
                "season_number": 1, "vote_average": null
            }]
        }))
        .unwrap();
        assert_eq!(season.name, "");
        assert_eq!(season.season_number, 0);
        assert_eq!(season.episodes[0].overview, "");
        assert_eq!(season.episodes[0].vote_average, 0.0);

        let video: Video = serde_json::from_value(json!({
            "key": "k", "name": null, "site": "YouTube", "type": null, "official": null
        }))
        .unwrap();
        assert_eq!(video.video_type, "");
        assert!(!video.official);

        let credits: RawCredits =
            serde_json::from_value(json!({ "cast": null, "crew": [] })).unwrap();
        assert!(credits.cast.is_empty());
    }

    #[test]
    fn movie_fields_are_normalized() {
        let m = format_movie(&raw_movie(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "release_date": "1999-03-30",
            "vote_average": 8.217,
            "adult": false,
            "genre_ids": [28, 878],
            "popularity": 91.5
        })));
        assert_eq!(m.id, "603");
        assert_eq!(m.title, "The Matrix");
        assert_eq!(m.description, "A hacker learns the truth.");
        assert_eq!(m.poster_url, "https://image.tmdb.org/t/p/w342/poster.jpg");
        assert_eq!(m.backdrop_url, PLACEHOLDER_IMAGE);
        assert_eq!(m.media_type, MediaType::Movie);
        assert_eq!(m.year, "1999");
        assert_eq!(m.rating, "8.2");
        assert!(m.genres.is_empty());
        assert_eq!(m.popularity, 91.5);
        assert_eq!(m.detail_path(), "/details/movie/603");
    }

    #[test]
    fn tv_show_uses_name_and_first_air_date() {
        let t = format_tv_show(&raw_show(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "title": "ignored",
            "first_air_date": "2011-04-17",
            "vote_average": 8.4,
            "backdrop_path": "/bd.jpg",
            "genres": [{ "id": 18, "name": "Drama" }]
        })));
        assert_eq!(t.title, "Game of Thrones");
        assert_eq!(t.year, "2011");
        assert_eq!(t.rating, "8.4");
        assert_eq!(t.media_type, MediaType::Tv);
        assert_eq!(t.backdrop_url, "https://image.tmdb.org/t/p/w1280/bd.jpg");
        assert_eq!(t.genres, vec!["Drama".to_string()]);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let m = format_movie(&raw_movie(json!({ "id": 7, "title": "Seven" })));
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["mediaType"], "movie");
        assert_eq!(v["posterUrl"], PLACEHOLDER_IMAGE);
        assert_eq!(v["id"], "7");
    }

    #[test]
    fn cast_and_crew_keep_only_their_fields() {
        let credits: RawCredits = serde_json::from_value(json!({
            "cast": [{ "id": 6384, "name": "Keanu Reeves", "character": "Neo",
                       "profile_path": "/k.jpg", "order": 0, "popularity": 50.0 }],
            "crew": [{ "id": 9339, "name": "Lana Wachowski", "job": "Director",
                       "department": "Directing" }]
        }))
        .unwrap();
        let formatted = format_credits(&credits);
        assert_eq!(
            formatted.cast[0],
            CastMember {
                id: "6384".into(),
                name: "Keanu Reeves".into(),
                character: "Neo".into(),
                profile_url: "https://image.tmdb.org/t/p/w185/k.jpg".into(),
            }
        );
        assert_eq!(
            formatted.crew[0],
            CrewMember {
                id: "9339".into(),
                name: "Lana Wachowski".into(),
                job: "Director".into(),
            }
        );
    }

    #[test]
    fn movie_detail_filters_crew_roles() {
        let detail = movie_detail(raw_movie(json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "homepage": "",
            "credits": {
                "cast": [{ "id": 1, "name": "Keanu Reeves", "character": "Neo" }],
                "crew": [
                    { "id": 2, "name": "Lana Wachowski", "job": "Director" },
                    { "id": 3, "name": "Lilly Wachowski", "job": "Screenplay" },
                    { "id": 4, "name": "Someone", "job": "Writer" },
                    { "id": 5, "name": "Joel Silver", "job": "Producer" },
                    { "id": 6, "name": "Grip", "job": "Key Grip" }
                ]
            }
        })));
        assert_eq!(detail.directors, vec!["Lana Wachowski"]);
        assert_eq!(detail.writers, vec!["Lilly Wachowski", "Someone"]);
        assert_eq!(detail.crew.len(), 1);
        assert_eq!(detail.crew[0].job, "Producer");
        assert_eq!(detail.runtime.as_deref(), Some("2h 16m"));
        assert_eq!(detail.homepage, None);
    }

    #[test]
    fn tv_detail_caps_cast_and_reads_first_season() {
        let cast: Vec<_> = (0..20)
            .map(|i| json!({ "id": i, "name": format!("Actor {i}"), "character": "X" }))
            .collect();
        let detail = tv_show_detail(raw_show(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "number_of_seasons": 8,
            "created_by": [{ "id": 9813, "name": "David Benioff" }],
            "credits": {
                "cast": cast,
                "crew": [
                    { "id": 1, "name": "A", "job": "Executive Producer" },
                    { "id": 2, "name": "B", "job": "Director" }
                ]
            },
            "season/1": { "id": 3624, "name": "Season 1", "season_number": 1, "episodes": [] }
        })));
        assert_eq!(detail.cast.len(), 12);
        assert_eq!(detail.creators, vec!["David Benioff"]);
        assert_eq!(detail.crew.len(), 1);
        assert_eq!(detail.number_of_seasons, 8);
        assert_eq!(detail.first_season.map(|s| s.season_number), Some(1));
    }

    #[test]
    fn detail_variant_exposes_summary() {
        let detail = MediaDetail::Tv(tv_show_detail(raw_show(json!({ "id": 5, "name": "S" }))));
        assert_eq!(detail.media_type(), MediaType::Tv);
        assert_eq!(detail.summary().title, "S");
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["mediaType"], "tv");
        assert_eq!(v["numberOfSeasons"], 0);
    }

    #[test]
    fn runtime_formatting() {
        assert_eq!(format_runtime(Some(59)).as_deref(), Some("0h 59m"));
        assert_eq!(format_runtime(Some(120)).as_deref(), Some("2h 0m"));
        assert_eq!(format_runtime(Some(0)), None);
        assert_eq!(format_runtime(None), None);
    }

    #[test]
    fn trailers_are_official_youtube_trailers_or_teasers() {
        let videos: Vec<Video> = serde_json::from_value(json!([
            { "key": "a", "name": "Main", "site": "YouTube", "type": "Trailer", "official": true },
            { "key": "b", "name": "Fan", "site": "YouTube", "type": "Trailer", "official": false },
            { "key": "c", "name": "Clip", "site": "YouTube", "type": "Clip", "official": true },
            { "key": "d", "name": "Vimeo", "site": "Vimeo", "type": "Teaser", "official": true },
            { "key": "e", "name": "Tease", "site": "YouTube", "type": "Teaser", "official": true }
        ]))
        .unwrap();
        let trailers = select_trailers(&videos, 4);
        let keys: Vec<_> = trailers.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "e"]);
        assert_eq!(trailers[0].url, "https://www.youtube.com/watch?v=a");
    }

    #[test]
    fn media_type_parses_only_movie_and_tv() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("book".parse::<MediaType>().is_err());
        assert!("Movie".parse::<MediaType>().is_err());
    }
}
