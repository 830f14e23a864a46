use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::media::{
    format_credits, format_movie, format_tv_show, movie_detail, tv_show_detail, Credits,
    ExternalIds, Genre, MediaDetail, MediaSummary, MediaType, MovieDetail, RawCredits, RawMovie,
    RawShow, Review, SearchResultSet, Season, TvShowDetail, Video,
};
use crate::tmdb::TmdbApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingScope {
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    fn as_str(&self) -> &'static str {
        match self {
            TrendingScope::All => "all",
            TrendingScope::Movie => "movie",
            TrendingScope::Tv => "tv",
        }
    }
}

impl From<MediaType> for TrendingScope {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => TrendingScope::Movie,
            MediaType::Tv => TrendingScope::Tv,
        }
    }
}

impl FromStr for TrendingScope {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(TrendingScope::All),
            "movie" => Ok(TrendingScope::Movie),
            "tv" => Ok(TrendingScope::Tv),
            _ => Err(anyhow!("trending scope must be 'all', 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            _ => Err(anyhow!("time window must be 'day' or 'week'")),
        }
    }
}

/// Sub-resources hanging off `/{type}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubResource {
    Similar,
    Recommendations,
    Reviews,
    Videos,
    Credits,
    ExternalIds,
    WatchProviders,
}

impl SubResource {
    fn path(&self, media_type: MediaType, id: &str) -> String {
        let suffix = match self {
            SubResource::Similar => "similar",
            SubResource::Recommendations => "recommendations",
            SubResource::Reviews => "reviews",
            SubResource::Videos => "videos",
            SubResource::Credits => "credits",
            SubResource::ExternalIds => "external_ids",
            SubResource::WatchProviders => "watch/providers",
        };
        format!("/{media_type}/{id}/{suffix}")
    }
}

/// Request functions over the upstream API.
///
/// Every public method swallows transport and parse failures: the error is logged
/// and the caller receives an empty list, `None`, or an empty result set. Within a
/// listing, a single malformed record is skipped and the rest are kept.
#[derive(Clone)]
pub struct MediaGateway {
    api: Arc<dyn TmdbApi>,
}

impl MediaGateway {
    pub fn new(api: Arc<dyn TmdbApi>) -> Self {
        Self { api }
    }

    pub async fn fetch_trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
    ) -> Vec<MediaSummary> {
        let path = format!("/trending/{}/{}", scope.as_str(), window.as_str());
        contained(&path, self.try_trending(&path, scope).await)
    }

    /// Category listing such as `popular` or `now_playing`; the category is forwarded verbatim.
    pub async fn fetch_media(&self, media_type: MediaType, category: &str) -> Vec<MediaSummary> {
        let path = format!("/{media_type}/{category}");
        contained(&path, self.try_listing(&path, &[], media_type).await)
    }

    pub async fn fetch_by_genre(&self, media_type: MediaType, genre_id: &str) -> Vec<MediaSummary> {
        let path = format!("/discover/{media_type}");
        let params = [("with_genres", genre_id.to_string())];
        contained(&path, self.try_listing(&path, &params, media_type).await)
    }

    pub async fn fetch_single(&self, media_type: MediaType, id: &str) -> Option<MediaSummary> {
        let path = format!("/{media_type}/{id}");
        let result = self
            .get_as::<Value>(&path, &[])
            .await
            .and_then(|item| normalize(item, media_type))
            .map(Some);
        contained(&path, result)
    }

    pub async fn fetch_similar(&self, media_type: MediaType, id: &str) -> Vec<MediaSummary> {
        let path = SubResource::Similar.path(media_type, id);
        contained(&path, self.try_listing(&path, &[], media_type).await)
    }

    pub async fn fetch_recommendations(
        &self,
        media_type: MediaType,
        id: &str,
    ) -> Vec<MediaSummary> {
        let path = SubResource::Recommendations.path(media_type, id);
        contained(&path, self.try_listing(&path, &[], media_type).await)
    }

    pub async fn fetch_reviews(&self, media_type: MediaType, id: &str) -> Vec<Review> {
        let path = SubResource::Reviews.path(media_type, id);
        contained(&path, self.try_raw_results(&path).await)
    }

    pub async fn fetch_videos(&self, media_type: MediaType, id: &str) -> Vec<Video> {
        let path = SubResource::Videos.path(media_type, id);
        contained(&path, self.try_raw_results(&path).await)
    }

    pub async fn fetch_credits(&self, media_type: MediaType, id: &str) -> Credits {
        let path = SubResource::Credits.path(media_type, id);
        let result = self
            .get_as::<RawCredits>(&path, &[])
            .await
            .map(|raw| format_credits(&raw));
        contained(&path, result)
    }

    pub async fn fetch_external_ids(&self, media_type: MediaType, id: &str) -> Option<ExternalIds> {
        let path = SubResource::ExternalIds.path(media_type, id);
        contained(&path, self.get_as::<ExternalIds>(&path, &[]).await.map(Some))
    }

    /// Per-region provider map, passed through as returned upstream.
    pub async fn fetch_watch_providers(&self, media_type: MediaType, id: &str) -> Map<String, Value> {
        let path = SubResource::WatchProviders.path(media_type, id);
        let result = self.get_as::<Value>(&path, &[]).await.and_then(|mut body| {
            match body.get_mut("results").map(Value::take) {
                Some(Value::Object(regions)) => Ok(regions),
                _ => Err(anyhow!("{path}: response has no results object")),
            }
        });
        contained(&path, result)
    }

    /// Fetches seasons `1..=number_of_seasons` one after another, in ascending order.
    ///
    /// A season that fails to load is logged and skipped; the rest are still fetched.
    pub async fn fetch_episodes(&self, tv_id: &str, number_of_seasons: u32) -> Vec<Season> {
        let mut seasons = Vec::new();
        for index in 1..=number_of_seasons {
            let path = format!("/tv/{tv_id}/season/{index}");
            match self.get_as::<Season>(&path, &[]).await {
                Ok(season) => seasons.push(season),
                Err(e) => warn!(path = %path, error = %format!("{e:#}"), "Skipping season"),
            }
        }
        debug!(tv_id = %tv_id, loaded = seasons.len(), requested = number_of_seasons, "Seasons loaded");
        seasons
    }

    pub async fn fetch_movie_details(&self, id: &str) -> Option<MovieDetail> {
        let path = format!("/movie/{id}");
        let params = [("append_to_response", "credits".to_string())];
        let result = self
            .get_as::<RawMovie>(&path, &params)
            .await
            .map(|raw| Some(movie_detail(raw)));
        contained(&path, result)
    }

    pub async fn fetch_tv_show_details(&self, id: &str) -> Option<TvShowDetail> {
        let path = format!("/tv/{id}");
        let params = [("append_to_response", "credits,season/1".to_string())];
        let result = self
            .get_as::<RawShow>(&path, &params)
            .await
            .map(|raw| Some(tv_show_detail(raw)));
        contained(&path, result)
    }

    pub async fn fetch_details(&self, media_type: MediaType, id: &str) -> Option<MediaDetail> {
        match media_type {
            MediaType::Movie => self.fetch_movie_details(id).await.map(MediaDetail::Movie),
            MediaType::Tv => self.fetch_tv_show_details(id).await.map(MediaDetail::Tv),
        }
    }

    /// Multi-search split into movie and TV buckets; people and other kinds are dropped.
    /// Only the empty string skips the upstream call.
    pub async fn search_media(&self, query: &str) -> SearchResultSet {
        if query.is_empty() {
            return SearchResultSet::default();
        }
        contained("/search/multi", self.try_search(query).await)
    }

    pub async fn fetch_genres(&self, media_type: MediaType) -> Vec<Genre> {
        #[derive(serde::Deserialize)]
        struct GenreList {
            genres: Vec<Genre>,
        }

        let path = format!("/genre/{media_type}/list");
        let result = self
            .get_as::<GenreList>(&path, &[])
            .await
            .map(|list| list.genres);
        contained(&path, result)
    }
}

impl MediaGateway {
    async fn get_as<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let body = self.api.get_json(path, params).await?;
        serde_json::from_value(body).with_context(|| format!("{path}: unexpected response shape"))
    }

    async fn results(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<Value>> {
        let mut body = self.api.get_json(path, params).await?;
        match body.get_mut("results").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(anyhow!("{path}: response has no results array")),
        }
    }

    async fn try_listing(
        &self,
        path: &str,
        params: &[(&str, String)],
        media_type: MediaType,
    ) -> Result<Vec<MediaSummary>> {
        let items = self.results(path, params).await?;
        Ok(keep_valid(
            path,
            items.into_iter().map(|item| normalize(item, media_type)),
        ))
    }

    async fn try_raw_results<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let items = self.results(path, &[]).await?;
        Ok(keep_valid(
            path,
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).context("bad record")),
        ))
    }

    async fn try_trending(&self, path: &str, scope: TrendingScope) -> Result<Vec<MediaSummary>> {
        let items = self.results(path, &[]).await?;
        let normalized = items.into_iter().filter_map(|item| {
            let media_type = match scope {
                TrendingScope::Movie => Some(MediaType::Movie),
                TrendingScope::Tv => Some(MediaType::Tv),
                TrendingScope::All => tagged_media_type(&item),
            };
            media_type.map(|media_type| normalize(item, media_type))
        });
        Ok(keep_valid(path, normalized))
    }

    async fn try_search(&self, query: &str) -> Result<SearchResultSet> {
        let path = "/search/multi";
        let items = self.results(path, &[("query", query.to_string())]).await?;
        let mut set = SearchResultSet::default();
        for item in items {
            let Some(media_type) = tagged_media_type(&item) else {
                continue;
            };
            let bucket = match media_type {
                MediaType::Movie => &mut set.movies,
                MediaType::Tv => &mut set.tv,
            };
            bucket.extend(keep_valid(path, [normalize(item, media_type)]));
        }
        debug!(
            query = %query,
            movies = set.movies.len(),
            tv = set.tv.len(),
            "Multi-search partitioned"
        );
        Ok(set)
    }
}

/// Drops records that failed to parse, logging each one.
fn keep_valid<T>(path: &str, records: impl IntoIterator<Item = Result<T>>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match record {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(resource = %path, error = %format!("{e:#}"), "Skipping malformed record");
                None
            }
        })
        .collect()
}

fn tagged_media_type(item: &Value) -> Option<MediaType> {
    item.get("media_type")
        .and_then(Value::as_str)
        .and_then(|t| t.parse().ok())
}

fn normalize(item: Value, media_type: MediaType) -> Result<MediaSummary> {
    match media_type {
        MediaType::Movie => {
            let raw: RawMovie = serde_json::from_value(item).context("bad movie record")?;
            Ok(format_movie(&raw))
        }
        MediaType::Tv => {
            let raw: RawShow = serde_json::from_value(item).context("bad tv record")?;
            Ok(format_tv_show(&raw))
        }
    }
}

fn contained<T: Default>(resource: &str, result: Result<T>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            error!(resource = %resource, error = %format!("{e:#}"), "Upstream request failed");
            T::default()
        }
    }
}
