use serde::Serialize;
use tracing::info;

use crate::gateway::{MediaGateway, TimeWindow, TrendingScope};
use crate::media::{select_trailers, MediaDetail, MediaSummary, MediaType, Review, Season, Trailer};

const DETAIL_TRAILER_LIMIT: usize = 4;
const DETAIL_REVIEW_LIMIT: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct MediaRow {
    pub title: String,
    pub items: Vec<MediaSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub hero: Option<MediaSummary>,
    pub trending_day: MediaRow,
    pub trending_week: MediaRow,
    pub movies: Vec<MediaRow>,
    pub tv: Vec<MediaRow>,
}

enum RowSource {
    Trending,
    Category(&'static str),
    Genre(&'static str),
}

const MOVIE_ROWS: [(&str, RowSource); 8] = [
    ("Trending Today", RowSource::Trending),
    ("Now Playing", RowSource::Category("now_playing")),
    ("Upcoming", RowSource::Category("upcoming")),
    ("Popular", RowSource::Category("popular")),
    ("Top Rated", RowSource::Category("top_rated")),
    ("Drama", RowSource::Genre("18")),
    ("Comedy", RowSource::Genre("35")),
    ("Action", RowSource::Genre("28")),
];

const TV_ROWS: [(&str, RowSource); 7] = [
    ("Trending Today", RowSource::Trending),
    ("Airing Today", RowSource::Category("airing_today")),
    ("Popular", RowSource::Category("popular")),
    ("Top Rated", RowSource::Category("top_rated")),
    ("Drama", RowSource::Genre("18")),
    ("Comedy", RowSource::Genre("35")),
    ("Action & Adventure", RowSource::Genre("10759")),
];

async fn load_rows(
    gateway: &MediaGateway,
    media_type: MediaType,
    specs: &[(&str, RowSource)],
) -> Vec<MediaRow> {
    let mut rows = Vec::with_capacity(specs.len());
    for (title, source) in specs {
        let items = match source {
            RowSource::Trending => {
                gateway
                    .fetch_trending(media_type.into(), TimeWindow::Day)
                    .await
            }
            RowSource::Category(category) => gateway.fetch_media(media_type, category).await,
            RowSource::Genre(genre_id) => gateway.fetch_by_genre(media_type, genre_id).await,
        };
        rows.push(MediaRow {
            title: title.to_string(),
            items,
        });
    }
    rows
}

/// Landing page rows. A row whose upstream call failed is kept with no items.
pub async fn load_home_feed(gateway: &MediaGateway) -> HomeFeed {
    let day = gateway
        .fetch_trending(TrendingScope::All, TimeWindow::Day)
        .await;
    let week = gateway
        .fetch_trending(TrendingScope::All, TimeWindow::Week)
        .await;
    let movies = load_rows(gateway, MediaType::Movie, &MOVIE_ROWS).await;
    let tv = load_rows(gateway, MediaType::Tv, &TV_ROWS).await;

    info!(
        trending = day.len(),
        movie_rows = movies.len(),
        tv_rows = tv.len(),
        "Home feed assembled"
    );

    HomeFeed {
        hero: day.first().cloned(),
        trending_day: MediaRow {
            title: "Trending Today".to_string(),
            items: day,
        },
        trending_week: MediaRow {
            title: "Trending This Week".to_string(),
            items: week,
        },
        movies,
        tv,
    }
}

/// Everything the detail view renders for one title.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsPage {
    pub detail: MediaDetail,
    pub seasons: Vec<Season>,
    pub similar: Vec<MediaSummary>,
    pub recommendations: Vec<MediaSummary>,
    pub trailers: Vec<Trailer>,
    pub reviews: Vec<Review>,
}

/// `None` when the primary record could not be loaded; sub-resources degrade to empty lists.
pub async fn load_details_page(
    gateway: &MediaGateway,
    media_type: MediaType,
    id: &str,
) -> Option<DetailsPage> {
    let detail = gateway.fetch_details(media_type, id).await?;

    let seasons = match &detail {
        MediaDetail::Tv(show) if show.number_of_seasons > 0 => {
            gateway.fetch_episodes(id, show.number_of_seasons).await
        }
        _ => Vec::new(),
    };
    let similar = gateway.fetch_similar(media_type, id).await;
    let recommendations = gateway.fetch_recommendations(media_type, id).await;
    let videos = gateway.fetch_videos(media_type, id).await;
    let mut reviews = gateway.fetch_reviews(media_type, id).await;
    reviews.truncate(DETAIL_REVIEW_LIMIT);

    info!(
        media_type = %media_type,
        id = %id,
        title = %detail.summary().title,
        seasons = seasons.len(),
        "Detail page assembled"
    );

    Some(DetailsPage {
        trailers: select_trailers(&videos, DETAIL_TRAILER_LIMIT),
        detail,
        seasons,
        similar,
        recommendations,
        reviews,
    })
}
