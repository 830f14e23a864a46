//! Fetch a title, listing or search through the gateway and print the normalized JSON.
//! Usage:
//!   cargo run --bin media_props -- movie <tmdb_id>
//!   cargo run --bin media_props -- tv <tmdb_id>
//!   cargo run --bin media_props -- trending <all|movie|tv> <day|week>
//!   cargo run --bin media_props -- search <query...>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use marquee::config::Config;
use marquee::gateway::{MediaGateway, TimeWindow, TrendingScope};
use marquee::media::MediaType;
use marquee::pages::load_details_page;
use marquee::tmdb::{TmdbApi, TmdbClient};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("usage: media_props <movie|tv|trending|search> ...");
    };

    let config = Config::from_env()?;
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let gateway = MediaGateway::new(tmdb);

    let output = match command.as_str() {
        "movie" | "tv" => {
            let media_type: MediaType = command.parse()?;
            let id = args.get(1).context("missing tmdb id")?;
            let page = load_details_page(&gateway, media_type, id)
                .await
                .with_context(|| format!("no {media_type} with id {id}"))?;
            serde_json::to_value(&page)?
        }
        "trending" => {
            let scope: TrendingScope = args.get(1).map(String::as_str).unwrap_or("all").parse()?;
            let window: TimeWindow = args.get(2).map(String::as_str).unwrap_or("day").parse()?;
            serde_json::to_value(gateway.fetch_trending(scope, window).await)?
        }
        "search" => {
            let query = args[1..].join(" ");
            serde_json::to_value(gateway.search_media(&query).await)?
        }
        other => bail!("unknown command '{}'", other),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
