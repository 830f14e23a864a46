//! Drive the search palette from the terminal against a running server.
//! Each line replaces the input buffer and submits it. Other commands:
//!   :k            toggle the palette (same as Ctrl/Cmd+K)
//!   :pick <n>     select result n (movies first, then TV)
//!   :recent <n>   re-run recent search n
//!   :quit
//! Uses SEARCH_API_URL (default http://localhost:3146) and SEARCH_HISTORY_PATH
//! (default .marquee/client.json).

use anyhow::Result;
use dotenvy::dotenv;
use marquee::search::{
    HttpSearchBackend, JsonFileStore, KeyPress, MemoryNavigator, PaletteView, SearchClient,
    SearchTicket, PROMPT_MESSAGE,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn render(client: &SearchClient<JsonFileStore, MemoryNavigator>) {
    println!(
        "[{}] {}",
        if client.is_open() { "open" } else { "closed" },
        client.navigator().current.to_url()
    );
    match client.view() {
        PaletteView::Loading => println!("  Searching..."),
        PaletteView::Error(message) => println!("  ! {message}"),
        PaletteView::Prompt { recent } => {
            println!("  {PROMPT_MESSAGE}");
            for (i, term) in recent.iter().enumerate() {
                println!("  recent {i}: {term}");
            }
        }
        PaletteView::NoResults { query } => println!("  No results found for \"{query}\""),
        PaletteView::Results { movies, tv } => {
            for (i, item) in movies.iter().chain(tv.iter()).enumerate() {
                println!("  {i:>2} [{}] {} {}", item.media_type, item.title, item.year);
            }
        }
    }
}

async fn settle(
    client: &mut SearchClient<JsonFileStore, MemoryNavigator>,
    ticket: Option<SearchTicket>,
) {
    if let Some(ticket) = ticket {
        render(client);
        let response = ticket.wait().await;
        client.apply(response);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let base_url = env::var("SEARCH_API_URL").unwrap_or_else(|_| "http://localhost:3146".into());
    let history_path =
        env::var("SEARCH_HISTORY_PATH").unwrap_or_else(|_| ".marquee/client.json".into());

    let backend = Arc::new(HttpSearchBackend::new(&base_url)?);
    let mut client = SearchClient::mount(
        backend,
        JsonFileStore::new(history_path),
        MemoryNavigator::at("/"),
    );
    client.set_open(true);
    let restored = client.fetch_committed();
    settle(&mut client, restored).await;

    let stdin = io::stdin();
    loop {
        render(&client);
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(2, ' ');
        match (parts.next().unwrap_or(""), parts.next()) {
            (":quit", _) => break,
            (":k", _) => {
                client.handle_global_key(KeyPress::ctrl('k'));
            }
            (":pick", Some(n)) => {
                let picked = match client.view() {
                    PaletteView::Results { movies, tv } => n
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| movies.into_iter().chain(tv).nth(i)),
                    _ => None,
                };
                match picked {
                    Some(item) => client.select_result(&item),
                    None => println!("  no such result"),
                }
            }
            (":recent", Some(n)) => {
                let term = n
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| client.recent_searches().get(i).cloned());
                match term {
                    Some(term) => {
                        let ticket = client.select_recent(&term);
                        settle(&mut client, ticket).await;
                    }
                    None => println!("  no such recent search"),
                }
            }
            _ => {
                client.set_input(line);
                let ticket = client.submit();
                settle(&mut client, ticket).await;
            }
        }
    }
    Ok(())
}
