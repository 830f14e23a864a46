//! Headless search palette: input state, request coalescing and recent-search history.

mod backend;
mod client;
mod dedupe;
mod history;

pub use backend::{HttpSearchBackend, SearchBackend};
pub use client::{
    Key, KeyPress, Location, MemoryNavigator, Navigator, PaletteView, SearchClient,
    SearchOutcome, SearchResponse, SearchStatus, SearchTicket, PROMPT_MESSAGE, QUERY_PARAM,
    SEARCH_ERROR_NOTICE,
};
pub use dedupe::{RequestDeduper, DEFAULT_DEDUPE_WINDOW};
pub use history::{
    JsonFileStore, KeyValueStore, MemoryStore, RecentSearches, MAX_RECENT_SEARCHES,
    RECENT_SEARCHES_KEY,
};
