use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::{Position, Url};

use super::backend::SearchBackend;
use super::dedupe::RequestDeduper;
use super::history::{KeyValueStore, RecentSearches};
use crate::media::{MediaSummary, SearchResultSet};
use crate::utils::sanitize_input;

pub const QUERY_PARAM: &str = "query";
pub const SEARCH_ERROR_NOTICE: &str = "Failed to load results. Please try again.";
pub const PROMPT_MESSAGE: &str = "Enter your search and click the search button";

// Locations are page-relative; the origin only anchors parsing.
const PAGE_ORIGIN: &str = "http://localhost/";

/// Path plus ordered query parameters of the page hosting the palette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    /// Parses a page-relative URL such as `/browse?tab=tv&query=star+wars`.
    pub fn parse(url: &str) -> Self {
        match Url::parse(PAGE_ORIGIN).and_then(|origin| origin.join(url)) {
            Ok(parsed) => Self {
                path: parsed.path().to_string(),
                params: parsed.query_pairs().into_owned().collect(),
            },
            Err(_) => Self::new(url),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_param(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove_param(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    pub fn to_url(&self) -> String {
        let Ok(mut url) = Url::parse(PAGE_ORIGIN).and_then(|origin| origin.join(&self.path)) else {
            return self.path.clone();
        };
        if self.params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&self.params);
        }
        url[Position::BeforePath..].to_string()
    }
}

/// Page navigation as seen by the palette.
pub trait Navigator {
    fn location(&self) -> Location;
    /// Swap the current entry without adding history.
    fn replace(&mut self, location: Location);
    fn push(&mut self, path: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    pub current: Location,
    pub visited: Vec<String>,
}

impl MemoryNavigator {
    pub fn at(url: &str) -> Self {
        Self {
            current: Location::parse(url),
            visited: Vec::new(),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> Location {
        self.current.clone()
    }

    fn replace(&mut self, location: Location) {
        self.current = location;
    }

    fn push(&mut self, path: &str) {
        self.visited.push(path.to_string());
        self.current = Location::parse(path);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            meta: false,
        }
    }

    pub fn meta(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: false,
            meta: true,
        }
    }

    fn is_palette_shortcut(&self) -> bool {
        matches!(self.key, Key::Char('k') | Key::Char('K')) && (self.ctrl || self.meta)
    }
}

pub type SearchOutcome = Result<SearchResultSet, Arc<anyhow::Error>>;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready(SearchResultSet),
    Failed(String),
}

/// What the palette body should render right now.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteView {
    Loading,
    Error(String),
    /// Nothing committed yet; recent searches may be offered.
    Prompt { recent: Vec<String> },
    NoResults { query: String },
    Results {
        movies: Vec<MediaSummary>,
        tv: Vec<MediaSummary>,
    },
}

/// An outstanding fetch for one committed query.
pub struct SearchTicket {
    query: String,
    future: Shared<BoxFuture<'static, SearchOutcome>>,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn wait(self) -> SearchResponse {
        let outcome = self.future.await;
        SearchResponse {
            query: self.query,
            outcome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub query: String,
    pub outcome: SearchOutcome,
}

/// Command-palette controller.
///
/// Keystrokes only edit the input buffer. A submit commits the sanitized buffer,
/// mirrors it into the location's `query` parameter and starts a fetch. Responses
/// for anything but the current committed query are dropped.
pub struct SearchClient<S: KeyValueStore, N: Navigator> {
    backend: Arc<dyn SearchBackend>,
    store: S,
    navigator: N,
    requests: RequestDeduper<SearchOutcome>,
    input_value: String,
    committed_query: String,
    open: bool,
    focus_pending: bool,
    history: RecentSearches,
    status: SearchStatus,
}

impl<S: KeyValueStore, N: Navigator> SearchClient<S, N> {
    /// Reads recent searches once and picks up a `query` parameter already in the location.
    ///
    /// A restored query has its fetch registered right away and the palette shows
    /// `Loading`; [`SearchClient::fetch_committed`] hands out the ticket for it
    /// without issuing a second request.
    pub fn mount(backend: Arc<dyn SearchBackend>, store: S, navigator: N) -> Self {
        let history = RecentSearches::load(&store);
        let restored = navigator
            .location()
            .param(QUERY_PARAM)
            .map(sanitize_input)
            .unwrap_or_default();
        if !restored.is_empty() {
            debug!(query = %restored, "Restoring committed query from location");
        }
        let mut client = Self {
            backend,
            store,
            navigator,
            requests: RequestDeduper::default(),
            input_value: restored.clone(),
            committed_query: restored,
            open: false,
            focus_pending: false,
            history,
            status: SearchStatus::Idle,
        };
        client.fetch_committed();
        client
    }

    pub fn with_dedupe_window(mut self, window: std::time::Duration) -> Self {
        self.requests = RequestDeduper::new(window);
        self
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn recent_searches(&self) -> &[String] {
        self.history.entries()
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn set_input(&mut self, value: &str) {
        self.input_value = value.to_string();
    }

    pub fn set_open(&mut self, open: bool) {
        if open && !self.open {
            self.focus_pending = true;
        }
        self.open = open;
    }

    pub fn toggle_open(&mut self) {
        self.set_open(!self.open);
    }

    /// True once after the palette opens; the renderer focuses the input on the next frame.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_pending)
    }

    /// Document-level key handler. Returns whether the key was consumed.
    pub fn handle_global_key(&mut self, press: KeyPress) -> bool {
        if press.is_palette_shortcut() {
            self.toggle_open();
            return true;
        }
        false
    }

    /// Key handler for the palette input.
    pub fn handle_input_key(&mut self, press: KeyPress) -> Option<SearchTicket> {
        match press.key {
            Key::Enter => self.submit(),
            Key::Escape => {
                self.set_open(false);
                None
            }
            _ => None,
        }
    }

    /// Commits the current input buffer.
    pub fn submit(&mut self) -> Option<SearchTicket> {
        let value = self.input_value.clone();
        self.execute_search(&value)
    }

    /// Commits `value` if its sanitized form differs from the committed query.
    pub fn execute_search(&mut self, value: &str) -> Option<SearchTicket> {
        let sanitized = sanitize_input(value);
        if sanitized == self.committed_query {
            return None;
        }
        self.committed_query = sanitized;

        let mut location = self.navigator.location();
        if self.committed_query.is_empty() {
            location.remove_param(QUERY_PARAM);
        } else {
            location.set_param(QUERY_PARAM, &self.committed_query);
        }
        self.navigator.replace(location);

        self.fetch_committed()
    }

    /// Starts, or joins, the fetch for the committed query.
    ///
    /// Returns `None` when there is nothing to wait for: no query, or a result that
    /// was already available and has been applied.
    pub fn fetch_committed(&mut self) -> Option<SearchTicket> {
        if self.committed_query.is_empty() {
            self.status = SearchStatus::Idle;
            return None;
        }
        let query = self.committed_query.clone();
        let backend = self.backend.clone();
        let key = query.clone();
        let future = self.requests.get_or_start(&key, move || {
            async move { backend.search(&query).await.map_err(Arc::new) }.boxed()
        });

        if let Some(outcome) = future.peek().cloned() {
            self.apply(SearchResponse {
                query: key,
                outcome,
            });
            return None;
        }
        self.status = SearchStatus::Loading;
        Some(SearchTicket { query: key, future })
    }

    /// Applies a finished fetch. Responses for a superseded query are ignored.
    pub fn apply(&mut self, response: SearchResponse) -> bool {
        if response.query != self.committed_query {
            debug!(
                stale = %response.query,
                current = %self.committed_query,
                "Ignoring superseded search response"
            );
            return false;
        }
        self.status = match response.outcome {
            Ok(results) => {
                info!(
                    query = %response.query,
                    movies = results.movies.len(),
                    tv = results.tv.len(),
                    "Search results received"
                );
                SearchStatus::Ready(results)
            }
            Err(e) => {
                warn!(query = %response.query, "Search failed: {:#}", e);
                SearchStatus::Failed(SEARCH_ERROR_NOTICE.to_string())
            }
        };
        true
    }

    /// Submit and wait for the response in one step.
    pub async fn submit_and_wait(&mut self) {
        if let Some(ticket) = self.submit() {
            let response = ticket.wait().await;
            self.apply(response);
        }
    }

    /// Records the title, closes the palette and navigates to the item's detail view.
    pub fn select_result(&mut self, item: &MediaSummary) {
        if self.history.push(&item.title) {
            if let Err(e) = self.history.save(&mut self.store) {
                warn!("Error writing recent searches: {:#}", e);
            }
        }
        self.set_open(false);
        self.navigator.push(&item.detail_path());
    }

    /// Re-runs a recent search term.
    pub fn select_recent(&mut self, term: &str) -> Option<SearchTicket> {
        self.input_value = term.to_string();
        self.execute_search(term)
    }

    pub fn view(&self) -> PaletteView {
        match &self.status {
            SearchStatus::Loading => PaletteView::Loading,
            SearchStatus::Failed(message) => PaletteView::Error(message.clone()),
            _ if self.committed_query.is_empty() => PaletteView::Prompt {
                recent: self.history.entries().to_vec(),
            },
            SearchStatus::Ready(results) if !results.is_empty() => PaletteView::Results {
                movies: results.movies.clone(),
                tv: results.tv.clone(),
            },
            SearchStatus::Ready(_) => PaletteView::NoResults {
                query: self.committed_query.clone(),
            },
            // Committed but not yet fetched.
            SearchStatus::Idle => PaletteView::Loading,
        }
    }
}
