use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_DEDUPE_WINDOW: Duration = Duration::from_secs(5);

struct Entry<T: Clone> {
    started: Instant,
    future: Shared<BoxFuture<'static, T>>,
}

/// At most one outstanding request per key.
///
/// A key started less than `window` ago resolves to the same shared future, whether
/// it is still in flight or already finished. Finished entries older than the window
/// are dropped on the next lookup.
pub struct RequestDeduper<T: Clone> {
    window: Duration,
    entries: HashMap<String, Entry<T>>,
}

impl<T: Clone + Send + Sync + 'static> RequestDeduper<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// Returns the shared future for `key`, calling `start` only when none is reusable.
    pub fn get_or_start<F>(&mut self, key: &str, start: F) -> Shared<BoxFuture<'static, T>>
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        self.prune();
        if let Some(entry) = self.entries.get(key) {
            debug!(key = %key, "Coalescing with existing request");
            return entry.future.clone();
        }
        let future = start().shared();
        self.entries.insert(
            key.to_string(),
            Entry {
                started: Instant::now(),
                future: future.clone(),
            },
        );
        future
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prune(&mut self) {
        let window = self.window;
        self.entries
            .retain(|_, e| e.future.peek().is_none() || e.started.elapsed() < window);
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RequestDeduper<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUPE_WINDOW)
    }
}
