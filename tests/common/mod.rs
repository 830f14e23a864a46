#![allow(dead_code)]

use anyhow::anyhow;
use marquee::tmdb::TmdbApi;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Canned upstream keyed by request path.
#[derive(Default)]
pub struct FakeTmdb {
    responses: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeTmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays
            .insert(path.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failures.insert(path.to_string());
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn params_for(&self, path: &str) -> Option<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, params)| params.clone())
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push((
            path.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failures.contains(path) {
            return Err(anyhow!("{} -> 500 Internal Server Error", path));
        }
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{} -> 404 Not Found", path))
    }
}

pub fn movie_json(id: u64, title: &str, release_date: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": format!("{title} overview"),
        "poster_path": format!("/{id}.jpg"),
        "backdrop_path": null,
        "release_date": release_date,
        "vote_average": 7.4,
        "adult": false,
        "popularity": 12.5
    })
}

pub fn show_json(id: u64, name: &str, first_air_date: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": format!("{name} overview"),
        "poster_path": null,
        "first_air_date": first_air_date,
        "vote_average": 0,
        "popularity": 3.0
    })
}

pub fn tagged(mut record: Value, media_type: &str) -> Value {
    record["media_type"] = json!(media_type);
    record
}

pub fn person_json(id: u64, name: &str) -> Value {
    json!({ "id": id, "name": name, "media_type": "person", "known_for_department": "Acting" })
}

pub fn results(items: Vec<Value>) -> Value {
    json!({ "page": 1, "results": items, "total_pages": 1, "total_results": 0 })
}

pub fn season_json(number: u32, episodes: u32) -> Value {
    let episodes: Vec<Value> = (1..=episodes)
        .map(|e| {
            json!({
                "id": number * 100 + e,
                "name": format!("S{number}E{e}"),
                "episode_number": e,
                "season_number": number,
                "runtime": 42,
                "still_path": null,
                "vote_average": 7.0
            })
        })
        .collect();
    json!({
        "id": 1000 + number,
        "name": format!("Season {number}"),
        "overview": "",
        "air_date": "2020-01-01",
        "season_number": number,
        "episodes": episodes
    })
}
