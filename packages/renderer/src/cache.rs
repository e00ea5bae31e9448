//! Request-level payload cache.
//!
//! Preview payloads are cached per subdomain + path for a short TTL so a
//! burst of requests against a published site hits the backend once.
//! Entries expire by insertion time; there is no background eviction, a
//! stale entry is simply replaced on the next fetch.

use sitekit_sync::PreviewPayload;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Default revalidation window for published pages
pub const DEFAULT_TTL: Duration = Duration::from_secs(180);

pub struct PayloadCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PreviewPayload)>>,
}

impl PayloadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(subdomain: &str, path: &str) -> String {
        format!("{}:{}", subdomain, path)
    }

    pub async fn get(&self, key: &str) -> Option<PreviewPayload> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some((inserted, payload)) if inserted.elapsed() < self.ttl => {
                debug!(key, "payload cache hit");
                Some(payload.clone())
            }
            _ => None,
        }
    }

    pub async fn insert(&self, key: String, payload: PreviewPayload) {
        self.entries
            .lock()
            .await
            .insert(key, (Instant::now(), payload));
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
