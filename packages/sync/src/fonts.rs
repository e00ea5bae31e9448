//! Font catalog client.
//!
//! Paginated font metadata from `GET /api/fonts`, cached on disk with an
//! explicit expiry timestamp seven days out. The cache is keyed by the
//! full query so different searches never collide.

use crate::error::TransportError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

const CACHE_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    pub family: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPage {
    #[serde(default)]
    pub items: Vec<FontEntry>,

    #[serde(default)]
    pub page: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedFontPage {
    expires_at: DateTime<Utc>,
    result: FontPage,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FontCacheFile {
    entries: HashMap<String, CachedFontPage>,
}

pub struct FontCatalog {
    base_url: String,
    cache_path: PathBuf,
    http: reqwest::Client,
}

impl FontCatalog {
    pub fn new(base_url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache_path: cache_path.into(),
            http: reqwest::Client::new(),
        }
    }

    /// List fonts, serving unexpired results from the disk cache
    pub async fn list(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<FontPage, TransportError> {
        let key = format!("{}:{}:{}", query, page, limit);

        if let Some(cached) = self.read_cache(&key) {
            if cached.expires_at > Utc::now() {
                debug!(key, "font catalog cache hit");
                return Ok(cached.result);
            }
        }

        let url = format!("{}/api/fonts", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Backend {
                status: status.as_u16(),
                message: format!("font catalog request failed: {}", status),
            });
        }

        let result: FontPage = response.json().await?;
        self.write_cache(key, &result);
        Ok(result)
    }

    fn read_cache(&self, key: &str) -> Option<CachedFontPage> {
        let json = std::fs::read_to_string(&self.cache_path).ok()?;
        let mut cache: FontCacheFile = serde_json::from_str(&json).ok()?;
        cache.entries.remove(key)
    }

    fn write_cache(&self, key: String, result: &FontPage) {
        let mut cache: FontCacheFile = std::fs::read_to_string(&self.cache_path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();

        cache.entries.insert(
            key,
            CachedFontPage {
                expires_at: Utc::now() + Duration::days(CACHE_TTL_DAYS),
                result: result.clone(),
            },
        );

        if let Some(parent) = self.cache_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string(&cache) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.cache_path, json) {
                    warn!(%err, "font cache write failed");
                }
            }
            Err(err) => warn!(%err, "font cache serialization failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_expiry_is_seven_days_out() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("fonts.json");
        let catalog = FontCatalog::new("http://localhost:9", &cache_path);

        let result = FontPage {
            items: vec![FontEntry {
                family: "Inter".to_string(),
                category: Some("sans-serif".to_string()),
                variants: vec!["400".to_string(), "700".to_string()],
            }],
            page: 1,
            total: Some(1),
        };
        catalog.write_cache("inter:1:20".to_string(), &result);

        let cached = catalog.read_cache("inter:1:20").unwrap();
        assert_eq!(cached.result, result);

        let days_out = (cached.expires_at - Utc::now()).num_days();
        assert!((6..=7).contains(&days_out));
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_served() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("fonts.json");
        let catalog = FontCatalog::new("http://localhost:9", &cache_path);

        // Write an already-expired entry by hand
        let cache = FontCacheFile {
            entries: HashMap::from([(
                "inter:1:20".to_string(),
                CachedFontPage {
                    expires_at: Utc::now() - Duration::days(1),
                    result: FontPage::default(),
                },
            )]),
        };
        std::fs::write(&cache_path, serde_json::to_string(&cache).unwrap()).unwrap();

        // The stale entry is skipped; the fetch then fails because there
        // is no server behind the base URL
        assert!(catalog.list("inter", 1, 20).await.is_err());
    }
}
