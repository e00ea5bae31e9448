use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "sitekit.config.json";

/// Sitekit configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend base URL
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Public renderer bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory local editor snapshots are kept in
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

fn default_backend_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_snapshot_dir() -> String {
    ".sitekit/snapshots".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn snapshot_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.snapshot_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            bind: default_bind(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "backendUrl": "https://api.sitekit.dev",
            "bind": "127.0.0.1:8080"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend_url, "https://api.sitekit.dev");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.snapshot_dir, ".sitekit/snapshots");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:3001");
        assert_eq!(config.bind, "0.0.0.0:4000");
    }
}
