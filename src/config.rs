use std::time::Duration;

use serde::Deserialize;

use crate::services::posters::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v4 read access token, sent as a bearer credential
    pub tmdb_token: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Locale passed as the `language` query parameter
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Image shown whenever a poster cannot be resolved
    #[serde(default = "default_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Network attempts per poster before falling back to the placeholder
    #[serde(default = "default_max_attempts")]
    pub poster_max_attempts: u32,

    /// Fixed pause between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub poster_retry_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Upper bound on poster requests in flight at once
    #[serde(default = "default_max_workers")]
    pub poster_max_workers: usize,

    /// JSON file holding the movie list and similarity matrix
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_placeholder_url() -> String {
    crate::services::posters::PLACEHOLDER_URL.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_workers() -> usize {
    5
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the poster resolver cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_token.trim().is_empty() {
            anyhow::bail!("TMDB_TOKEN must not be empty");
        }
        if self.poster_max_attempts == 0 {
            anyhow::bail!("POSTER_MAX_ATTEMPTS must be at least 1");
        }
        if self.poster_max_workers == 0 {
            anyhow::bail!("POSTER_MAX_WORKERS must be at least 1");
        }
        if self.poster_timeout_secs == 0 {
            anyhow::bail!("POSTER_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.poster_max_attempts,
            base_delay: Duration::from_millis(self.poster_retry_delay_ms),
            timeout: Duration::from_secs(self.poster_timeout_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
