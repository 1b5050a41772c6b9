//! Poster resolution
//!
//! Turns movie IDs into displayable poster URLs. A remote lookup that fails,
//! times out or returns no image degrades to a placeholder URL, so callers
//! always get exactly one URL per requested ID, in request order.

use std::{sync::Arc, time::Duration};

use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::{
    config::Config,
    models::{MovieId, PosterResult},
};

pub mod tmdb;

pub use tmdb::TmdbPosterSource;

/// Shown in place of a poster that could not be resolved
pub const PLACEHOLDER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster";

const DEFAULT_MAX_WORKERS: usize = 5;

/// Failure of a single remote lookup. Every variant is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

/// Source of poster image paths for movies
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Looks up the poster path for a movie.
    ///
    /// `Ok(None)` means the lookup succeeded but the movie has no poster.
    async fn fetch_poster_path(&self, id: MovieId) -> Result<Option<String>, FetchError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Fixed-delay retry settings applied to every poster lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts. Constant, not exponential.
    pub base_delay: Duration,
    /// Limit on each individual attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        }
    }
}

/// State of one in-progress lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterQuery {
    pub item_id: MovieId,
    pub retries_remaining: u32,
    pub attempt_delay: Duration,
}

impl PosterQuery {
    pub fn new(item_id: MovieId, policy: &RetryPolicy) -> Self {
        Self {
            item_id,
            retries_remaining: policy.max_attempts.saturating_sub(1),
            attempt_delay: policy.base_delay,
        }
    }
}

/// Resolves movie IDs to poster URLs with bounded concurrency
#[derive(Clone)]
pub struct PosterResolver {
    source: Arc<dyn PosterSource>,
    image_base: String,
    placeholder: String,
    policy: RetryPolicy,
    max_workers: usize,
}

impl PosterResolver {
    /// Creates a resolver with the default policy and worker count
    pub fn new(source: Arc<dyn PosterSource>, image_base: impl Into<String>) -> Self {
        Self {
            source,
            image_base: image_base.into(),
            placeholder: PLACEHOLDER_URL.to_string(),
            policy: RetryPolicy::default(),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn from_config(config: &Config, source: Arc<dyn PosterSource>) -> Self {
        Self::new(source, config.tmdb_image_url.clone())
            .with_policy(config.retry_policy())
            .with_max_workers(config.poster_max_workers)
            .with_placeholder(config.poster_placeholder_url.clone())
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = RetryPolicy {
            max_attempts: policy.max_attempts.max(1),
            ..policy
        };
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn poster_url(&self, path: &str) -> String {
        let base = self.image_base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Resolves one movie's poster URL. Never fails: lookups that error on
    /// every attempt, or succeed without an image, yield the placeholder.
    pub async fn fetch_one(&self, id: MovieId) -> String {
        let mut query = PosterQuery::new(id, &self.policy);

        loop {
            let attempt =
                match tokio::time::timeout(self.policy.timeout, self.source.fetch_poster_path(id))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(self.policy.timeout)),
                };

            match attempt {
                Ok(Some(path)) if !path.is_empty() => return self.poster_url(&path),
                Ok(_) => {
                    tracing::debug!(
                        movie_id = %query.item_id,
                        provider = self.source.name(),
                        "No poster available, using placeholder"
                    );
                    return self.placeholder.clone();
                }
                Err(e) if query.retries_remaining == 0 => {
                    tracing::warn!(
                        movie_id = %query.item_id,
                        error = %e,
                        attempts = self.policy.max_attempts,
                        provider = self.source.name(),
                        "Poster fetch failed, retries exhausted"
                    );
                    return self.placeholder.clone();
                }
                Err(e) => {
                    tracing::warn!(
                        movie_id = %query.item_id,
                        error = %e,
                        retries_remaining = query.retries_remaining,
                        provider = self.source.name(),
                        "Poster fetch failed, retrying"
                    );
                    query.retries_remaining -= 1;
                    tokio::time::sleep(query.attempt_delay).await;
                }
            }
        }
    }

    /// Resolves poster URLs for every ID, at most `max_workers` at a time.
    ///
    /// The output is aligned with `ids`: same length, same order.
    pub async fn fetch_many(&self, ids: &[MovieId]) -> Vec<String> {
        let mut urls = vec![String::new(); ids.len()];

        // a slot frees as soon as its fetch finishes, whatever its position
        let mut completed = stream::iter(ids.iter().copied().enumerate())
            .map(|(index, id)| async move { (index, self.fetch_one(id).await) })
            .buffer_unordered(self.max_workers);

        while let Some((index, url)) = completed.next().await {
            urls[index] = url;
        }

        let placeholders = urls.iter().filter(|url| **url == self.placeholder).count();
        tracing::info!(
            requested = ids.len(),
            resolved = urls.len() - placeholders,
            placeholders,
            provider = self.source.name(),
            "Poster batch completed"
        );

        urls
    }

    /// Same as [`fetch_many`](Self::fetch_many), paired with the requested IDs
    pub async fn resolve(&self, ids: &[MovieId]) -> Vec<PosterResult> {
        let urls = self.fetch_many(ids).await;
        ids.iter()
            .zip(urls)
            .map(|(id, url)| PosterResult { id: *id, url })
            .collect()
    }
}
