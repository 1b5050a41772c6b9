/// TMDB poster source
///
/// Reads `poster_path` from GET /movie/{id}, authenticating with a v4 read
/// access token sent as a bearer credential.
use crate::{
    config::Config,
    models::{MovieId, TmdbMovieDetails},
    services::posters::{FetchError, PosterSource},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbPosterSource {
    http_client: HttpClient,
    api_url: String,
    token: String,
    language: String,
}

impl std::fmt::Debug for TmdbPosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbPosterSource")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("language", &self.language)
            .finish()
    }
}

impl TmdbPosterSource {
    /// Creates a TMDB source whose requests give up after `timeout`
    pub fn new(
        api_url: String,
        token: String,
        language: String,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            token,
            language,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.tmdb_api_url.clone(),
            config.tmdb_token.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.poster_timeout_secs),
        )
    }

    fn movie_url(&self, id: MovieId) -> String {
        format!("{}/movie/{}", self.api_url.trim_end_matches('/'), id)
    }
}

#[async_trait::async_trait]
impl PosterSource for TmdbPosterSource {
    async fn fetch_poster_path(&self, id: MovieId) -> Result<Option<String>, FetchError> {
        let response = self
            .http_client
            .get(self.movie_url(id))
            .bearer_auth(&self.token)
            .query(&[("language", self.language.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                movie_id = %id,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let details: TmdbMovieDetails = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(
                movie_id = %id,
                error = %e,
                response = %body,
                "Failed to deserialize TMDB response"
            );
            FetchError::Decode(e.to_string())
        })?;

        Ok(details.poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
