use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDB identifier for a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the recommendation catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
}

/// A resolved poster for one requested movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterResult {
    pub id: MovieId,
    pub url: String,
}

/// A similar movie annotated with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
}

/// Query parameters for GET /api/v1/recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}

/// Body of POST /api/v1/posters
#[derive(Debug, Deserialize)]
pub struct PosterRequest {
    pub ids: Vec<MovieId>,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub posters: Vec<PosterResult>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// The subset of GET /movie/{id} the poster lookup reads
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}
