use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::Movie, routes::AppState};

/// Handler for the catalog listing endpoint
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.catalog.movies().to_vec())
}
