use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationQuery, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(query) = query?;

    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        top_n = query.top_n,
        "Processing recommendation request"
    );

    let recommendations = recommendations::recommend_with_posters(
        &state.catalog,
        &state.poster_resolver,
        &query.title,
        query.top_n,
    )
    .await?;

    Ok(Json(RecommendationResponse {
        title: query.title,
        recommendations,
    }))
}
