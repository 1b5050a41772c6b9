use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{PosterRequest, PosterResponse},
    routes::AppState,
};

const MAX_BATCH: usize = 100;

/// Handler for batch poster resolution
///
/// Always answers with one poster per requested ID, in request order.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    request: Result<Json<PosterRequest>, JsonRejection>,
) -> AppResult<Json<PosterResponse>> {
    let Json(request) = request?;

    if request.ids.len() > MAX_BATCH {
        return Err(AppError::InvalidInput(format!(
            "At most {} ids per request",
            MAX_BATCH
        )));
    }

    tracing::info!(
        request_id = %request_id,
        count = request.ids.len(),
        "Processing poster request"
    );

    let posters = state.poster_resolver.resolve(&request.ids).await;

    Ok(Json(PosterResponse { posters }))
}
