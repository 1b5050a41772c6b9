use crate::{
    error::{AppError, AppResult},
    models::{MovieId, Recommendation},
    services::{catalog::Catalog, posters::PosterResolver},
};

pub const MAX_TOP_N: usize = 50;

/// Finds the movies most similar to `title` and attaches their posters
///
/// Similar movies come from the precomputed catalog; posters are resolved in
/// one bounded batch and zipped back by position, so every recommendation
/// carries a URL even when the poster lookup failed.
pub async fn recommend_with_posters(
    catalog: &Catalog,
    resolver: &PosterResolver,
    title: &str,
    top_n: usize,
) -> AppResult<Vec<Recommendation>> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }

    if top_n == 0 || top_n > MAX_TOP_N {
        return Err(AppError::InvalidInput(format!(
            "top_n must be between 1 and {}",
            MAX_TOP_N
        )));
    }

    let similar = catalog
        .recommend(title, top_n)
        .ok_or_else(|| AppError::NotFound(format!("Unknown title: {}", title)))?;

    let ids: Vec<MovieId> = similar.iter().map(|(movie, _)| movie.id).collect();
    let posters = resolver.fetch_many(&ids).await;

    tracing::info!(
        title = %title,
        results = similar.len(),
        "Recommendations computed"
    );

    Ok(similar
        .into_iter()
        .zip(posters)
        .map(|((movie, score), poster_url)| Recommendation {
            id: movie.id,
            title: movie.title,
            score,
            poster_url,
        })
        .collect())
}
