//! Resolves a poster for every catalog movie and writes the results to JSON.
//!
//! Usage: `prefetch_posters [output]` (defaults to `movies_with_posters.json`)

use std::sync::Arc;

use anyhow::Context;
use movie_recs::{
    config::Config,
    models::MovieId,
    services::{Catalog, PosterResolver, TmdbPosterSource},
};
use serde::Serialize;

const DEFAULT_OUTPUT: &str = "movies_with_posters.json";

#[derive(Serialize)]
struct MovieWithPoster<'a> {
    id: MovieId,
    title: &'a str,
    poster_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_recs::init_tracing();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let config = Config::from_env()?;
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let source = TmdbPosterSource::from_config(&config).context("Failed to build TMDB client")?;
    let resolver = PosterResolver::from_config(&config, Arc::new(source));

    let ids: Vec<MovieId> = catalog.movies().iter().map(|m| m.id).collect();
    let urls = resolver.fetch_many(&ids).await;

    let rows: Vec<MovieWithPoster> = catalog
        .movies()
        .iter()
        .zip(urls)
        .map(|(movie, poster_url)| MovieWithPoster {
            id: movie.id,
            title: &movie.title,
            poster_url,
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output))?;

    tracing::info!(output = %output, movies = rows.len(), "Saved poster URLs");

    Ok(())
}
