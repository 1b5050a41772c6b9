use std::sync::Arc;

use anyhow::Context;
use movie_recs::{
    config::Config,
    routes::{create_router, AppState},
    services::{Catalog, PosterResolver, TmdbPosterSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_recs::init_tracing();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let source = TmdbPosterSource::from_config(&config).context("Failed to build TMDB client")?;
    let resolver = PosterResolver::from_config(&config, Arc::new(source));

    let state = Arc::new(AppState::new(catalog, resolver));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
