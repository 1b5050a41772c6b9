pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

/// Installs the global `tracing` subscriber, honouring `RUST_LOG`
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,movie_recs=debug"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
