use anyhow::{Context, Result};
use dotenv::dotenv;
use movies_api::{
    config::ServerConfig, cors::CorsPolicy, metrics, observability::Observability,
    state::AppState, store::MovieStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let obs = Observability::init()?;
    let config = ServerConfig::from_env()?;

    let store = match &config.seed_path {
        Some(path) => MovieStore::load_from_file(path)
            .with_context(|| format!("loading movies from {}", path.display()))?,
        None => MovieStore::bundled().context("loading bundled movies")?,
    };
    let seeded = store.len().await;
    metrics::CATALOG_SIZE.set(i64::try_from(seeded).unwrap_or(i64::MAX));
    tracing::info!(movies = seeded, "Movie catalog seeded");

    let state = AppState::new(store, obs.registry);
    let app = movies_api::app(state, CorsPolicy::default());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
