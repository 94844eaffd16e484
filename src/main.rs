use std::net::SocketAddr;

use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use calfeed_server::config::ServerConfig;
use calfeed_server::routes;
use calfeed_server::singleton;
use calfeed_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;

    // Creates the data directory, which the instance lock lives inside
    let state = AppState::new(&config.data_dir)?;
    let _lock = singleton::acquire_lock(&config.data_dir)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::app(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Data directory: {}", config.data_dir.display());
    info!("calfeed-server listening on http://{}", addr);
    info!("Calendar feeds served at /calendar/<key>.ics");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
