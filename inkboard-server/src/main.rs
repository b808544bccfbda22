mod render;
mod routes;
mod singleton;
mod state;
mod tasks;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use inkboard_core::InkboardConfig;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure only one instance is running
    let _lock = singleton::acquire_lock()?;

    let config = InkboardConfig::load()?;
    let port = config.port;
    let state = AppState::new(config)?;

    tasks::spawn_sync_loops(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", routes::api::router())
        .merge(routes::views::router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("inkboard-server listening on http://{}", addr);
    println!("  dashboard: http://{}/dashboard-portrait", addr);
    println!("  kindle:    http://{}/kindle", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
