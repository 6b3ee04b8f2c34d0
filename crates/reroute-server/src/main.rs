//! Reroute Console server: REST + WebSocket surface over the engine.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reroute_server::api;
use reroute_server::config::Config;
use reroute_server::loops;
use reroute_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reroute_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting Reroute Console server...");

    let config = Config::from_env();
    let port = config.server_port;
    let state = Arc::new(AppState::new(config));

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let tick_handle = tokio::spawn(loops::tick_loop::run_tick_loop(
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal_tx = shutdown_tx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
            let _ = signal_tx.send(());
        })
        .await?;

    let _ = shutdown_tx.send(());
    tick_handle.await?;
    tracing::info!("Server stopped");
    Ok(())
}
