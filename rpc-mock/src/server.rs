/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::node::SharedNode;

pub fn create_router(node: SharedNode) -> Router {
    // Configure CORS to allow requests from browser dApps and tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // JSON-RPC
        .route("/", post(json_rpc))

        // Scripting endpoints
        .route("/mock/call", post(stub_call))
        .route("/mock/log", post(stub_log))
        .route("/mock/block", post(stub_block))
        .route("/mock/transactions", get(sent_transactions))

        // Shared state
        .with_state(node)

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(node: SharedNode, host: String, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("🚀 RPC mock node listening on http://{}", addr);
    log::info!("🔧 Scripting endpoints under /mock");

    axum::serve(listener, create_router(node)).await?;

    Ok(())
}

/// Serve on an ephemeral local port in the background; returns the bound address
pub async fn spawn_local(node: SharedNode) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(node);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("RPC mock node stopped: {}", e);
        }
    });

    log::info!("🚀 RPC mock node listening on http://{}", addr);
    Ok(addr)
}
