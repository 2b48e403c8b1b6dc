// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route table and server bootstrap.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use navalha_core::error::NavalhaError;
use navalha_flows::FlowEngine;

use crate::handlers;

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversation engine deliveries are dispatched into.
    pub engine: Arc<FlowEngine>,
    /// Expected token for the subscription handshake.
    pub verify_token: String,
}

/// Bind address for the webhook server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway route table.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds and serves the webhook endpoints until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), NavalhaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NavalhaError::Gateway {
            message: format!("failed to bind webhook server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("webhook server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| NavalhaError::Gateway {
            message: format!("webhook server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
