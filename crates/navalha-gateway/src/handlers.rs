// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook request handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use navalha_whatsapp::{normalize_payload, WebhookPayload};

use crate::server::GatewayState;

/// Query parameters of the platform's subscription handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook
///
/// Echoes the challenge when the verify token matches, 403 otherwise.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let mode_ok = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if mode_ok && token_ok {
        info!("webhook subscription verified");
        return (StatusCode::OK, params.challenge.unwrap_or_default()).into_response();
    }

    warn!(mode = ?params.mode, "webhook verification rejected");
    StatusCode::FORBIDDEN.into_response()
}

/// POST /webhook
///
/// Acknowledges every delivery with 200, including malformed ones; the
/// platform redelivers on any other status and a broken payload will not
/// get better the second time. Each contained message is handled on its
/// own task so the acknowledgement never waits on the flows.
pub async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "discarding malformed webhook payload");
            return StatusCode::OK;
        }
    };

    let deliveries = normalize_payload(&payload);
    debug!(count = deliveries.len(), "webhook deliveries accepted");

    for delivery in deliveries {
        let engine = state.engine.clone();
        tokio::spawn(async move {
            engine
                .handle_message(&delivery.message, delivery.sender_name.as_deref())
                .await;
        });
    }

    StatusCode::OK
}

/// GET /health
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
