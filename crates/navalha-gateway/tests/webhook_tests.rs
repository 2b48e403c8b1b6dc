// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler tests via `tower::ServiceExt::oneshot`, no socket involved.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use tower::ServiceExt;

use navalha_core::types::TenantId;
use navalha_data::{InMemoryBarbershop, RecordingSender};
use navalha_flows::{Collaborators, EngineSettings, FlowEngine, OpenHoursAvailability};
use navalha_gateway::{build_router, GatewayState};
use navalha_state::store::MemoryStateStore;

const VERIFY_TOKEN: &str = "segredo-do-webhook";

fn tenant() -> TenantId {
    TenantId::from("default-barbershop")
}

fn app() -> (Router, Arc<RecordingSender>) {
    let shop = Arc::new(InMemoryBarbershop::seeded(tenant()));
    let sender = Arc::new(RecordingSender::new());
    let store = Arc::new(MemoryStateStore::new());
    let availability = Arc::new(OpenHoursAvailability::new(shop.clone(), 9, 18, 30));
    let collab = Collaborators {
        catalog: shop.clone(),
        barbers: shop.clone(),
        availability,
        appointments: shop.clone(),
        clients: shop.clone(),
        reporting: shop,
    };
    let engine = Arc::new(FlowEngine::new(
        tenant(),
        store,
        sender.clone(),
        collab,
        EngineSettings::default(),
    ));
    let state = GatewayState {
        engine,
        verify_token: VERIFY_TOKEN.to_string(),
    };
    (build_router(state), sender)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn text_payload(from: &str, name: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "entry-1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "5511888887777",
                        "phone_number_id": "1234567890"
                    },
                    "contacts": [{"profile": {"name": name}, "wa_id": from}],
                    "messages": [{
                        "from": from,
                        "id": "wamid.test.1",
                        "timestamp": "1700000000",
                        "type": "text",
                        "text": {"body": body}
                    }]
                }
            }]
        }]
    })
}

#[tokio::test]
async fn handshake_echoes_challenge_for_matching_token() {
    let (app, _) = app();
    let uri = format!(
        "/webhook?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=12345"
    );
    let response = app
        .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "12345");
}

#[tokio::test]
async fn handshake_rejects_wrong_token_and_mode() {
    let (app, _) = app();
    let wrong_token = app
        .clone()
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=errado&hub.challenge=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong_token.status(), StatusCode::FORBIDDEN);

    let wrong_mode = app
        .oneshot(
            Request::get(&format!(
                "/webhook?hub.mode=unsubscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=1"
            ))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong_mode.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delivery_is_acknowledged_and_dispatched() {
    let (app, sender) = app();
    let payload = text_payload("5511999990000", "Pedro", "oi");

    let response = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Handling runs on a spawned task; poll until the greeting lands.
    let mut sent = Vec::new();
    for _ in 0..100 {
        sent = sender.sent().await;
        if !sent.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body().contains("Ola Pedro"));
}

#[tokio::test]
async fn malformed_payload_is_still_acknowledged() {
    let (app, sender) = app();

    let response = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from("{nao e json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(sender.sent().await.is_empty());
}

#[tokio::test]
async fn status_only_delivery_produces_no_work() {
    let (app, sender) = app();
    let payload = serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "entry-1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "5511888887777",
                        "phone_number_id": "1234567890"
                    },
                    "statuses": [{"id": "wamid.x", "status": "delivered"}]
                }
            }]
        }]
    });

    let response = app
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(sender.sent().await.is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"status\":\"ok\""));
}
