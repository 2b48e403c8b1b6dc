// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of webhook deliveries into canonical inbound messages.
//!
//! A single delivery can carry multiple entries, changes, and messages.
//! Only `field == "messages"` changes with a non-empty `messages` array are
//! processed; status-update-only deliveries produce nothing.

use navalha_core::types::{InboundKind, InboundMessage};
use tracing::debug;

use crate::wire::{RawMessage, WebhookPayload};

/// One normalized message together with its delivery envelope data.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message: InboundMessage,
    /// Profile name from the delivery's contacts block, when present.
    pub sender_name: Option<String>,
    /// Receiving bot number, for tenant resolution.
    pub phone_number_id: String,
}

/// Extracts every processable message from a webhook payload.
pub fn normalize_payload(payload: &WebhookPayload) -> Vec<Delivery> {
    let mut deliveries = Vec::new();

    for entry in &payload.entry {
        for change in &entry.changes {
            if change.field != "messages" {
                continue;
            }
            let Some(messages) = change.value.messages.as_ref() else {
                // Status-update-only delivery.
                continue;
            };

            for raw in messages {
                let message = normalize_message(raw);
                if message.kind == InboundKind::Unsupported {
                    debug!(id = %message.id, raw_kind = %raw.kind, "ignoring unsupported message type");
                }
                let sender_name = change.value.contacts.as_ref().and_then(|contacts| {
                    contacts
                        .iter()
                        .find(|c| c.wa_id == raw.from)
                        .or(contacts.first())
                        .map(|c| c.profile.name.clone())
                });

                deliveries.push(Delivery {
                    message,
                    sender_name,
                    phone_number_id: change.value.metadata.phone_number_id.clone(),
                });
            }
        }
    }

    deliveries
}

/// Normalizes one raw message into the canonical shape.
///
/// Interactive replies collapse to the selected id; legacy template buttons
/// prefer the payload over the display text.
pub fn normalize_message(raw: &RawMessage) -> InboundMessage {
    let (kind, text, reply_id) = match raw.kind.as_str() {
        "text" => (
            InboundKind::Text,
            raw.text.as_ref().map(|t| t.body.clone()),
            None,
        ),
        "interactive" => match raw.interactive.as_ref() {
            Some(interactive) if interactive.kind == "button_reply" => (
                InboundKind::ButtonReply,
                None,
                interactive.button_reply.as_ref().map(|r| r.id.clone()),
            ),
            Some(interactive) if interactive.kind == "list_reply" => (
                InboundKind::ListReply,
                None,
                interactive.list_reply.as_ref().map(|r| r.id.clone()),
            ),
            _ => (InboundKind::Unsupported, None, None),
        },
        "button" => (
            InboundKind::Button,
            None,
            raw.button
                .as_ref()
                .and_then(|b| b.payload.clone().or_else(|| b.text.clone())),
        ),
        _ => (InboundKind::Unsupported, None, None),
    };

    InboundMessage {
        id: raw.id.clone(),
        from: raw.from.clone(),
        kind,
        text,
        reply_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    #[test]
    fn text_delivery_normalizes_with_sender_name() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "entry-1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {
                            "display_phone_number": "5511988880000",
                            "phone_number_id": "1010101010"
                        },
                        "contacts": [{
                            "profile": { "name": "Marcos" },
                            "wa_id": "5511999990000"
                        }],
                        "messages": [{
                            "from": "5511999990000",
                            "id": "wamid.abc",
                            "timestamp": "1730000000",
                            "type": "text",
                            "text": { "body": "Oi" }
                        }]
                    }
                }]
            }]
        }));

        let deliveries = normalize_payload(&payload);
        assert_eq!(deliveries.len(), 1);
        let d = &deliveries[0];
        assert_eq!(d.message.from, "5511999990000");
        assert_eq!(d.message.kind, InboundKind::Text);
        assert_eq!(d.message.content(), "Oi");
        assert_eq!(d.sender_name.as_deref(), Some("Marcos"));
        assert_eq!(d.phone_number_id, "1010101010");
    }

    #[test]
    fn status_only_delivery_is_ignored() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "entry-1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "metadata": { "phone_number_id": "1010101010" },
                        "statuses": [{ "id": "wamid.x", "status": "delivered" }]
                    }
                }]
            }]
        }));

        assert!(normalize_payload(&payload).is_empty());
    }

    #[test]
    fn non_message_field_is_ignored() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "entry-1",
                "changes": [{
                    "field": "account_update",
                    "value": {
                        "metadata": { "phone_number_id": "1010101010" },
                        "messages": [{
                            "from": "5511999990000",
                            "id": "wamid.abc",
                            "type": "text",
                            "text": { "body": "Oi" }
                        }]
                    }
                }]
            }]
        }));

        assert!(normalize_payload(&payload).is_empty());
    }

    #[test]
    fn interactive_replies_collapse_to_reply_id() {
        let payload = payload(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "entry-1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "metadata": { "phone_number_id": "1010101010" },
                        "messages": [
                            {
                                "from": "5511999990000",
                                "id": "wamid.btn",
                                "type": "interactive",
                                "interactive": {
                                    "type": "button_reply",
                                    "button_reply": { "id": "schedule", "title": "Agendar horario" }
                                }
                            },
                            {
                                "from": "5511999990000",
                                "id": "wamid.list",
                                "type": "interactive",
                                "interactive": {
                                    "type": "list_reply",
                                    "list_reply": { "id": "service_1", "title": "Corte", "description": "R$ 45" }
                                }
                            }
                        ]
                    }
                }]
            }]
        }));

        let deliveries = normalize_payload(&payload);
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].message.kind, InboundKind::ButtonReply);
        assert_eq!(deliveries[0].message.content(), "schedule");
        assert_eq!(deliveries[1].message.kind, InboundKind::ListReply);
        assert_eq!(deliveries[1].message.content(), "service_1");
    }

    #[test]
    fn unsupported_types_normalize_to_empty_content() {
        let raw: RawMessage = serde_json::from_value(serde_json::json!({
            "from": "5511999990000",
            "id": "wamid.img",
            "type": "image"
        }))
        .unwrap();

        let msg = normalize_message(&raw);
        assert_eq!(msg.kind, InboundKind::Unsupported);
        assert_eq!(msg.content(), "");
    }
}
