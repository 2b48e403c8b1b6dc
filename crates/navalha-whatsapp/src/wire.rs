// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API payload shapes.
//!
//! Inbound: the nested webhook delivery structure
//! (`entry` → `changes` → `value` → `messages`). Outbound: text and
//! interactive (button/list) message payloads. The outbound constructors
//! enforce the platform's structural limits, so callers can pass whatever
//! the catalog returned and still produce a deliverable payload.

use serde::{Deserialize, Serialize};

use navalha_core::types::{Button, ListSection};

/// Max reply buttons per interactive button message.
pub const MAX_BUTTONS: usize = 3;
/// Max characters in a button title.
pub const MAX_BUTTON_TITLE: usize = 20;
/// Max rows per list section.
pub const MAX_LIST_ROWS: usize = 10;
/// Max characters in a list row title.
pub const MAX_ROW_TITLE: usize = 24;
/// Max characters in a list row description.
pub const MAX_ROW_DESCRIPTION: usize = 72;

// --- Inbound webhook payload ---

/// Top-level webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    pub id: String,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub field: String,
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    pub metadata: ChangeMetadata,
    #[serde(default)]
    pub contacts: Option<Vec<WebhookContact>>,
    /// Absent on status-update-only deliveries.
    #[serde(default)]
    pub messages: Option<Vec<RawMessage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeMetadata {
    pub phone_number_id: String,
    #[serde(default)]
    pub display_phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookContact {
    pub profile: ContactProfile,
    pub wa_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactProfile {
    pub name: String,
}

/// A raw inbound message as delivered by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub from: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub interactive: Option<InteractiveReply>,
    #[serde(default)]
    pub button: Option<LegacyButton>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveReply {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub button_reply: Option<ReplyRef>,
    #[serde(default)]
    pub list_reply: Option<ReplyRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRef {
    pub id: String,
    pub title: String,
}

/// Legacy template button reply.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyButton {
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

// --- Outbound payloads ---

/// Any outbound message payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Text(TextMessage),
    Interactive(InteractiveMessage),
}

/// Plain text message.
#[derive(Debug, Clone, Serialize)]
pub struct TextMessage {
    pub messaging_product: &'static str,
    pub recipient_type: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: OutboundTextBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundTextBody {
    pub preview_url: bool,
    pub body: String,
}

impl TextMessage {
    pub fn new(to: &str, body: &str) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.to_string(),
            kind: "text",
            text: OutboundTextBody {
                preview_url: false,
                body: body.to_string(),
            },
        }
    }
}

/// Interactive button or list message.
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveMessage {
    pub messaging_product: &'static str,
    pub recipient_type: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub interactive: InteractiveBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractiveBody {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub body: BodyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<BodyText>,
    pub action: Action,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyText {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ReplyButton>>,
    /// List action button label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButton {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub reply: ReplyButtonRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButtonRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<SectionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Character-boundary-safe truncation.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl InteractiveMessage {
    /// Builds a button message, keeping at most [`MAX_BUTTONS`] buttons and
    /// truncating each title to [`MAX_BUTTON_TITLE`] characters.
    pub fn buttons(
        to: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
        footer: Option<&str>,
    ) -> Self {
        let buttons = buttons
            .iter()
            .take(MAX_BUTTONS)
            .map(|b| ReplyButton {
                kind: "reply",
                reply: ReplyButtonRef {
                    id: b.id.clone(),
                    title: truncate(&b.title, MAX_BUTTON_TITLE),
                },
            })
            .collect();

        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.to_string(),
            kind: "interactive",
            interactive: InteractiveBody {
                kind: "button",
                header: header.map(|text| Header {
                    kind: "text",
                    text: text.to_string(),
                }),
                body: BodyText {
                    text: body.to_string(),
                },
                footer: footer.map(|text| BodyText {
                    text: text.to_string(),
                }),
                action: Action {
                    buttons: Some(buttons),
                    button: None,
                    sections: None,
                },
            },
        }
    }

    /// Builds a list message, truncating each section to [`MAX_LIST_ROWS`]
    /// rows, row titles to [`MAX_ROW_TITLE`] and descriptions to
    /// [`MAX_ROW_DESCRIPTION`] characters.
    pub fn list(
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
        header: Option<&str>,
    ) -> Self {
        let sections = sections
            .iter()
            .map(|section| Section {
                title: truncate(&section.title, MAX_ROW_TITLE),
                rows: section
                    .rows
                    .iter()
                    .take(MAX_LIST_ROWS)
                    .map(|row| SectionRow {
                        id: row.id.clone(),
                        title: truncate(&row.title, MAX_ROW_TITLE),
                        description: row
                            .description
                            .as_deref()
                            .map(|d| truncate(d, MAX_ROW_DESCRIPTION)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.to_string(),
            kind: "interactive",
            interactive: InteractiveBody {
                kind: "list",
                header: header.map(|text| Header {
                    kind: "text",
                    text: text.to_string(),
                }),
                body: BodyText {
                    text: body.to_string(),
                },
                footer: None,
                action: Action {
                    buttons: None,
                    button: Some(button_label.to_string()),
                    sections: Some(sections),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navalha_core::types::ListRow;

    #[test]
    fn button_builder_enforces_count_and_title_limits() {
        let buttons: Vec<Button> = (0..5)
            .map(|i| Button::new(format!("btn_{i}"), "a".repeat(30)))
            .collect();
        let msg = InteractiveMessage::buttons("5511999990000", "Escolha:", &buttons, None, None);

        let built = msg.interactive.action.buttons.unwrap();
        assert_eq!(built.len(), MAX_BUTTONS);
        for b in &built {
            assert_eq!(b.reply.title.chars().count(), MAX_BUTTON_TITLE);
        }
    }

    #[test]
    fn list_builder_caps_rows_and_truncates_titles() {
        let rows: Vec<ListRow> = (0..15)
            .map(|i| ListRow {
                id: format!("row_{i}"),
                title: "t".repeat(40),
                description: Some("d".repeat(100)),
            })
            .collect();
        let sections = [ListSection {
            title: "Servicos Disponiveis e Mais Alguma Coisa".into(),
            rows,
        }];

        let msg =
            InteractiveMessage::list("5511999990000", "Qual servico?", "Ver", &sections, None);
        let built = msg.interactive.action.sections.unwrap();
        assert_eq!(built[0].rows.len(), MAX_LIST_ROWS);
        assert_eq!(built[0].title.chars().count(), MAX_ROW_TITLE);
        assert_eq!(built[0].rows[0].title.chars().count(), MAX_ROW_TITLE);
        assert_eq!(
            built[0].rows[0]
                .description
                .as_ref()
                .unwrap()
                .chars()
                .count(),
            MAX_ROW_DESCRIPTION
        );
    }

    #[test]
    fn truncation_respects_multibyte_chars() {
        // "ã" is two bytes; byte slicing would panic or split the char.
        let title = "ã".repeat(30);
        let msg = InteractiveMessage::buttons(
            "5511999990000",
            "x",
            &[Button::new("b1", title)],
            None,
            None,
        );
        let built = msg.interactive.action.buttons.unwrap();
        assert_eq!(built[0].reply.title.chars().count(), MAX_BUTTON_TITLE);
    }

    #[test]
    fn text_payload_serializes_platform_shape() {
        let msg = TextMessage::new("5511999990000", "Ola!");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["recipient_type"], "individual");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["body"], "Ola!");
        assert_eq!(json["text"]["preview_url"], false);
    }

    #[test]
    fn interactive_payload_omits_absent_header_and_footer() {
        let msg = InteractiveMessage::buttons(
            "5511999990000",
            "corpo",
            &[Button::new("b1", "Um")],
            None,
            None,
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["interactive"].get("header").is_none());
        assert!(json["interactive"].get("footer").is_none());
        assert_eq!(json["interactive"]["type"], "button");
        assert_eq!(
            json["interactive"]["action"]["buttons"][0]["reply"]["id"],
            "b1"
        );
    }
}
