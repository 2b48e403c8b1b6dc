// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing message sender for tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use navalha_core::error::NavalhaError;
use navalha_core::traits::MessageSender;
use navalha_core::types::{Button, ListSection};

/// One captured outbound message.
#[derive(Debug, Clone)]
pub enum SentMessage {
    Text {
        to: String,
        body: String,
    },
    Buttons {
        to: String,
        body: String,
        buttons: Vec<Button>,
        header: Option<String>,
    },
    List {
        to: String,
        body: String,
        button_label: String,
        sections: Vec<ListSection>,
        header: Option<String>,
    },
}

impl SentMessage {
    /// The body text, whatever the message shape.
    pub fn body(&self) -> &str {
        match self {
            SentMessage::Text { body, .. }
            | SentMessage::Buttons { body, .. }
            | SentMessage::List { body, .. } => body,
        }
    }

    /// Button ids for button messages, row ids for lists, empty for text.
    pub fn choice_ids(&self) -> Vec<&str> {
        match self {
            SentMessage::Text { .. } => Vec::new(),
            SentMessage::Buttons { buttons, .. } => {
                buttons.iter().map(|b| b.id.as_str()).collect()
            }
            SentMessage::List { sections, .. } => sections
                .iter()
                .flat_map(|s| s.rows.iter().map(|r| r.id.as_str()))
                .collect(),
        }
    }
}

/// A [`MessageSender`] that records instead of delivering.
///
/// Set `fail_sends` to exercise the logged-and-dropped send failure path.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    pub fail_sends: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// All captured messages, oldest first.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// The most recent captured message.
    pub async fn last(&self) -> Option<SentMessage> {
        self.sent.lock().await.last().cloned()
    }

    async fn record(&self, message: SentMessage) -> Result<(), NavalhaError> {
        self.sent.lock().await.push(message);
        if self.fail_sends {
            return Err(NavalhaError::Gateway {
                message: "simulated send failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), NavalhaError> {
        self.record(SentMessage::Text {
            to: to.to_string(),
            body: body.to_string(),
        })
        .await
    }

    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
        _footer: Option<&str>,
    ) -> Result<(), NavalhaError> {
        self.record(SentMessage::Buttons {
            to: to.to_string(),
            body: body.to_string(),
            buttons: buttons.to_vec(),
            header: header.map(str::to_string),
        })
        .await
    }

    async fn send_list(
        &self,
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
        header: Option<&str>,
    ) -> Result<(), NavalhaError> {
        self.record(SentMessage::List {
            to: to.to_string(),
            body: body.to_string(),
            button_label: button_label.to_string(),
            sections: sections.to_vec(),
            header: header.map(str::to_string),
        })
        .await
    }
}
