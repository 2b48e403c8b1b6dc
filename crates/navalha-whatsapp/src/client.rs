// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the WhatsApp Cloud API message endpoint.
//!
//! Posts outbound payloads with bearer-token authorization and a bounded
//! request timeout. There is no retry: the inbound webhook was already
//! acknowledged, so a failed send is reported to the caller, logged there,
//! and dropped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use navalha_core::error::NavalhaError;
use navalha_core::traits::MessageSender;
use navalha_core::types::{Button, ListSection};

use crate::wire::{InteractiveMessage, OutboundMessage, TextMessage};

/// Client for WhatsApp Cloud API message sends.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    base_url: String,
    phone_number_id: String,
}

impl WhatsAppClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `access_token` - Cloud API bearer token
    /// * `base_url` - Graph API base, e.g. `https://graph.facebook.com/v18.0`
    /// * `phone_number_id` - Bot phone number id (path component of the send endpoint)
    /// * `timeout` - Bound on each outbound request
    pub fn new(
        access_token: &str,
        base_url: &str,
        phone_number_id: &str,
        timeout: Duration,
    ) -> Result<Self, NavalhaError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {access_token}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| NavalhaError::Config(format!("invalid access token value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| NavalhaError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            phone_number_id: phone_number_id.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Posts one payload to the message endpoint.
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), NavalhaError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);

        let response = self
            .http
            .post(&url)
            .json(message)
            .send()
            .await
            .map_err(|e| NavalhaError::Gateway {
                message: format!("send request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavalhaError::Gateway {
                message: format!("platform rejected send with {status}: {body}"),
                source: None,
            });
        }

        debug!(status = %status, "outbound message accepted");
        Ok(())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), NavalhaError> {
        self.send(&OutboundMessage::Text(TextMessage::new(to, body)))
            .await
    }

    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
        footer: Option<&str>,
    ) -> Result<(), NavalhaError> {
        self.send(&OutboundMessage::Interactive(InteractiveMessage::buttons(
            to, body, buttons, header, footer,
        )))
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
        self.send(&OutboundMessage::Interactive(InteractiveMessage::list(
            to,
            body,
            button_label,
            sections,
            header,
        )))
        .await
    }
}
