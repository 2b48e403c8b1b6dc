// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message sender seam.
//!
//! The flows speak to this trait rather than to the platform client
//! directly, so tests can capture outbound traffic and alternative channel
//! implementations stay possible.

use async_trait::async_trait;

use crate::error::NavalhaError;
use crate::types::{Button, ListSection};

/// Sends structured outbound messages to a messaging channel.
///
/// Implementations own the platform payload shape and its structural limits
/// (button count, row count, title lengths).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), NavalhaError>;

    /// Sends an interactive button message (at most 3 buttons survive).
    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[Button],
        header: Option<&str>,
        footer: Option<&str>,
    ) -> Result<(), NavalhaError>;

    /// Sends an interactive list message.
    async fn send_list(
        &self,
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
        header: Option<&str>,
    ) -> Result<(), NavalhaError>;
}
