// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API integration for Navalha.
//!
//! Owns the platform-specific payload shapes in both directions: webhook
//! delivery deserialization plus normalization into the channel-agnostic
//! [`navalha_core::InboundMessage`], and outbound message construction with
//! the platform's structural limits (button count, list row count, title
//! lengths) enforced at build time.

pub mod client;
pub mod normalize;
pub mod wire;

pub use client::WhatsAppClient;
pub use normalize::{normalize_payload, Delivery};
pub use wire::{InteractiveMessage, OutboundMessage, TextMessage, WebhookPayload};
