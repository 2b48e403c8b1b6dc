// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP gateway built on axum.
//!
//! Two jobs: answer the platform's subscription handshake, and turn webhook
//! deliveries into flow engine work. Delivery handling is acknowledged with
//! 200 before the flows run, so slow collaborators never trigger platform
//! redelivery.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
