// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state store.
//!
//! Durable mapping from (tenant, sender address) to [`ConversationState`],
//! with get-or-create, partial update, shallow context merge, and reset.
//!
//! Two deliveries for the same sender can arrive close together (double-tap,
//! platform retry) and race on get-or-create and update. All reads and
//! writes for one key must therefore happen under the per-key lock handed
//! out by [`ConversationStore::lock`]; the flow engine holds it for the full
//! handling of one inbound message.

pub mod store;

pub use store::{ConversationStore, MemoryStateStore, StateUpdate};
