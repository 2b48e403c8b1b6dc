// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation flows for the Navalha booking engine.
//!
//! [`FlowEngine`] owns the top-level step graph: idle → main menu →
//! scheduling flow or reports flow. Each inbound message is handled under
//! the state store's per-key lock, routed by `current_step`, and answered
//! through the [`navalha_core::MessageSender`] seam. Collaborator failures
//! are caught at the flow boundary and turn into a plain-language apology,
//! never an unhandled fault.

pub mod availability;
pub mod engine;
pub mod query;
mod reports;
mod scheduling;

pub use availability::OpenHoursAvailability;
pub use engine::{Collaborators, EngineSettings, FlowEngine};
