// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborator implementations for Navalha.
//!
//! [`InMemoryBarbershop`] implements every collaborator trait over plain
//! vectors, scoped to a single tenant. It backs the demo deployment and the
//! flow tests; production deployments replace it with adapters over the real
//! barbershop backend.
//!
//! [`RecordingSender`] is a [`MessageSender`] that captures outbound traffic
//! instead of delivering it, for asserting on conversations in tests.

pub mod barbershop;
pub mod sender;

pub use barbershop::InMemoryBarbershop;
pub use sender::{RecordingSender, SentMessage};

// Re-exported so fixture users don't need a direct navalha-core dependency
// for the common case.
pub use navalha_core::traits::MessageSender;
