// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Navalha conversational booking engine.
//!
//! This crate provides the conversation data model, the error type, the
//! domain models exchanged with the barbershop backend, and the collaborator
//! traits every other workspace crate builds on.

pub mod domain;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NavalhaError;
pub use types::{
    BarberChoice, Button, ConversationContext, ConversationState, ConversationStep,
    InboundKind, InboundMessage, ListRow, ListSection, TenantId, UserRole,
};

pub use traits::{
    AppointmentRepository, Availability, BarberDirectory, ClientRegistry, MessageSender,
    Reporting, ServiceCatalog,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = NavalhaError::Config("test".into());
        let _state = NavalhaError::State {
            message: "test".into(),
        };
        let _collab = NavalhaError::Collaborator {
            message: "test".into(),
            source: None,
        };
        let _gateway = NavalhaError::Gateway {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _timeout = NavalhaError::Timeout {
            duration: std::time::Duration::from_secs(8),
        };
        let _internal = NavalhaError::Internal("test".into());
    }

    #[test]
    fn all_collaborator_traits_are_exported() {
        // Compile-time check that every collaborator seam is reachable
        // through the crate root.
        fn _assert_catalog<T: ServiceCatalog>() {}
        fn _assert_directory<T: BarberDirectory>() {}
        fn _assert_availability<T: Availability>() {}
        fn _assert_appointments<T: AppointmentRepository>() {}
        fn _assert_clients<T: ClientRegistry>() {}
        fn _assert_reporting<T: Reporting>() {}
        fn _assert_sender<T: MessageSender>() {}
    }
}
