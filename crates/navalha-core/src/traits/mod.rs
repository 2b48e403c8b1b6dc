// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The conversational engine consumes these interfaces but does not
//! implement them; deployments plug in whatever backend the barbershop
//! management system runs on. All traits use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod appointments;
pub mod availability;
pub mod catalog;
pub mod clients;
pub mod directory;
pub mod reporting;
pub mod sender;

pub use appointments::AppointmentRepository;
pub use availability::Availability;
pub use catalog::ServiceCatalog;
pub use clients::ClientRegistry;
pub use directory::BarberDirectory;
pub use reporting::Reporting;
pub use sender::MessageSender;
