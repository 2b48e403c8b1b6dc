// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment repository collaborator.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::domain::{Appointment, NewAppointment};
use crate::error::NavalhaError;
use crate::types::TenantId;

/// Write and lookup access to the appointment book.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Creates an appointment. When `barber_id` is `None` ("any barber"),
    /// the repository assigns an active barber.
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, NavalhaError>;

    /// Start times already taken on the given date, optionally scoped to
    /// one barber. Cancelled appointments do not occupy a slot.
    async fn booked_times(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
    ) -> Result<Vec<NaiveTime>, NavalhaError>;
}
