// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open-hours availability calculator.
//!
//! Generates fixed-granularity slots across the shop's open hours, removes
//! slots already taken by existing appointments, and, when the requested
//! date is today, removes every slot starting at or before the current
//! hour.

use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::sync::Arc;

use navalha_core::error::NavalhaError;
use navalha_core::traits::{AppointmentRepository, Availability};
use navalha_core::types::TenantId;

/// Pure slot generation.
///
/// `now` is `Some` when the requested date is the current date; in that case
/// no slot at or before the current hour is produced. A zero `slot_minutes`
/// yields no slots.
pub fn generate_slots(
    open_hour: u32,
    close_hour: u32,
    slot_minutes: u32,
    booked: &[NaiveTime],
    now: Option<NaiveTime>,
) -> Vec<NaiveTime> {
    if slot_minutes == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut minutes = open_hour * 60;
    let end = close_hour * 60;

    while minutes < end {
        // from_hms_opt only fails past 24:00, which `end` already excludes.
        if let Some(slot) = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
            let in_the_past = now.is_some_and(|n| slot.hour() <= n.hour());
            if !in_the_past && !booked.contains(&slot) {
                slots.push(slot);
            }
        }
        minutes += slot_minutes;
    }

    slots
}

/// [`Availability`] implementation over the appointment book and the shop's
/// configured open hours.
pub struct OpenHoursAvailability {
    appointments: Arc<dyn AppointmentRepository>,
    open_hour: u32,
    close_hour: u32,
    slot_minutes: u32,
    /// Fixed clock for deterministic tests.
    fixed_now: Option<NaiveDateTime>,
}

impl OpenHoursAvailability {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        open_hour: u32,
        close_hour: u32,
        slot_minutes: u32,
    ) -> Self {
        Self {
            appointments,
            open_hour,
            close_hour,
            slot_minutes,
            fixed_now: None,
        }
    }

    /// Pins "now" for tests.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.fixed_now
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

#[async_trait]
impl Availability for OpenHoursAvailability {
    async fn available_slots(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
        _service_id: Option<&str>,
    ) -> Result<Vec<NaiveTime>, NavalhaError> {
        let booked = self
            .appointments
            .booked_times(tenant, date, barber_id)
            .await?;

        let now = self.now();
        let same_day_cutoff = (now.date() == date).then(|| now.time());

        Ok(generate_slots(
            self.open_hour,
            self.close_hour,
            self.slot_minutes,
            &booked,
            same_day_cutoff,
        ))
    }
}
