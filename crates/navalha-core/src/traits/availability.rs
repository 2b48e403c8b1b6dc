// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Availability calculator collaborator.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::error::NavalhaError;
use crate::types::TenantId;

/// Computes open appointment slots for a tenant.
#[async_trait]
pub trait Availability: Send + Sync {
    /// Returns the open start times for the given date, optionally scoped to
    /// one barber and one service. Times are sorted ascending.
    async fn available_slots(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
        service_id: Option<&str>,
    ) -> Result<Vec<NaiveTime>, NavalhaError>;
}
