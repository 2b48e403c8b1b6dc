// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Revenue and commission reporting collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BarberReport, CommissionSummary, DailyReport};
use crate::error::NavalhaError;
use crate::types::TenantId;

/// Aggregated revenue and commission queries.
#[async_trait]
pub trait Reporting: Send + Sync {
    /// Daily revenue report, tenant-wide or filtered to one barber.
    async fn daily_report(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
        barber_id: Option<&str>,
    ) -> Result<DailyReport, NavalhaError>;

    /// Rolling seven-day commission summary for one barber.
    async fn weekly_commission(
        &self,
        tenant: &TenantId,
        barber_id: &str,
    ) -> Result<CommissionSummary, NavalhaError>;

    /// Revenue for one barber over an inclusive date range.
    async fn barber_revenue(
        &self,
        tenant: &TenantId,
        barber_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarberReport, NavalhaError>;
}
