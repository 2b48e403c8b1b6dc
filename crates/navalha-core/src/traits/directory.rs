// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Barber directory collaborator.

use async_trait::async_trait;

use crate::domain::Barber;
use crate::error::NavalhaError;
use crate::types::TenantId;

/// Read access to a tenant's barber roster.
#[async_trait]
pub trait BarberDirectory: Send + Sync {
    /// Lists the tenant's active barbers.
    async fn active_barbers(&self, tenant: &TenantId) -> Result<Vec<Barber>, NavalhaError>;

    /// Finds the barber whose registered phone matches the sender address.
    async fn find_by_phone(
        &self,
        tenant: &TenantId,
        phone: &str,
    ) -> Result<Option<Barber>, NavalhaError>;

    /// Finds a barber whose full name contains the (lowercased) fragment.
    async fn find_by_name_fragment(
        &self,
        tenant: &TenantId,
        fragment: &str,
    ) -> Result<Option<Barber>, NavalhaError>;
}
