// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service catalog collaborator.

use async_trait::async_trait;

use crate::domain::Service;
use crate::error::NavalhaError;
use crate::types::TenantId;

/// Read access to a tenant's service catalog.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Lists the tenant's active services.
    async fn active_services(&self, tenant: &TenantId) -> Result<Vec<Service>, NavalhaError>;
}
