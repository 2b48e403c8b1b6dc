// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client registry collaborator.

use async_trait::async_trait;

use crate::domain::Client;
use crate::error::NavalhaError;
use crate::types::TenantId;

/// Lookup and creation of client (customer) records.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Finds the client registered under the sender address.
    async fn find_by_phone(
        &self,
        tenant: &TenantId,
        phone: &str,
    ) -> Result<Option<Client>, NavalhaError>;

    /// Creates a client for the sender address with the given display name.
    async fn create(
        &self,
        tenant: &TenantId,
        phone: &str,
        name: &str,
    ) -> Result<Client, NavalhaError>;
}
