// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `navalha serve` command implementation.
//!
//! Wires the configured WhatsApp client, the in-memory state store and
//! demo backend, and the flow engine into the webhook server, then serves
//! until interrupted.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use navalha_config::model::NavalhaConfig;
use navalha_core::error::NavalhaError;
use navalha_core::types::TenantId;
use navalha_data::InMemoryBarbershop;
use navalha_flows::{Collaborators, EngineSettings, FlowEngine, OpenHoursAvailability};
use navalha_gateway::{GatewayState, ServerConfig};
use navalha_state::store::MemoryStateStore;
use navalha_whatsapp::WhatsAppClient;

/// Runs the `navalha serve` command.
pub async fn run_serve(config: NavalhaConfig) -> Result<(), NavalhaError> {
    init_tracing(&config.agent.log_level);

    info!("starting navalha serve");

    let access_token = require(&config.whatsapp.access_token, "whatsapp.access_token")?;
    let phone_number_id = require(&config.whatsapp.phone_number_id, "whatsapp.phone_number_id")?;
    let verify_token = require(&config.whatsapp.verify_token, "whatsapp.verify_token")?;

    let client = WhatsAppClient::new(
        access_token,
        &config.whatsapp.api_base_url,
        phone_number_id,
        Duration::from_secs(config.whatsapp.send_timeout_secs),
    )?;

    let tenant = TenantId::from(config.agent.tenant_id.as_str());
    let shop = Arc::new(InMemoryBarbershop::seeded(tenant.clone()));
    let availability = Arc::new(OpenHoursAvailability::new(
        shop.clone(),
        config.booking.open_hour,
        config.booking.close_hour,
        config.booking.slot_minutes,
    ));
    let collab = Collaborators {
        catalog: shop.clone(),
        barbers: shop.clone(),
        availability,
        appointments: shop.clone(),
        clients: shop.clone(),
        reporting: shop,
    };
    let settings = EngineSettings {
        shop_name: config.agent.name.clone(),
        days_ahead: config.booking.days_ahead,
        manager_numbers: config.roles.manager_numbers.clone(),
        owner_numbers: config.roles.owner_numbers.clone(),
    };

    let engine = Arc::new(FlowEngine::new(
        tenant,
        Arc::new(MemoryStateStore::new()),
        Arc::new(client),
        collab,
        settings,
    ));

    let server_config = ServerConfig {
        host: config.whatsapp.webhook_host.clone(),
        port: config.whatsapp.webhook_port,
    };
    let state = GatewayState {
        engine,
        verify_token: verify_token.to_string(),
    };

    tokio::select! {
        result = navalha_gateway::start_server(&server_config, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

fn require<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, NavalhaError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NavalhaError::Config(format!("{key} is required for serve")))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("navalha={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
