// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Navalha booking engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Navalha configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the WhatsApp credentials must be filled in before `serve` will
/// talk to the platform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NavalhaConfig {
    /// Bot identity and tenant binding.
    #[serde(default)]
    pub agent: AgentConfig,

    /// WhatsApp Cloud API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Booking window and slot granularity settings.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Elevated-role sender allowlists.
    #[serde(default)]
    pub roles: RolesConfig,
}

/// Bot identity and tenant binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in greetings.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Tenant (barbershop) this bot number serves.
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            tenant_id: default_tenant_id(),
        }
    }
}

/// WhatsApp Cloud API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Bearer token for the Cloud API.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Phone number id the bot sends from.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Shared secret echoed during the webhook verification handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Graph API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Outbound request timeout in seconds.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Webhook bind host.
    #[serde(default = "default_webhook_host")]
    pub webhook_host: String,

    /// Webhook bind port.
    #[serde(default = "default_webhook_port")]
    pub webhook_port: u16,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            api_base_url: default_api_base_url(),
            send_timeout_secs: default_send_timeout_secs(),
            webhook_host: default_webhook_host(),
            webhook_port: default_webhook_port(),
        }
    }
}

/// Booking window and slot granularity settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// First bookable hour of the day (inclusive).
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,

    /// Hour the shop closes (exclusive; no slot starts at or after it).
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,

    /// Slot granularity in minutes.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    /// How many calendar days ahead the date picker offers.
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            slot_minutes: default_slot_minutes(),
            days_ahead: default_days_ahead(),
        }
    }
}

/// Sender addresses granted elevated report access.
///
/// Staff membership is resolved against the barber directory instead; these
/// lists only cover roles the directory cannot answer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RolesConfig {
    /// Sender addresses treated as managers.
    #[serde(default)]
    pub manager_numbers: Vec<String>,

    /// Sender addresses treated as owners.
    #[serde(default)]
    pub owner_numbers: Vec<String>,
}

fn default_agent_name() -> String {
    "navalha".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tenant_id() -> String {
    "default-barbershop".to_string()
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com/v18.0".to_string()
}

fn default_send_timeout_secs() -> u64 {
    10
}

fn default_webhook_host() -> String {
    "0.0.0.0".to_string()
}

fn default_webhook_port() -> u16 {
    8080
}

fn default_open_hour() -> u32 {
    9
}

fn default_close_hour() -> u32 {
    18
}

fn default_slot_minutes() -> u32 {
    30
}

fn default_days_ahead() -> u32 {
    7
}
