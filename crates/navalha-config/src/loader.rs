// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./navalha.toml` > `~/.config/navalha/navalha.toml`
//! > `/etc/navalha/navalha.toml` with environment variable overrides via the
//! `NAVALHA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NavalhaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/navalha/navalha.toml` (system-wide)
/// 3. `~/.config/navalha/navalha.toml` (user XDG config)
/// 4. `./navalha.toml` (local directory)
/// 5. `NAVALHA_*` environment variables
pub fn load_config() -> Result<NavalhaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NavalhaConfig::default()))
        .merge(Toml::file("/etc/navalha/navalha.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("navalha/navalha.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("navalha.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<NavalhaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NavalhaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NavalhaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NavalhaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `NAVALHA_WHATSAPP_ACCESS_TOKEN` must map
/// to `whatsapp.access_token`, not `whatsapp.access.token`.
fn env_provider() -> Env {
    Env::prefixed("NAVALHA_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("booking_", "booking.", 1)
            .replacen("roles_", "roles.", 1);
        mapped.into()
    })
}
