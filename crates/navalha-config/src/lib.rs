// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Navalha booking engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::NavalhaConfig;

/// Load configuration from the XDG hierarchy and run post-deserialization
/// sanity checks.
pub fn load_and_validate() -> Result<NavalhaConfig, figment::Error> {
    let config = loader::load_config()?;
    validate(&config)?;
    Ok(config)
}

/// Checks cross-field constraints Figment cannot express.
pub fn validate(config: &NavalhaConfig) -> Result<(), figment::Error> {
    let booking = &config.booking;
    if booking.open_hour >= booking.close_hour {
        return Err(figment::Error::from(format!(
            "booking.open_hour ({}) must be before booking.close_hour ({})",
            booking.open_hour, booking.close_hour
        )));
    }
    if booking.close_hour > 24 {
        return Err(figment::Error::from(format!(
            "booking.close_hour ({}) must be at most 24",
            booking.close_hour
        )));
    }
    if booking.slot_minutes == 0 || booking.slot_minutes > 60 {
        return Err(figment::Error::from(format!(
            "booking.slot_minutes ({}) must be between 1 and 60",
            booking.slot_minutes
        )));
    }
    if booking.days_ahead == 0 {
        return Err(figment::Error::from(
            "booking.days_ahead must be at least 1".to_string(),
        ));
    }
    Ok(())
}
