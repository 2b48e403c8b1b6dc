// SPDX-FileCopyrightText: 2026 Navalha Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Navalha conversational booking engine.

use thiserror::Error;

/// The primary error type used across the Navalha workspace.
#[derive(Debug, Error)]
pub enum NavalhaError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Conversation state store errors (missing key, corrupted entry).
    #[error("state error: {message}")]
    State { message: String },

    /// External collaborator errors (catalog, directory, appointments,
    /// reporting lookups or writes failing).
    #[error("collaborator error: {message}")]
    Collaborator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Messaging platform gateway errors (send rejected, transport failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NavalhaError {
    /// Shorthand for a collaborator failure without an underlying source.
    pub fn collaborator(message: impl Into<String>) -> Self {
        NavalhaError::Collaborator {
            message: message.into(),
            source: None,
        }
    }
}
