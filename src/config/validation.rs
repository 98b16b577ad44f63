//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, StorageBackend};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be > 0"));
    }
    let base = &config.listener.base_path;
    if !base.starts_with('/') || (base.len() > 1 && base.ends_with('/')) || base == "/" {
        errors.push(ValidationError::new(
            "listener.base_path",
            "must start with '/' and not end with '/'",
        ));
    }

    let timeouts = [
        ("timeouts.read_header_secs", config.timeouts.read_header_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.shutdown_drain_secs", config.timeouts.shutdown_drain_secs),
        ("timeouts.storage_close_secs", config.timeouts.storage_close_secs),
        ("storage.connect_timeout_secs", config.storage.connect_timeout_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be > 0"));
        }
    }

    if config.storage.backend == StorageBackend::Postgres {
        if config.storage.database_url.trim().is_empty() {
            errors.push(ValidationError::new("storage.database_url", "required for postgres"));
        }
        if config.storage.max_connections == 0 {
            errors.push(ValidationError::new("storage.max_connections", "must be > 0"));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
