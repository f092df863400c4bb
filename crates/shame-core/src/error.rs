//! Core error types for shame-core.
//!
//! Nothing inside the core is fatal: malformed input degrades to documented
//! neutral defaults, and delivery failures are reported back to the caller as
//! values. These types cover the remaining genuinely fallible paths
//! (configuration I/O, outbound delivery, validation).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shame-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Outbound delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No config directory could be resolved for this platform
    #[error("Could not resolve a configuration directory")]
    NoConfigDir,
}

/// Outbound delivery errors.
///
/// A failed delivery must leave all countdown/cooldown state untouched so the
/// caller can retry on a later tick.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The channel has no endpoint configured
    #[error("Channel '{channel}' is not configured")]
    NotConfigured { channel: String },

    /// The endpoint rejected the payload
    #[error("Channel '{channel}' rejected the request (HTTP {status}): {body}")]
    Rejected {
        channel: String,
        status: u16,
        body: String,
    },

    /// Transport-level failure
    #[error("Transport error for channel '{channel}': {source}")]
    Transport {
        channel: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint URL is malformed
    #[error("Invalid endpoint URL for channel '{channel}': {message}")]
    InvalidEndpoint { channel: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Weights must sum to 1.0
    #[error("Score weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
