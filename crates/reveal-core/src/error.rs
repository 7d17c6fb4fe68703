//! Core error types for reveal-core.
//!
//! Audio failures are deliberately soft: the coordinator logs and recovers
//! (retry, then manual fallback), so `AudioError` values rarely escape it.
//! Phase timers never depend on audio success.

use std::path::PathBuf;
use thiserror::Error;

use crate::audio::TrackId;

/// Core error type for reveal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio-related errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Share-related errors
    #[error("Share error: {0}")]
    Share(String),

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
}

/// Audio-specific errors, mirroring the recoverable failure taxonomy:
/// autoplay policy rejections and not-ready-in-time both feed the same
/// retry-then-fallback escalation; a suspended context skips the cue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The platform blocked playback without a qualifying user gesture.
    #[error("Autoplay policy rejected playback of '{track}'")]
    PolicyRejected { track: TrackId },

    /// The media element never signalled readiness within the bounded wait.
    #[error("Track '{track}' not ready after {waited_ms}ms")]
    NotReady { track: TrackId, waited_ms: u64 },

    /// The synthetic context is suspended and resume failed.
    #[error("Synthetic audio context is suspended")]
    ContextSuspended,

    /// The synthetic context was never initialized.
    #[error("Synthetic audio context is not initialized")]
    ContextUninitialized,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
