//! Unified error types for GuildPost.

use thiserror::Error;

/// Result type alias using GuildPostError.
pub type Result<T> = std::result::Result<T, GuildPostError>;

#[derive(Error, Debug)]
pub enum GuildPostError {
    // Template configuration errors — block the template until corrected
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    // Channel errors — per-call collaborator failures, recovered locally
    // inside the delivery tier chain
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("No delivery target available: {0}")]
    NoDeliveryTarget(String),

    // Persistence errors
    #[error("Store error: {0}")]
    Store(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GuildPostError {
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn invalid_template(msg: impl Into<String>) -> Self {
        Self::InvalidTemplate(msg.into())
    }

    /// True for errors that mean the template's stored configuration is bad
    /// and rescheduling must wait for the owner to fix it.
    pub fn is_template_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimezone(_) | Self::InvalidRecurrenceRule(_) | Self::InvalidTemplate(_)
        )
    }
}
