//! Application error types.

use thiserror::Error;

use crate::di::DiError;

/// Application-level errors for Trekbot.
#[derive(Error, Debug)]
pub enum AppError {
    // Container errors
    #[error("Container error: {0}")]
    Container(#[from] DiError),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    // Transport errors
    #[error("Could not deliver message to chat {chat_id}: {message}")]
    Delivery { chat_id: i64, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Stable code for log fields and machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Container(DiError::UnregisteredType { .. }) => "UNREGISTERED_TYPE",
            AppError::Container(DiError::Instantiation { .. }) => "INSTANTIATION_ERROR",
            AppError::Container(DiError::Injection { .. }) => "INJECTION_ERROR",
            AppError::Container(_) => "CONTAINER_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Delivery { .. } => "DELIVERY_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
