//! Outbound message delivery.

pub mod console;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::OutgoingMessage;

pub use console::ConsoleSink;

/// Delivers bot messages to a chat.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: OutgoingMessage) -> Result<(), AppError>;
}
