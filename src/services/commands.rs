//! Chat command handling contract.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::declare_contract;
use crate::models::OutgoingMessage;
use crate::transport::MessageSink;

/// Produces the replies for each step of the conversation.
pub trait CommandService: Send + Sync {
    /// Greeting for `/start`.
    fn start_command(&self, chat_id: i64) -> OutgoingMessage;

    /// Reply to a free-text answer; matching is case-insensitive.
    fn handle_user_response(&self, chat_id: i64, text: &str) -> OutgoingMessage;

    /// The travel options keyboard.
    fn show_travel_options(&self, chat_id: i64) -> OutgoingMessage;

    fn goodbye_message(&self, chat_id: i64) -> OutgoingMessage;

    /// Reply to `/help`.
    fn help(&self, chat_id: i64) -> OutgoingMessage;

    /// Sends the goodbye message after the configured delay.
    fn schedule_goodbye(&self, chat_id: i64, sink: Arc<dyn MessageSink>) -> JoinHandle<()>;
}

declare_contract!(COMMAND_SERVICE_CONTRACT, dyn CommandService);
