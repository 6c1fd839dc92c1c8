//! The chat bot: routes incoming text to the command service.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::Config;
use crate::di::{Inject, Injectable};
use crate::logger::Logger;
use crate::models::{OutgoingMessage, Update};
use crate::services::CommandService;
use crate::transport::MessageSink;

/// Conversation entry point, resolved from the container.
///
/// The bot owns no state of its own: replies come from the command service
/// and delivery goes through whatever sink the caller passes in.
#[derive(Injectable, Default)]
pub struct Bot {
    #[inject]
    commands: Inject<dyn CommandService>,
    #[inject]
    logger: Inject<dyn Logger>,
    #[inject]
    config: Inject<Config>,
}

impl Bot {
    pub fn username(&self) -> &str {
        &self.config.bot.username
    }

    pub fn token(&self) -> &str {
        &self.config.bot.token
    }

    /// Handles one update.
    ///
    /// Text is trimmed before it is lowercased and matched, so `" Да "` counts
    /// as an answer. Dispatch does not stop at the first failed send: the
    /// failure is logged, and after `да` the options are still sent and the
    /// goodbye is still scheduled even when the reply before them was lost.
    ///
    /// Returns the handle of the delayed goodbye when the user accepted.
    pub async fn on_update(
        &self,
        update: Update,
        sink: &Arc<dyn MessageSink>,
    ) -> Option<JoinHandle<()>> {
        let message = update.message?;
        let text = message.text?;
        let chat_id = message.chat_id;

        match text.trim().to_lowercase().as_str() {
            "/start" => {
                self.deliver(sink, self.commands.start_command(chat_id)).await;
                None
            }
            "/help" => {
                self.deliver(sink, self.commands.help(chat_id)).await;
                None
            }
            "да" => {
                self.deliver(sink, self.commands.handle_user_response(chat_id, &text))
                    .await;
                self.deliver(sink, self.commands.show_travel_options(chat_id))
                    .await;
                Some(self.commands.schedule_goodbye(chat_id, Arc::clone(sink)))
            }
            _ => {
                self.deliver(sink, self.commands.handle_user_response(chat_id, &text))
                    .await;
                None
            }
        }
    }

    async fn deliver(&self, sink: &Arc<dyn MessageSink>, message: OutgoingMessage) {
        if let Err(e) = sink.send(message).await {
            self.logger
                .error(&format!("Ошибка при отправке сообщения: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::logger::TracingLogger;
    use crate::services::TravelCommandService;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<OutgoingMessage>>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, message: OutgoingMessage) -> Result<(), AppError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn bot() -> Arc<Bot> {
        let commands: Arc<dyn CommandService> = Arc::new(TravelCommandService::default());
        let bot = Bot {
            commands: Inject::with(commands),
            logger: Inject::<dyn Logger>::with(Arc::new(TracingLogger)),
            config: Inject::with(Arc::new(Config::default())),
        };
        Arc::new(bot)
    }

    #[tokio::test]
    async fn test_ignores_updates_without_text() {
        let recording = Arc::new(RecordingSink::default());
        let sink: Arc<dyn MessageSink> = recording.clone();

        let handle = bot().on_update(Update { message: None }, &sink).await;
        assert!(handle.is_none());
        assert!(recording.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_identity_comes_from_config() {
        let bot = bot();
        assert_eq!(bot.username(), "BOT_NAME");
        assert_eq!(bot.token(), "BOT_TOKEN");
    }
}
