//! Console transport: messages are written to a terminal or pipe.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use super::MessageSink;
use crate::bot::Bot;
use crate::error::AppError;
use crate::models::{OutgoingMessage, Update};

/// Chat id given to plain text lines.
pub const CONSOLE_CHAT_ID: i64 = 1;

/// Writes each message as text (buttons indented below it) or, in JSON
/// mode, as one JSON object per line.
pub struct ConsoleSink<W = Stdout> {
    out: Mutex<W>,
    json: bool,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(json: bool) -> Self {
        Self::new(tokio::io::stdout(), json)
    }
}

impl<W> ConsoleSink<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out: Mutex::new(out),
            json,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn render(&self, message: &OutgoingMessage) -> Result<String, AppError> {
        if self.json {
            return Ok(format!("{}\n", serde_json::to_string(message)?));
        }

        let mut rendered = format!("[{}] {}\n", message.chat_id, message.text);
        if let Some(keyboard) = &message.reply_markup {
            for button in keyboard.buttons() {
                rendered.push_str(&format!("    {} <{}>\n", button.text, button.url));
            }
        }
        Ok(rendered)
    }
}

#[async_trait]
impl<W> MessageSink for ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, message: OutgoingMessage) -> Result<(), AppError> {
        let rendered = self.render(&message)?;

        let mut out = self.out.lock().await;
        out.write_all(rendered.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

/// Feeds each input line to the bot until end of input.
///
/// Lines are plain text from [`CONSOLE_CHAT_ID`], or `Update` objects when
/// `json` is set. Malformed JSON lines are skipped. Pending goodbye messages
/// are awaited before returning.
pub async fn serve<R>(
    bot: &Bot,
    input: R,
    sink: Arc<dyn MessageSink>,
    json: bool,
) -> Result<usize, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending = Vec::new();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let update = if json {
            match serde_json::from_str::<Update>(&line) {
                Ok(update) => update,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed update");
                    continue;
                }
            }
        } else {
            Update::text(CONSOLE_CHAT_ID, line)
        };

        handled += 1;
        if let Some(handle) = bot.on_update(update, &sink).await {
            pending.push(handle);
        }
    }

    tracing::debug!(pending = pending.len(), "End of input, waiting for goodbyes");
    for handle in pending {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Goodbye task failed");
        }
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InlineButton, InlineKeyboard};

    fn message() -> OutgoingMessage {
        OutgoingMessage::new(3, "Choose:").with_keyboard(InlineKeyboard::column([
            InlineButton::link("Hotels", "https://hotels.example"),
        ]))
    }

    #[tokio::test]
    async fn test_text_output_lists_buttons() {
        let sink = ConsoleSink::new(Vec::new(), false);
        sink.send(message()).await.unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "[3] Choose:\n    Hotels <https://hotels.example>\n");
    }

    #[tokio::test]
    async fn test_json_output_is_one_line_per_message() {
        let sink = ConsoleSink::new(Vec::new(), true);
        sink.send(message()).await.unwrap();
        sink.send(OutgoingMessage::new(3, "Bye")).await.unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<OutgoingMessage> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines, vec![message(), OutgoingMessage::new(3, "Bye")]);
    }
}
