//! Run command handler.

use std::sync::Arc;

use color_eyre::Result;
use tokio::io::BufReader;

use crate::bot::Bot;
use crate::config::Config;
use crate::transport::{console, ConsoleSink, MessageSink};

use super::{build_container, App};

impl App {
    /// Run the bot over stdin/stdout.
    pub async fn run_bot(&self, json: bool) -> Result<()> {
        let config = Config::load()?;
        let container = build_container(&config)?;

        let bot = container.resolve::<Bot>()?;
        tracing::info!(username = bot.username(), "Bot started");

        let sink: Arc<dyn MessageSink> = Arc::new(ConsoleSink::stdout(json));
        let input = BufReader::new(tokio::io::stdin());
        let handled = console::serve(&bot, input, sink, json).await?;

        tracing::info!(handled, "Input closed, bot stopped");
        Ok(())
    }
}
