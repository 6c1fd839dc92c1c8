//! Domain models for the bot.

mod message;

pub use message::{IncomingMessage, InlineButton, InlineKeyboard, OutgoingMessage, Update};
