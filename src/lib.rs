//! Trekbot - travel chat bot
//!
//! A small type-driven dependency injection container and the bot it wires.

pub mod bot;
pub mod cli;
pub mod config;
pub mod di;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod transport;
