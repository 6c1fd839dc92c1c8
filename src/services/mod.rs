//! Bot services.
//!
//! Services are injectables: they declare their collaborators with
//! `#[inject]` and are wired by the container.

mod commands;
mod travel;

pub use commands::CommandService;
pub use travel::{TravelCommandService, TRAVEL_OPTIONS};
