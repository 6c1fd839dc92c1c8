//! Registry command handler.

use color_eyre::Result;

use crate::config::Config;

use super::{build_container, App};

impl App {
    /// Print each contract with the implementation it resolves to.
    pub fn run_registry(&self) -> Result<()> {
        let config = Config::load()?;
        let container = build_container(&config)?;

        for binding in container.bindings() {
            println!("{} -> {}", binding.contract(), binding.implementation());
        }
        for contract in container.registry().unimplemented() {
            println!("{contract} -> (unimplemented)");
        }
        Ok(())
    }
}
