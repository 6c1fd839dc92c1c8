//! Logging facade handed to collaborators through the container.

use crate::declare_contract;
use crate::di::Injectable;

/// Leveled log sink used by the bot and its services.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

declare_contract!(LOGGER_CONTRACT, dyn Logger);

/// Forwards to `tracing` under the `trekbot::bot` target.
#[derive(Injectable, Default)]
#[injectable(provides(dyn Logger))]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "trekbot::bot", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "trekbot::bot", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "trekbot::bot", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "trekbot::bot", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::Container;

    #[test]
    fn test_logger_contract_is_bound() {
        let container = Container::builder().register::<TracingLogger>().build().unwrap();

        let logger = container.resolve::<dyn Logger>().unwrap();
        logger.info("resolved");
        assert!(container.is_registered::<dyn Logger>());
    }
}
