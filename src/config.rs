//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/trekbot/config.toml` (XDG) or platform config dir
//! 2. Project config: `.trekbot.toml`
//! 3. Environment variables: `TREKBOT_*`, nested keys separated by `__`
//!
//! # Example
//!
//! ```toml
//! [bot]
//! username = "trek_helper_bot"
//! token = "123456:ABC"
//! goodbye_delay_secs = 5
//!
//! [container]
//! cycles = "forbid"
//! ambiguity = "reject"
//! ```
//!
//! Every key has a default, so running without any file works.
//! `TREKBOT_BOT__GOODBYE_DELAY_SECS=1` overrides a single key.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::di::ContainerOptions;

/// Project config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".trekbot.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub container: ContainerOptions,
}

/// Bot identity and behaviour.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub username: String,
    pub token: String,
    /// Delay before the farewell message follows the travel options.
    pub goodbye_delay_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: "BOT_NAME".to_string(),
            token: "BOT_TOKEN".to_string(),
            goodbye_delay_secs: 5,
        }
    }
}

impl BotConfig {
    pub fn goodbye_delay(&self) -> Duration {
        Duration::from_secs(self.goodbye_delay_secs)
    }
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::layered(Self::user_config_path(), PROJECT_CONFIG_FILE)
    }

    /// Load from explicit user and project files, then the environment.
    ///
    /// Missing files are skipped.
    pub fn layered(user: impl AsRef<Path>, project: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user.as_ref()))
            // Layer 2: Project config
            .merge(Toml::file(project.as_ref()))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("TREKBOT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/trekbot/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("trekbot").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("trekbot").join("config.toml"))
            .unwrap_or_default()
    }
}
