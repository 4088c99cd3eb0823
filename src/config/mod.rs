//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct, bot and track sections, loading
//! - [`connection`]: IRC connection settings and conversion to the client config

mod connection;
mod types;

pub use connection::IrcConfig;
pub use types::{BotConfig, Config, ConfigError, TrackConfig};
