//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::connection::IrcConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// IRC connection.
    pub irc: IrcConfig,
    /// Command handling.
    #[serde(default)]
    pub bot: BotConfig,
    /// Track plugin settings.
    #[serde(default)]
    pub track: TrackConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.irc.nickname.trim().is_empty() {
            return Err(ConfigError::Invalid("irc.nickname must not be empty".into()));
        }
        if self.irc.server.trim().is_empty() {
            return Err(ConfigError::Invalid("irc.server must not be empty".into()));
        }
        if self.bot.command_prefix.is_empty() {
            return Err(ConfigError::Invalid("bot.command_prefix must not be empty".into()));
        }
        if self.track.database.is_empty() {
            return Err(ConfigError::Invalid("track.database must not be empty".into()));
        }
        Ok(())
    }
}

/// Command handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Prefix that marks a PRIVMSG as a command (default: "!").
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
        }
    }
}

fn default_command_prefix() -> String {
    "!".to_string()
}

/// Track plugin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Path to the SQLite database file, or ":memory:".
    #[serde(default = "default_track_database")]
    pub database: String,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            database: default_track_database(),
        }
    }
}

fn default_track_database() -> String {
    "mods/track/db/track.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [irc]
        server = "irc.example.net"
        nickname = "TrackBot"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.bot.command_prefix, "!");
        assert_eq!(config.track.database, "mods/track/db/track.db");
        assert_eq!(config.irc.port, 6697);
        assert!(config.irc.use_tls);
        assert!(config.irc.channels.is_empty());
    }

    #[test]
    fn full_config_parses() {
        let config = Config::parse(
            r##"
            [irc]
            server = "irc.example.net"
            port = 6667
            use_tls = false
            nickname = "TrackBot"
            channels = ["#one", "#two"]

            [bot]
            command_prefix = "."

            [track]
            database = "/var/lib/track.db"
            "##,
        )
        .unwrap();
        assert_eq!(config.irc.port, 6667);
        assert!(!config.irc.use_tls);
        assert_eq!(config.irc.channels, vec!["#one", "#two"]);
        assert_eq!(config.bot.command_prefix, ".");
        assert_eq!(config.track.database, "/var/lib/track.db");
    }

    #[test]
    fn empty_nickname_rejected() {
        let err = Config::parse(
            r#"
            [irc]
            server = "irc.example.net"
            nickname = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_irc_section_is_parse_error() {
        assert!(matches!(
            Config::parse("[bot]\ncommand_prefix = \"!\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.irc.nickname, "TrackBot");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/trackbot.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
