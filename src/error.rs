//! Error types for the bot host.
//!
//! Storage errors live in [`crate::db::DbError`] and configuration errors in
//! [`crate::config::ConfigError`]. Neither ever reaches an IRC user.

use thiserror::Error;

/// Errors from sending requests over the IRC connection.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("irc error: {0}")]
    Irc(#[from] irc::error::Error),

    #[error("connection closed")]
    Disconnected,
}

/// Errors from registering plugins with the module manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("plugin already loaded: {0}")]
    DuplicatePlugin(String),

    #[error("command {command} already provided by plugin {owner}")]
    CommandConflict { command: String, owner: String },
}

impl ClientError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Irc(_) => "irc_error",
            Self::Disconnected => "disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_messages() {
        assert_eq!(
            HostError::DuplicatePlugin("track".into()).to_string(),
            "plugin already loaded: track"
        );
        assert_eq!(
            HostError::CommandConflict {
                command: "stats".into(),
                owner: "track".into()
            }
            .to_string(),
            "command stats already provided by plugin track"
        );
    }

    #[test]
    fn client_error_code() {
        assert_eq!(ClientError::Disconnected.error_code(), "disconnected");
    }
}
