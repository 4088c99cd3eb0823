//! IRC connection configuration.

use serde::Deserialize;

/// IRC server connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Server hostname.
    pub server: String,
    /// Server port (default: 6697).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect over TLS (default: true).
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// Bot nickname.
    pub nickname: String,
    /// Username (ident); defaults to the nickname.
    pub username: Option<String>,
    /// Realname (gecos).
    pub realname: Option<String>,
    /// Server password.
    pub password: Option<String>,
    /// Channels joined after registration.
    #[serde(default)]
    pub channels: Vec<String>,
}

fn default_port() -> u16 {
    6697
}

fn default_use_tls() -> bool {
    true
}

impl IrcConfig {
    /// Build the `irc` crate client configuration.
    pub fn to_client_config(&self) -> irc::client::data::Config {
        irc::client::data::Config {
            nickname: Some(self.nickname.clone()),
            username: self.username.clone(),
            realname: self.realname.clone(),
            password: self.password.clone(),
            server: Some(self.server.clone()),
            port: Some(self.port),
            use_tls: Some(self.use_tls),
            channels: self.channels.clone(),
            ..Default::default()
        }
    }
}
