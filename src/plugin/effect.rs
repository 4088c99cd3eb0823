//! Requests a plugin makes of the IRC connection.

/// An outbound request produced by a plugin.
///
/// Plugins produce effects; the host applies them to the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// PRIVMSG `text` to `target`.
    Say { target: String, text: String },
    /// NOTICE `text` to `target`.
    Notice { target: String, text: String },
    /// Ask the server who `nick` is. The answer arrives later as raw numerics.
    Whois { nick: String },
    /// Ask the server for every member of `channel`.
    Who { channel: String },
}

impl Effect {
    pub fn say(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Say {
            target: target.into(),
            text: text.into(),
        }
    }

    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Notice {
            target: target.into(),
            text: text.into(),
        }
    }

    /// Text of a Say/Notice effect.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Say { text, .. } | Self::Notice { text, .. } => Some(text),
            Self::Whois { .. } | Self::Who { .. } => None,
        }
    }
}
