//! Inbound events and command invocations.

/// Kinds of events a plugin can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Nick,
    Join,
    Raw,
}

/// A message as received, before any interpretation.
///
/// Numeric replies use their three-digit code as `command` (e.g., "352").
/// `args` holds every parameter including the trailing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub command: String,
    pub args: Vec<String>,
}

impl RawMessage {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// An event delivered to subscribed plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A user changed nickname.
    Nick { old: String, new: String },
    /// A user joined a channel. `user` and `host` come from the message prefix.
    Join {
        channel: String,
        nick: String,
        user: String,
        host: String,
    },
    /// Any message, including numerics.
    Raw(RawMessage),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Nick { .. } => EventKind::Nick,
            Self::Join { .. } => EventKind::Join,
            Self::Raw(_) => EventKind::Raw,
        }
    }
}

/// Connection state visible to event handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    /// The bot's current nickname.
    pub own_nick: String,
}

/// A parsed command addressed to a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Nickname of the user who sent the command.
    pub sender: String,
    /// Where the command was sent (a channel or the bot's nick).
    pub destination: String,
    /// Channel the command acts on.
    pub target: String,
    /// Arguments after the command name.
    pub args: Vec<String>,
    /// Whether the command was issued in a channel.
    pub in_channel: bool,
}

impl CommandInvocation {
    /// First argument, or an empty string.
    pub fn first_arg(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}
