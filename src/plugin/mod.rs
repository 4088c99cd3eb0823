//! Plugin boundary between the bot host and its modules.
//!
//! A plugin never holds the IRC connection. The host feeds it [`Event`]s and
//! [`CommandInvocation`]s; the plugin answers with [`Effect`]s which the host
//! applies to the connection. This keeps plugin logic testable without a
//! network and lets the host decide how requests are sent.

mod effect;
mod event;

pub use effect::Effect;
pub use event::{CommandInvocation, Event, EventContext, EventKind, RawMessage};

use async_trait::async_trait;

/// A command exposed by a plugin.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Name without the command prefix (e.g., "stats").
    pub name: &'static str,
    /// One-line description shown by `help`.
    pub description: &'static str,
    /// Help lines. `{cmd}` expands to the command name, `{!}` to the prefix.
    pub help: &'static [&'static str],
    /// Whether the first argument names a target channel.
    pub target_channel: bool,
}

/// Static information about a plugin.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub commands: Vec<CommandSpec>,
}

impl PluginDescriptor {
    /// Look up one of this plugin's commands by name.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Trait for bot plugins.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name, author, description and commands.
    fn descriptor(&self) -> &PluginDescriptor;

    /// Event kinds this plugin wants delivered.
    fn subscriptions(&self) -> &'static [EventKind] {
        &[]
    }

    /// Handle an event from the connection.
    async fn handle_event(&self, _event: &Event, _ctx: &EventContext) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle one of the commands listed in the descriptor.
    async fn handle_command(&self, command: &str, invocation: &CommandInvocation) -> Vec<Effect>;

    /// Release resources. Called after the host has detached the plugin.
    async fn unload(&self);
}
