//! Module manager: plugin registry, event listeners and command dispatch.

use crate::error::HostError;
use crate::plugin::{CommandInvocation, Effect, Event, EventContext, EventKind, Plugin};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of loaded plugins.
///
/// Locks are never held across an `.await`: handlers are cloned out first.
pub struct ModuleManager {
    prefix: String,
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
    listeners: RwLock<HashMap<EventKind, Vec<Arc<dyn Plugin>>>>,
    commands: RwLock<HashMap<String, Arc<dyn Plugin>>>,
}

impl ModuleManager {
    /// Create an empty manager. `prefix` marks a message as a command.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            plugins: RwLock::new(Vec::new()),
            listeners: RwLock::new(HashMap::new()),
            commands: RwLock::new(HashMap::new()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load a plugin: register its commands and attach its listeners.
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), HostError> {
        let descriptor = plugin.descriptor();
        let name = descriptor.name;

        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p.descriptor().name == name) {
            return Err(HostError::DuplicatePlugin(name.to_string()));
        }

        let mut commands = self.commands.write();
        for spec in &descriptor.commands {
            let key = spec.name.to_ascii_lowercase();
            if let Some(owner) = commands.get(&key) {
                return Err(HostError::CommandConflict {
                    command: key,
                    owner: owner.descriptor().name.to_string(),
                });
            }
        }
        for spec in &descriptor.commands {
            commands.insert(spec.name.to_ascii_lowercase(), Arc::clone(&plugin));
        }
        drop(commands);

        for kind in plugin.subscriptions() {
            self.on(*kind, Arc::clone(&plugin));
        }

        info!(
            plugin = %name,
            commands = descriptor.commands.len(),
            "Loaded plugin"
        );
        plugins.push(plugin);
        Ok(())
    }

    /// Attach `plugin` as a listener for `kind`.
    pub fn on(&self, kind: EventKind, plugin: Arc<dyn Plugin>) {
        self.listeners.write().entry(kind).or_default().push(plugin);
    }

    /// Detach the plugin named `name` from `kind`.
    pub fn remove_listener(&self, kind: EventKind, name: &str) {
        if let Some(list) = self.listeners.write().get_mut(&kind) {
            list.retain(|p| p.descriptor().name != name);
        }
    }

    /// Plugins currently listening for `kind`.
    pub fn listeners(&self, kind: EventKind) -> Vec<Arc<dyn Plugin>> {
        self.listeners
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of loaded plugins, in load order.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins
            .read()
            .iter()
            .map(|p| p.descriptor().name)
            .collect()
    }

    /// Deliver an event to every listener and collect their effects.
    pub async fn dispatch_event(&self, event: &Event, ctx: &EventContext) -> Vec<Effect> {
        let mut effects = Vec::new();
        for plugin in self.listeners(event.kind()) {
            effects.extend(plugin.handle_event(event, ctx).await);
        }
        effects
    }

    /// Handle a PRIVMSG. Returns no effects for non-commands and unknown commands.
    pub async fn dispatch_command(&self, sender: &str, destination: &str, text: &str) -> Vec<Effect> {
        let Some(body) = text.strip_prefix(self.prefix.as_str()) else {
            return Vec::new();
        };
        let mut words = body.split_whitespace();
        let Some(name) = words.next() else {
            return Vec::new();
        };
        let name = name.to_ascii_lowercase();
        let mut args: Vec<String> = words.map(str::to_string).collect();

        if name == "help" {
            return self.help(sender, args.first().map(String::as_str));
        }

        let owner = self.commands.read().get(&name).cloned();
        let Some(plugin) = owner else {
            debug!(command = %name, sender = %sender, "Unknown command");
            return Vec::new();
        };

        let in_channel = is_channel(destination);
        let takes_channel = plugin
            .descriptor()
            .command(&name)
            .is_some_and(|spec| spec.target_channel);
        let target = if takes_channel && args.first().is_some_and(|a| is_channel(a)) {
            args.remove(0)
        } else if in_channel {
            destination.to_string()
        } else {
            sender.to_string()
        };

        let invocation = CommandInvocation {
            sender: sender.to_string(),
            destination: destination.to_string(),
            target,
            args,
            in_channel,
        };

        debug!(command = %name, sender = %sender, plugin = %plugin.descriptor().name, "Dispatching command");
        plugin.handle_command(&name, &invocation).await
    }

    /// Answer `help` or `help <command>` with notices to `sender`.
    fn help(&self, sender: &str, topic: Option<&str>) -> Vec<Effect> {
        let commands = self.commands.read();
        let Some(topic) = topic else {
            let mut names: Vec<&str> = commands.keys().map(String::as_str).collect();
            names.sort_unstable();
            return vec![Effect::notice(
                sender,
                format!(
                    "Commands: {}. Use {}help <command> for details.",
                    names.join(", "),
                    self.prefix
                ),
            )];
        };

        let topic = topic
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(topic)
            .to_ascii_lowercase();
        let Some(spec) = commands
            .get(&topic)
            .and_then(|p| p.descriptor().command(&topic).cloned())
        else {
            return vec![Effect::notice(sender, format!("No help for {}.", topic))];
        };

        let mut effects = vec![Effect::notice(
            sender,
            format!("{}: {}", spec.name, spec.description),
        )];
        effects.extend(
            spec.help
                .iter()
                .map(|line| Effect::notice(sender, render_help(line, spec.name, &self.prefix))),
        );
        effects
    }

    /// Unload a plugin: detach listeners and commands first, then let it
    /// release its resources. Returns false if no such plugin is loaded.
    pub async fn unload(&self, name: &str) -> bool {
        let plugin = {
            let mut plugins = self.plugins.write();
            let Some(index) = plugins.iter().position(|p| p.descriptor().name == name) else {
                return false;
            };
            plugins.remove(index)
        };

        for kind in plugin.subscriptions() {
            self.remove_listener(*kind, name);
        }
        self.commands
            .write()
            .retain(|_, owner| owner.descriptor().name != name);

        plugin.unload().await;
        info!(plugin = %name, "Unloaded plugin");
        true
    }

    /// Unload every plugin, most recently loaded first.
    pub async fn unload_all(&self) {
        let names: Vec<&'static str> = self.plugin_names().into_iter().rev().collect();
        for name in names {
            self.unload(name).await;
        }
    }
}

/// Expand `{cmd}` and `{!}` in a help line.
pub fn render_help(line: &str, command: &str, prefix: &str) -> String {
    line.replace("{cmd}", command).replace("{!}", prefix)
}

/// Whether `target` names a channel.
pub fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}
