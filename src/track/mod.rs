//! Track - records which nicknames have been seen on which hosts.
//!
//! Listens for:
//! - NICK changes (resolved to a host through WHOIS)
//! - JOINs (host taken from the join prefix; a WHO is sent when the bot
//!   itself joins, so existing members get recorded too)
//! - WHO replies (RPL_WHOREPLY)
//!
//! Commands:
//! - NICKLIST <hostname> - nicknames seen on a host
//! - HOSTLIST <nickname> - hosts seen for a nickname
//! - STATS - number of tracked pairs
//! - TRACKDUMP - every tracked pair
//!
//! Storage failures never propagate to the bot. They are logged and the
//! affected event or command produces no output.

mod commands;
mod events;

use crate::config::TrackConfig;
use crate::db::Database;
use crate::plugin::{
    CommandInvocation, Effect, Event, EventContext, EventKind, Plugin, PluginDescriptor,
};
use async_trait::async_trait;
use events::PendingWhois;
use tracing::{error, info};

/// The track plugin.
pub struct TrackPlugin {
    db: Database,
    descriptor: PluginDescriptor,
    pending: PendingWhois,
}

impl TrackPlugin {
    pub const NAME: &'static str = "track";

    /// Open the configured database and build the plugin.
    ///
    /// Open and schema failures are logged; the plugin still loads and its
    /// store reports errors on every call.
    pub async fn load(config: &TrackConfig) -> Self {
        let db = match Database::connect(&config.database).await {
            Ok(db) => {
                if let Err(e) = db.ensure_schema().await {
                    error!(path = %config.database, error = %e, "Failed to create track table");
                }
                db
            }
            Err(e) => {
                error!(path = %config.database, error = %e, "Failed to open track database");
                Database::unavailable(e.to_string())
            }
        };
        Self::with_database(db)
    }

    /// Build the plugin around an already opened database.
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            descriptor: PluginDescriptor {
                name: Self::NAME,
                author: "slircd-track contributors",
                description: "Logs user nicks and hostmasks",
                commands: commands::specs(),
            },
            pending: PendingWhois::default(),
        }
    }

    /// The plugin's store.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Number of nick changes still waiting for a WHOIS answer.
    pub fn pending_lookups(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl Plugin for TrackPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Nick, EventKind::Join, EventKind::Raw]
    }

    async fn handle_event(&self, event: &Event, ctx: &EventContext) -> Vec<Effect> {
        match event {
            Event::Nick { old, new } => events::on_nick_change(&self.pending, old, new),
            Event::Join {
                channel,
                nick,
                host,
                ..
            } => events::on_join(&self.db, ctx, channel, nick, host).await,
            Event::Raw(message) => events::on_raw(&self.db, &self.pending, message).await,
        }
    }

    async fn handle_command(&self, command: &str, invocation: &CommandInvocation) -> Vec<Effect> {
        commands::dispatch(&self.db, command, invocation).await
    }

    async fn unload(&self) {
        match self.db.close().await {
            Ok(()) => info!("Track plugin unloaded"),
            Err(e) => error!(error = %e, "Failed to close track database"),
        }
    }
}
