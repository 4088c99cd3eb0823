//! Integration test common infrastructure.
//!
//! Provides a recording effect sink, a message parser and helpers for
//! building a bot host around a fresh track database.

#![allow(dead_code)]

use irc::proto::Message;
use parking_lot::Mutex;
use slircd_track::TrackPlugin;
use slircd_track::db::Database;
use slircd_track::error::ClientError;
use slircd_track::host::{EffectSink, ModuleManager, handle_message};
use slircd_track::plugin::Effect;
use std::sync::Arc;

pub const BOT_NICK: &str = "TrackBot";

/// Effect sink that remembers everything sent to the server.
#[derive(Default)]
pub struct RecordingSink {
    applied: Mutex<Vec<Effect>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.applied.lock())
    }
}

impl EffectSink for RecordingSink {
    fn apply(&self, effect: Effect) -> Result<(), ClientError> {
        self.applied.lock().push(effect);
        Ok(())
    }
}

/// A host with the track plugin loaded on an in-memory database.
pub struct TestBot {
    pub manager: ModuleManager,
    pub db: Database,
    pub sink: RecordingSink,
}

impl TestBot {
    pub async fn new() -> Self {
        Self::with_database(Database::new(":memory:").await.unwrap())
    }

    pub fn with_database(db: Database) -> Self {
        let manager = ModuleManager::new("!");
        manager
            .register(Arc::new(TrackPlugin::with_database(db.clone())))
            .unwrap();
        Self {
            manager,
            db,
            sink: RecordingSink::default(),
        }
    }

    /// Feed one raw IRC line (without CRLF) through the host.
    pub async fn feed(&self, line: &str) {
        let message: Message = format!("{}\r\n", line).parse().unwrap();
        handle_message(&self.manager, &self.sink, BOT_NICK, &message).await;
    }

    /// Send `text` as a PRIVMSG from `nick` to `#chan`.
    pub async fn command(&self, nick: &str, text: &str) -> Vec<Effect> {
        self.sink.take();
        self.feed(&format!(":{nick}!ident@{nick}.host PRIVMSG #chan :{text}"))
            .await;
        self.sink.take()
    }
}

/// Texts of the Say/Notice effects, in order.
pub fn texts(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(Effect::text)
        .map(str::to_string)
        .collect()
}
