//! Plugin host: feeds connection traffic to plugins and applies their effects.
//!
//! - [`manager`]: plugin registry, listeners, command dispatch and help
//! - [`translate`]: wire messages to [`crate::plugin::Event`]s
//! - [`client`]: [`crate::plugin::Effect`]s back onto the connection

mod client;
mod manager;
mod translate;

pub use client::{EffectSink, apply_effects, to_command};
pub use manager::{ModuleManager, is_channel, render_help};
pub use translate::{privmsg, raw_message, to_events};

#[cfg(test)]
pub(crate) use client::test_support;

use crate::plugin::EventContext;
use irc::proto::Message;

/// Handle one inbound message end to end.
///
/// Events are dispatched first, then the message is tried as a command.
/// Effects are applied in the order plugins returned them.
pub async fn handle_message<S: EffectSink + ?Sized>(
    manager: &ModuleManager,
    sink: &S,
    own_nick: &str,
    message: &Message,
) {
    let ctx = EventContext {
        own_nick: own_nick.to_string(),
    };

    for event in to_events(message) {
        let effects = manager.dispatch_event(&event, &ctx).await;
        apply_effects(sink, effects);
    }

    if let Some((sender, destination, text)) = privmsg(message) {
        let effects = manager.dispatch_command(sender, destination, text).await;
        apply_effects(sink, effects);
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;
    use crate::db::Database;
    use crate::plugin::Effect;
    use crate::track::TrackPlugin;
    use std::sync::Arc;

    async fn setup() -> (ModuleManager, Database) {
        let db = Database::new(":memory:").await.unwrap();
        let manager = ModuleManager::new("!");
        manager
            .register(Arc::new(TrackPlugin::with_database(db.clone())))
            .unwrap();
        (manager, db)
    }

    async fn feed(manager: &ModuleManager, sink: &RecordingSink, line: &str) {
        let message: Message = line.parse().unwrap();
        handle_message(manager, sink, "TrackBot", &message).await;
    }

    #[tokio::test]
    async fn own_join_sends_who_and_records_replies() {
        let (manager, db) = setup().await;
        let sink = RecordingSink::default();

        feed(&manager, &sink, ":TrackBot!bot@bot.host JOIN #chan\r\n").await;
        feed(
            &manager,
            &sink,
            ":irc.example.net 352 TrackBot #chan ident user/bob irc.example.net bob H :0 Bob\r\n",
        )
        .await;

        assert_eq!(
            *sink.applied.lock(),
            vec![Effect::Who {
                channel: "#chan".into()
            }]
        );
        assert_eq!(db.track().count().await.unwrap(), 2);
        assert_eq!(
            db.track().find_hosts_by_nickname("bob").await.unwrap(),
            vec!["user/bob"]
        );
    }

    #[tokio::test]
    async fn nick_change_round_trip_through_whois() {
        let (manager, db) = setup().await;
        let sink = RecordingSink::default();

        feed(&manager, &sink, ":alice!ident@host1 NICK alice_\r\n").await;
        feed(
            &manager,
            &sink,
            ":irc.example.net 311 TrackBot alice_ ident host1 * :Alice\r\n",
        )
        .await;

        assert_eq!(
            *sink.applied.lock(),
            vec![Effect::Whois {
                nick: "alice_".into()
            }]
        );
        assert_eq!(
            db.track().find_nicknames_by_hostname("host1").await.unwrap(),
            vec!["alice_"]
        );
    }

    #[tokio::test]
    async fn stats_command_replies_by_notice() {
        let (manager, _db) = setup().await;
        let sink = RecordingSink::default();

        feed(&manager, &sink, ":alice!ident@host1 JOIN #chan\r\n").await;
        feed(&manager, &sink, ":alice!ident@host1 PRIVMSG #chan :!stats\r\n").await;

        assert_eq!(
            *sink.applied.lock(),
            vec![Effect::notice(
                "alice",
                "Number of entries in the database: 1"
            )]
        );
    }
}
