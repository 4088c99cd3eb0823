//! Event handlers: turn observed traffic into track rows.

use crate::casemap::{irc_eq, irc_to_lower};
use crate::db::{Database, UpsertOutcome};
use crate::plugin::{Effect, EventContext, RawMessage};
use chrono::Utc;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// RPL_WHOISUSER: `<me> <nick> <user> <host> * :<realname>`
const RPL_WHOISUSER: &str = "311";
/// RPL_ENDOFWHOIS: `<me> <nick> :End of WHOIS list`
const RPL_ENDOFWHOIS: &str = "318";
/// RPL_WHOREPLY: `<me> <channel> <user> <host> <server> <nick> <flags> :<hops> <realname>`
const RPL_WHOREPLY: &str = "352";
/// ERR_NOSUCHNICK: `<me> <nick> :No such nick/channel`
const ERR_NOSUCHNICK: &str = "401";

/// How long a WHOIS may stay unanswered before it is forgotten.
///
/// Servers can drop a WHOIS without any reply (e.g. RPL_TRYAGAIN, which does
/// not name the nick), so entries cannot rely on 318/401 alone.
const WHOIS_TTL: Duration = Duration::from_secs(120);

/// Nicknames we sent a WHOIS for and have not heard back about.
#[derive(Default)]
pub(super) struct PendingWhois {
    nicks: DashMap<String, Instant>,
}

impl PendingWhois {
    fn insert(&self, nick: &str) {
        self.insert_at(nick, Instant::now());
    }

    fn insert_at(&self, nick: &str, now: Instant) {
        self.prune(now);
        self.nicks.insert(irc_to_lower(nick), now);
    }

    fn take(&self, nick: &str) -> bool {
        self.nicks.remove(&irc_to_lower(nick)).is_some()
    }

    /// Forget requests older than [`WHOIS_TTL`].
    fn prune(&self, now: Instant) {
        let before = self.nicks.len();
        self.nicks
            .retain(|_, sent| now.saturating_duration_since(*sent) < WHOIS_TTL);
        let expired = before.saturating_sub(self.nicks.len());
        if expired > 0 {
            debug!(expired, "Dropped unanswered WHOIS requests");
        }
    }

    pub(super) fn len(&self) -> usize {
        self.nicks.len()
    }
}

/// A nick change carries no host, so ask the server.
///
/// The pair is recorded when the RPL_WHOISUSER for `new` arrives.
pub(super) fn on_nick_change(pending: &PendingWhois, old: &str, new: &str) -> Vec<Effect> {
    debug!(old = %old, new = %new, "Nick change, resolving host");
    pending.insert(new);
    vec![Effect::Whois {
        nick: new.to_string(),
    }]
}

/// Record the joining user; when the bot itself joined, also list the channel.
pub(super) async fn on_join(
    db: &Database,
    ctx: &EventContext,
    channel: &str,
    nick: &str,
    host: &str,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    if irc_eq(nick, &ctx.own_nick) {
        info!(channel = %channel, "Joined channel, asking for WHO");
        effects.push(Effect::Who {
            channel: channel.to_string(),
        });
    }

    record(db, nick, host).await;
    effects
}

/// Handle the numerics that carry host information.
pub(super) async fn on_raw(
    db: &Database,
    pending: &PendingWhois,
    message: &RawMessage,
) -> Vec<Effect> {
    match message.command.as_str() {
        RPL_WHOREPLY => match (message.arg(5), message.arg(3)) {
            (Some(nick), Some(host)) => record(db, nick, host).await,
            _ => warn!(args = ?message.args, "Malformed WHO reply"),
        },
        RPL_WHOISUSER => match (message.arg(1), message.arg(3)) {
            (Some(nick), Some(host)) => {
                if pending.take(nick) {
                    debug!(nick = %nick, host = %host, "WHOIS resolved");
                    record(db, nick, host).await;
                }
            }
            _ => warn!(args = ?message.args, "Malformed WHOIS reply"),
        },
        RPL_ENDOFWHOIS | ERR_NOSUCHNICK => {
            if let Some(nick) = message.arg(1)
                && pending.take(nick)
            {
                debug!(nick = %nick, code = %message.command, "WHOIS gave no host, dropping");
            }
        }
        _ => {}
    }
    Vec::new()
}

/// Insert the pair, logging instead of failing.
async fn record(db: &Database, nickname: &str, hostname: &str) {
    debug!(nickname = %nickname, hostname = %hostname, "Adding user to database");
    match db.track().upsert(nickname, hostname, Utc::now()).await {
        Ok(UpsertOutcome::Inserted(id)) => {
            info!(id, nickname = %nickname, hostname = %hostname, "Tracked new nick/host pair");
        }
        Ok(UpsertOutcome::Duplicate) => {}
        Err(e) => {
            warn!(nickname = %nickname, hostname = %hostname, error = %e, "Failed to track nick/host pair");
        }
    }
}
