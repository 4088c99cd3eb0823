//! Applying plugin effects to the IRC connection.

use crate::error::ClientError;
use crate::plugin::Effect;
use irc::proto::Command;
use tracing::{debug, warn};

/// Something that can carry out plugin effects.
pub trait EffectSink: Send + Sync {
    fn apply(&self, effect: Effect) -> Result<(), ClientError>;
}

impl EffectSink for irc::client::Sender {
    fn apply(&self, effect: Effect) -> Result<(), ClientError> {
        self.send(to_command(effect))?;
        Ok(())
    }
}

/// Wire command for an effect.
pub fn to_command(effect: Effect) -> Command {
    match effect {
        Effect::Say { target, text } => Command::PRIVMSG(target, text),
        Effect::Notice { target, text } => Command::NOTICE(target, text),
        Effect::Whois { nick } => Command::WHOIS(None, nick),
        Effect::Who { channel } => Command::WHO(Some(channel), None),
    }
}

/// Apply effects in order. A failed send is logged and the rest are dropped.
pub fn apply_effects<S: EffectSink + ?Sized>(sink: &S, effects: Vec<Effect>) {
    let total = effects.len();
    for (sent, effect) in effects.into_iter().enumerate() {
        debug!(effect = ?effect, "Applying effect");
        if let Err(e) = sink.apply(effect) {
            warn!(error = %e, code = e.error_code(), dropped = total - sent - 1, "Failed to send to server");
            return;
        }
    }
}
