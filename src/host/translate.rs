//! Translation of wire messages into plugin events.

use crate::plugin::{Event, RawMessage};
use irc::proto::{Command, Message, Prefix};

/// Events carried by one message.
///
/// Every message yields an [`Event::Raw`]; NICK and JOIN additionally yield
/// their typed event first.
pub fn to_events(message: &Message) -> Vec<Event> {
    let mut events = Vec::with_capacity(2);

    match (&message.command, &message.prefix) {
        (Command::NICK(new), Some(Prefix::Nickname(old, _, _))) => {
            events.push(Event::Nick {
                old: old.clone(),
                new: new.clone(),
            });
        }
        (Command::JOIN(channels, _, _), Some(Prefix::Nickname(nick, user, host))) => {
            for channel in channels.split(',').filter(|c| !c.is_empty()) {
                events.push(Event::Join {
                    channel: channel.to_string(),
                    nick: nick.clone(),
                    user: user.clone(),
                    host: host.clone(),
                });
            }
        }
        _ => {}
    }

    events.push(Event::Raw(raw_message(&message.command)));
    events
}

/// The command name (or zero-padded numeric) and its parameters.
pub fn raw_message(command: &Command) -> RawMessage {
    match command {
        Command::Response(response, args) => {
            RawMessage::new(format!("{:03}", *response as u16), args.iter().cloned())
        }
        Command::Raw(name, args) => RawMessage::new(name.clone(), args.iter().cloned()),
        other => split_line(&String::from(other)),
    }
}

/// Split a serialized command line into name and parameters.
fn split_line(line: &str) -> RawMessage {
    let line = line.trim_end_matches(['\r', '\n']);
    let (head, trailing) = match line.split_once(" :") {
        Some((head, trailing)) => (head, Some(trailing)),
        None => (line, None),
    };

    let mut words = head.split(' ').filter(|w| !w.is_empty());
    let name = words.next().unwrap_or_default().to_string();
    let mut args: Vec<String> = words.map(str::to_string).collect();
    if let Some(trailing) = trailing {
        args.push(trailing.to_string());
    }
    RawMessage { command: name, args }
}

/// Sender nickname, target and text of a PRIVMSG.
pub fn privmsg(message: &Message) -> Option<(&str, &str, &str)> {
    match &message.command {
        Command::PRIVMSG(target, text) => {
            Some((message.source_nickname()?, target.as_str(), text.as_str()))
        }
        _ => None,
    }
}
