//! Track command handlers.
//!
//! Every handler answers the sender directly. Query failures are logged and
//! produce no reply at all.

pub mod hostlist;
pub mod nicklist;
pub mod stats;
pub mod trackdump;

use crate::db::Database;
use crate::plugin::{CommandInvocation, CommandSpec, Effect};
use tracing::debug;

/// Command table advertised in the plugin descriptor.
pub(super) fn specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "nicklist",
            description: "Messages you with the nicks seen on a hostmask",
            help: &[
                "Format: {cmd} <hostname>",
                "Examples:",
                " {!}{cmd} user/alice",
            ],
            target_channel: false,
        },
        CommandSpec {
            name: "hostlist",
            description: "Messages you with the hosts of a user",
            help: &["Format: {cmd} <nickname>", "Examples:", " {!}{cmd} alice"],
            target_channel: false,
        },
        CommandSpec {
            name: "stats",
            description: "Messages you with the number of tracked entries",
            help: &[],
            target_channel: false,
        },
        CommandSpec {
            name: "trackdump",
            description: "Messages you with every tracked nick and host",
            help: &[],
            target_channel: false,
        },
    ]
}

/// Route a command to its handler.
pub(super) async fn dispatch(
    db: &Database,
    command: &str,
    invocation: &CommandInvocation,
) -> Vec<Effect> {
    match command.to_ascii_lowercase().as_str() {
        "nicklist" => nicklist::handle_nicklist(db, invocation).await,
        "hostlist" => hostlist::handle_hostlist(db, invocation).await,
        "stats" => stats::handle_stats(db, invocation).await,
        "trackdump" => trackdump::handle_trackdump(db, invocation).await,
        other => {
            debug!(command = %other, "Not a track command");
            Vec::new()
        }
    }
}
