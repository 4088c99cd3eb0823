//! HOSTLIST command handler.

use crate::db::Database;
use crate::plugin::{CommandInvocation, Effect};
use tracing::{debug, warn};

/// Handle HOSTLIST: hosts seen for a nickname, sent as a notice.
pub async fn handle_hostlist(db: &Database, invocation: &CommandInvocation) -> Vec<Effect> {
    let sender = &invocation.sender;
    let nickname = invocation.first_arg();
    if nickname.is_empty() {
        return vec![Effect::notice(sender, "Syntax: hostlist <nickname>")];
    }

    debug!(nickname = %nickname, "Querying database for nickname");
    match db.track().find_hosts_by_nickname(nickname).await {
        Ok(hosts) if hosts.is_empty() => {
            vec![Effect::notice(sender, format!("No hosts for {} found.", nickname))]
        }
        Ok(hosts) => vec![Effect::notice(
            sender,
            format!("Hosts for {}: {}", nickname, hosts.join(",")),
        )],
        Err(e) => {
            warn!(nickname = %nickname, error = %e, "HOSTLIST lookup failed");
            Vec::new()
        }
    }
}
