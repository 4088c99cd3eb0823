//! NICKLIST command handler.

use crate::db::Database;
use crate::plugin::{CommandInvocation, Effect};
use tracing::{debug, warn};

/// Handle NICKLIST: nicknames seen on a host, sent as a private message.
pub async fn handle_nicklist(db: &Database, invocation: &CommandInvocation) -> Vec<Effect> {
    let sender = &invocation.sender;
    let hostname = invocation.first_arg();
    if hostname.is_empty() {
        return vec![Effect::say(sender, "Syntax: nicklist <hostname>")];
    }

    debug!(hostname = %hostname, "Querying database for hostname");
    match db.track().find_nicknames_by_hostname(hostname).await {
        Ok(nicks) if nicks.is_empty() => {
            vec![Effect::say(sender, format!("No nicks for {} found.", hostname))]
        }
        Ok(nicks) => vec![Effect::say(
            sender,
            format!("Nicks for {}: {}", hostname, nicks.join(",")),
        )],
        Err(e) => {
            warn!(hostname = %hostname, error = %e, "NICKLIST lookup failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::commands::test_support::invocation;
    use chrono::Utc;

    #[tokio::test]
    async fn test_nicklist_lists_nicks_in_order() {
        let db = Database::new(":memory:").await.unwrap();
        for nick in ["alice", "bob", "alice"] {
            db.track().upsert(nick, "host1", Utc::now()).await.unwrap();
        }

        let effects = handle_nicklist(&db, &invocation(&["host1"])).await;

        assert_eq!(effects, vec![Effect::say("alice", "Nicks for host1: alice,bob")]);
    }

    #[tokio::test]
    async fn test_nicklist_not_found() {
        let db = Database::new(":memory:").await.unwrap();

        let effects = handle_nicklist(&db, &invocation(&["nowhere"])).await;

        assert_eq!(effects, vec![Effect::say("alice", "No nicks for nowhere found.")]);
    }

    #[tokio::test]
    async fn test_nicklist_requires_argument() {
        let db = Database::new(":memory:").await.unwrap();

        let effects = handle_nicklist(&db, &invocation(&[])).await;

        assert_eq!(effects, vec![Effect::say("alice", "Syntax: nicklist <hostname>")]);
    }

    #[tokio::test]
    async fn test_nicklist_silent_on_failure() {
        let db = Database::new(":memory:").await.unwrap();
        db.close().await.unwrap();

        assert!(handle_nicklist(&db, &invocation(&["host1"])).await.is_empty());
    }
}
