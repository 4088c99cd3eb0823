//! STATS command handler.

use crate::db::Database;
use crate::plugin::{CommandInvocation, Effect};
use tracing::warn;

/// Handle STATS: total tracked pairs.
pub async fn handle_stats(db: &Database, invocation: &CommandInvocation) -> Vec<Effect> {
    match db.track().count().await {
        Ok(count) => vec![Effect::notice(
            &invocation.sender,
            format!("Number of entries in the database: {}", count),
        )],
        Err(e) => {
            warn!(error = %e, "STATS count failed");
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
    async fn test_stats_counts_distinct_pairs() {
        let db = Database::new(":memory:").await.unwrap();
        for (nick, host) in [("alice", "host1"), ("bob", "host1"), ("alice", "host1")] {
            db.track().upsert(nick, host, Utc::now()).await.unwrap();
        }

        let effects = handle_stats(&db, &invocation(&[])).await;

        assert_eq!(
            effects,
            vec![Effect::notice("alice", "Number of entries in the database: 2")]
        );
    }

    #[tokio::test]
    async fn test_stats_silent_on_failure() {
        let db = Database::new(":memory:").await.unwrap();
        db.close().await.unwrap();

        assert!(handle_stats(&db, &invocation(&[])).await.is_empty());
    }
}
