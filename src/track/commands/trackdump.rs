//! TRACKDUMP command handler.

use crate::db::Database;
use crate::plugin::{CommandInvocation, Effect};
use tracing::{info, warn};

pub const DUMP_START: &str = "Sending all tracking data...";
pub const DUMP_END: &str = "End of tracking data.";

/// Handle TRACKDUMP: one notice per record between start and end markers.
///
/// Not paginated; large tables produce one notice per row.
pub async fn handle_trackdump(db: &Database, invocation: &CommandInvocation) -> Vec<Effect> {
    let sender = &invocation.sender;
    let records = match db.track().all().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "TRACKDUMP query failed");
            return Vec::new();
        }
    };

    info!(requested_by = %sender, rows = records.len(), "Dumping track data");

    let mut effects = Vec::with_capacity(records.len() + 2);
    effects.push(Effect::notice(sender, DUMP_START));
    effects.extend(records.iter().map(|r| {
        Effect::notice(sender, format!("{} | {} | {}", r.id, r.nickname, r.hostname))
    }));
    effects.push(Effect::notice(sender, DUMP_END));
    effects
}
