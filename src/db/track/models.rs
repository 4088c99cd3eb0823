//! Track table row types.

use chrono::{DateTime, Utc};

/// One observed (nickname, hostname) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// `track_id`, assigned by SQLite and never reused.
    pub id: i64,
    pub nickname: String,
    pub hostname: String,
    /// When the pair was first observed. Later sightings do not touch it.
    ///
    /// `None` when the stored value is neither RFC 3339 nor epoch
    /// milliseconds, e.g. rows written by other tools.
    pub seen: Option<DateTime<Utc>>,
}

/// Result of [`super::TrackRepository::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was created with this `track_id`.
    Inserted(i64),
    /// The pair was already known; nothing changed.
    Duplicate,
}

impl UpsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
