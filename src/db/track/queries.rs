//! Track repository for database queries.

use super::models::{TrackRecord, UpsertOutcome};
use crate::db::{Database, DbError};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use tracing::debug;

type TrackRow = (i64, String, String, Option<String>);

/// Repository for track operations.
pub struct TrackRepository<'a> {
    db: &'a Database,
}

impl<'a> TrackRepository<'a> {
    /// Create a new track repository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert the pair unless it is already known.
    ///
    /// Two concurrent calls for the same pair race at the UNIQUE constraint;
    /// the loser gets [`UpsertOutcome::Duplicate`], not an error.
    pub async fn upsert(
        &self,
        nickname: &str,
        hostname: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, DbError> {
        if nickname.is_empty() {
            return Err(DbError::InvalidRecord("empty nickname"));
        }
        if hostname.is_empty() {
            return Err(DbError::InvalidRecord("empty hostname"));
        }

        let seen = observed_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let (_slot, pool) = self.db.checkout().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO track (nickname, hostname, seen)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(nickname)
        .bind(hostname)
        .bind(&seen)
        .execute(pool)
        .await;

        match result {
            Ok(done) => Ok(UpsertOutcome::Inserted(done.last_insert_rowid())),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                debug!(nickname = %nickname, hostname = %hostname, "Pair already tracked");
                Ok(UpsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Hostnames seen for an exact nickname, in storage order.
    pub async fn find_hosts_by_nickname(&self, nickname: &str) -> Result<Vec<String>, DbError> {
        let (_slot, pool) = self.db.checkout().await?;
        let hosts = sqlx::query_scalar::<_, String>(
            r#"
            SELECT hostname FROM track
            WHERE nickname = ?
            ORDER BY track_id
            "#,
        )
        .bind(nickname)
        .fetch_all(pool)
        .await?;

        Ok(hosts)
    }

    /// Nicknames seen for an exact hostname, in storage order.
    pub async fn find_nicknames_by_hostname(&self, hostname: &str) -> Result<Vec<String>, DbError> {
        let (_slot, pool) = self.db.checkout().await?;
        let nicks = sqlx::query_scalar::<_, String>(
            r#"
            SELECT nickname FROM track
            WHERE hostname = ?
            ORDER BY track_id
            "#,
        )
        .bind(hostname)
        .fetch_all(pool)
        .await?;

        Ok(nicks)
    }

    /// Total number of tracked pairs.
    pub async fn count(&self) -> Result<i64, DbError> {
        let (_slot, pool) = self.db.checkout().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM track")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Every record, in storage order.
    ///
    /// An unreadable `seen` value never fails the query; see
    /// [`TrackRecord::seen`].
    pub async fn all(&self) -> Result<Vec<TrackRecord>, DbError> {
        let (_slot, pool) = self.db.checkout().await?;
        let rows = sqlx::query_as::<_, TrackRow>(
            r#"
            SELECT track_id, nickname, hostname, CAST(seen AS TEXT)
            FROM track
            ORDER BY track_id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}

fn row_to_record((id, nickname, hostname, seen): TrackRow) -> TrackRecord {
    let parsed = seen.as_deref().and_then(parse_seen);
    if parsed.is_none() {
        debug!(track_id = id, seen = ?seen, "Unreadable seen value");
    }

    TrackRecord {
        id,
        nickname,
        hostname,
        seen: parsed,
    }
}

/// RFC 3339 first, then epoch milliseconds (integer or real).
fn parse_seen(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    let millis = value.trim().parse::<f64>().ok().filter(|m| m.is_finite())?;
    Utc.timestamp_millis_opt(millis as i64).single()
}
