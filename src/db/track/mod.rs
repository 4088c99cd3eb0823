//! Track repository: observed (nickname, hostname) pairs.

pub mod models;
pub mod queries;

pub use models::{TrackRecord, UpsertOutcome};
pub use queries::TrackRepository;
