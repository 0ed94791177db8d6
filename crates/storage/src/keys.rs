//! Well-known keys in the durable key/value store.

/// Anonymous learner id, stored as a JSON string.
pub const USER_ID: &str = "exam.user_id";

/// Append-only answer log, stored as a JSON array of answer records.
pub const PROGRESS: &str = "exam.progress";
