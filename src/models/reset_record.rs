//! Reset record model and per-email code lifecycle

use serde::{Deserialize, Serialize};

/// Lifecycle state of a stored record at a given instant.
/// `Used` and `Expired` verify the same as no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Active,
    Used,
    Expired,
}

/// One reset record per email, at most one live at a time.
/// Persisted as a JSON object `{email, code, timestamp, used}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRecord {
    pub email: String,
    /// 6-digit numeric string
    pub code: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
    pub used: bool,
}

impl ResetRecord {
    pub fn new(email: &str, code: &str, now_millis: i64) -> Self {
        Self {
            email: email.to_string(),
            code: code.to_string(),
            timestamp: now_millis,
            used: false,
        }
    }

    /// Whether the validity window has elapsed
    pub fn is_expired(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis - self.timestamp > ttl_millis
    }

    pub fn status(&self, now_millis: i64, ttl_millis: i64) -> RecordStatus {
        if self.used {
            RecordStatus::Used
        } else if self.is_expired(now_millis, ttl_millis) {
            RecordStatus::Expired
        } else {
            RecordStatus::Active
        }
    }
}
