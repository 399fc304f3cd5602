//! Storage layer for reset records

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::error::AppResult;

/// Key-value store holding serialized reset records.
/// Operations are atomic at single-key granularity; no cross-key
/// coordination is required.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Storage key for an email's reset record. Emails are case-sensitive keys.
pub fn record_key(email: &str) -> String {
    format!("reset_{}", email)
}
