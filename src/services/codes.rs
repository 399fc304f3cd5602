//! Reset-code lifecycle: issue, verify, mark used, clear
//!
//! Per email there is at most one live record, moving through
//! `NONE -> ACTIVE -> {EXPIRED | USED | NONE}`. Used and expired records
//! verify the same as no record at all. Expiry is checked lazily at
//! verification time; there is no background sweeper.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::reset_record::{RecordStatus, ResetRecord},
    repository::{record_key, CodeStore},
};

/// Source of current time, injected so expiry is testable
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[derive(Clone)]
pub struct ResetCodeService {
    store: Arc<dyn CodeStore>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl ResetCodeService {
    pub fn new(store: Arc<dyn CodeStore>, clock: Arc<dyn Clock>, ttl_minutes: i64) -> Self {
        Self {
            store,
            clock,
            ttl_millis: ttl_minutes * 60 * 1000,
        }
    }

    /// Generate a uniformly random 6-digit code
    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let num = rng.gen_range(100_000..=999_999);
        format!("{:06}", num)
    }

    /// Issue a fresh code for an email, overwriting any prior record,
    /// and return it for delivery
    pub async fn issue(&self, email: &str) -> AppResult<String> {
        let code = Self::generate_code();
        let record = ResetRecord::new(email, &code, self.clock.now_millis());
        let value = serde_json::to_string(&record)
            .map_err(|e| AppError::Internal(format!("Failed to serialize reset record: {}", e)))?;

        self.store.set(&record_key(email), &value).await?;

        tracing::debug!(email = %email, "Issued reset code");
        Ok(code)
    }

    /// Load the record for an email. A stored value that fails JSON parsing
    /// is discarded and treated as absence.
    async fn load(&self, email: &str) -> AppResult<Option<ResetRecord>> {
        let key = record_key(email);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<ResetRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(email = %email, "Discarding corrupt reset record: {}", e);
                self.store.delete(&key).await?;
                Ok(None)
            }
        }
    }

    /// Check a submitted code. Fails closed when no record exists, the record
    /// is used, or the validity window has elapsed; an expired record is
    /// deleted as a side effect. Never mutates `used`.
    pub async fn verify(&self, email: &str, submitted: &str) -> AppResult<bool> {
        let Some(record) = self.load(email).await? else {
            return Ok(false);
        };

        match record.status(self.clock.now_millis(), self.ttl_millis) {
            RecordStatus::Used => Ok(false),
            RecordStatus::Expired => {
                self.store.delete(&record_key(email)).await?;
                tracing::debug!(email = %email, "Reset code expired, record purged");
                Ok(false)
            }
            RecordStatus::Active => Ok(record.code == submitted),
        }
    }

    /// Mark the record used after a successful password update.
    /// No-op when no record exists.
    pub async fn mark_used(&self, email: &str) -> AppResult<()> {
        let Some(mut record) = self.load(email).await? else {
            return Ok(());
        };

        record.used = true;
        let value = serde_json::to_string(&record)
            .map_err(|e| AppError::Internal(format!("Failed to serialize reset record: {}", e)))?;
        self.store.set(&record_key(email), &value).await
    }

    /// Delete any record for the email. No-op when none exists.
    pub async fn clear(&self, email: &str) -> AppResult<()> {
        self.store.delete(&record_key(email)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::repository::memory::MemoryStore;

    /// Manually advanced clock for deterministic expiry tests
    struct FakeClock {
        now: AtomicI64,
    }

    impl FakeClock {
        fn new(start: i64) -> Self {
            Self {
                now: AtomicI64::new(start),
            }
        }

        fn advance_minutes(&self, minutes: i64) {
            self.now.fetch_add(minutes * 60 * 1000, Ordering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn now_millis(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    fn service() -> (ResetCodeService, Arc<MemoryStore>, Arc<FakeClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FakeClock::new(1_700_000_000_000));
        let service = ResetCodeService::new(store.clone(), clock.clone(), 15);
        (service, store, clock)
    }

    #[tokio::test]
    async fn test_issue_then_verify_succeeds() {
        let (service, _, _) = service();

        let code = service.issue("a@x.com").await.unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(service.verify("a@x.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_code_fails() {
        let (service, _, _) = service();

        let code = service.issue("a@x.com").await.unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert!(!service.verify("a@x.com", wrong).await.unwrap());
        // a read never consumes the record
        assert!(service.verify("a@x.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_without_record_fails() {
        let (service, _, _) = service();
        assert!(!service.verify("nobody@x.com", "123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_code_for_other_email_fails() {
        let (service, _, _) = service();

        let code = service.issue("a@x.com").await.unwrap();
        assert!(!service.verify("b@x.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_used_invalidates_code() {
        let (service, _, _) = service();

        let code = service.issue("a@x.com").await.unwrap();
        service.mark_used("a@x.com").await.unwrap();
        assert!(!service.verify("a@x.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_used_without_record_is_noop() {
        let (service, store, _) = service();

        service.mark_used("nobody@x.com").await.unwrap();
        assert_eq!(store.get("reset_nobody@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_invalidates_code() {
        let (service, _, _) = service();

        let code = service.issue("a@x.com").await.unwrap();
        service.clear("a@x.com").await.unwrap();
        assert!(!service.verify("a@x.com", &code).await.unwrap());
        // clearing again stays a no-op
        service.clear("a@x.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_code_fails_and_record_is_purged() {
        let (service, store, clock) = service();

        let code = service.issue("a@x.com").await.unwrap();

        clock.advance_minutes(14);
        assert!(service.verify("a@x.com", &code).await.unwrap());

        clock.advance_minutes(2);
        assert!(!service.verify("a@x.com", &code).await.unwrap());
        assert_eq!(store.get("reset_a@x.com").await.unwrap(), None);

        // a fresh issue still succeeds afterwards
        let code2 = service.issue("a@x.com").await.unwrap();
        assert!(service.verify("a@x.com", &code2).await.unwrap());
    }

    #[tokio::test]
    async fn test_reissue_overwrites_previous_code() {
        let (service, _, _) = service();

        let first = service.issue("a@x.com").await.unwrap();
        let second = service.issue("a@x.com").await.unwrap();

        if first != second {
            assert!(!service.verify("a@x.com", &first).await.unwrap());
        }
        assert!(service.verify("a@x.com", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_records_are_namespaced_per_email() {
        let (service, _, _) = service();

        let code_a = service.issue("a@x.com").await.unwrap();
        let code_b = service.issue("b@x.com").await.unwrap();

        assert!(service.verify("a@x.com", &code_a).await.unwrap());
        assert!(service.verify("b@x.com", &code_b).await.unwrap());

        service.clear("a@x.com").await.unwrap();
        assert!(service.verify("b@x.com", &code_b).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_discarded() {
        let (service, store, _) = service();

        store.set("reset_a@x.com", "{not json").await.unwrap();
        assert!(!service.verify("a@x.com", "123456").await.unwrap());
        // corrupt entry was dropped, not left behind
        assert_eq!(store.get("reset_a@x.com").await.unwrap(), None);

        // and a fresh issue works over the healed slot
        let code = service.issue("a@x.com").await.unwrap();
        assert!(service.verify("a@x.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let (service, _, clock) = service();

        let code = service.issue("a@x.com").await.unwrap();

        clock.advance_minutes(5);
        assert!(service.verify("a@x.com", &code).await.unwrap());

        service.mark_used("a@x.com").await.unwrap();
        assert!(!service.verify("a@x.com", &code).await.unwrap());

        service.clear("a@x.com").await.unwrap();
        assert!(!service.verify("a@x.com", &code).await.unwrap());
    }
}
