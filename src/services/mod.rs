//! Business logic services

pub mod backend;
pub mod codes;
pub mod email;
pub mod recovery;

use std::sync::Arc;

use crate::{
    config::{BackendConfig, EmailConfig, RecoveryConfig},
    error::AppResult,
    repository::CodeStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub codes: codes::ResetCodeService,
    pub recovery: recovery::RecoveryService,
    pub store: Arc<dyn CodeStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(
        store: Arc<dyn CodeStore>,
        recovery_config: RecoveryConfig,
        email_config: EmailConfig,
        backend_config: BackendConfig,
    ) -> AppResult<Self> {
        let clock = Arc::new(codes::SystemClock);
        let codes = codes::ResetCodeService::new(
            store.clone(),
            clock,
            recovery_config.code_ttl_minutes,
        );
        let mailer = Arc::new(email::EmailService::new(email_config));
        let backend = Arc::new(backend::BackendClient::new(backend_config)?);
        let recovery = recovery::RecoveryService::new(
            codes.clone(),
            mailer,
            backend,
            recovery_config.check_email_exists,
        );

        Ok(Self {
            codes,
            recovery,
            store,
        })
    }
}
