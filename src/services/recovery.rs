//! Password recovery flow
//!
//! Two-phase flow: `request_reset` issues a code and attempts delivery;
//! `complete_reset` gates on a local verify, then lets the backend decide
//! whether the password update is accepted.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::{backend::PasswordBackend, codes::ResetCodeService, email::CodeMailer},
};

/// Outcome of a reset request. On the simulated path the code is handed
/// back to the caller for local display instead of being emailed.
#[derive(Debug)]
pub struct ResetRequestOutcome {
    pub message: String,
    pub simulated: bool,
    pub code: Option<String>,
}

#[derive(Clone)]
pub struct RecoveryService {
    codes: ResetCodeService,
    mailer: Arc<dyn CodeMailer>,
    backend: Arc<dyn PasswordBackend>,
    check_email_exists: bool,
}

impl RecoveryService {
    pub fn new(
        codes: ResetCodeService,
        mailer: Arc<dyn CodeMailer>,
        backend: Arc<dyn PasswordBackend>,
        check_email_exists: bool,
    ) -> Self {
        Self {
            codes,
            mailer,
            backend,
            check_email_exists,
        }
    }

    /// Issue a code and attempt delivery. Delivery failure is never a hard
    /// failure: the flow degrades to returning the code for local display.
    pub async fn request_reset(&self, email: &str) -> AppResult<ResetRequestOutcome> {
        if self.check_email_exists {
            match self.backend.email_exists(email).await {
                Ok(false) => {
                    return Err(AppError::NotFound(
                        "No account is associated with this email".to_string(),
                    ));
                }
                Ok(true) => {}
                // an unreachable backend must not block recovery
                Err(e) => {
                    tracing::warn!(email = %email, "Skipping account check: {}", e);
                }
            }
        }

        let code = self.codes.issue(email).await?;

        if !self.mailer.is_configured() {
            tracing::warn!("SMTP not configured, returning reset code for local display");
            return Ok(Self::simulated_outcome(code));
        }

        match self.mailer.send_reset_code(email, &code).await {
            Ok(()) => {
                tracing::info!(email = %email, "Reset code sent");
                Ok(ResetRequestOutcome {
                    message: format!("Reset code sent to {}. Check your inbox.", email),
                    simulated: false,
                    code: None,
                })
            }
            Err(e) => {
                tracing::warn!(email = %email, "Delivery failed, falling back to local display: {}", e);
                Ok(Self::simulated_outcome(code))
            }
        }
    }

    /// Advisory code check, a pure read that gates UI progression
    pub async fn verify_code(&self, email: &str, code: &str) -> AppResult<bool> {
        self.codes.verify(email, code).await
    }

    /// Complete the reset: local verify, backend password update, then
    /// retire the record
    pub async fn complete_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<String> {
        if !self.codes.verify(email, code).await? {
            return Err(AppError::InvalidCode(
                "Invalid or expired reset code".to_string(),
            ));
        }

        self.backend.update_password(email, code, new_password).await?;

        self.codes.mark_used(email).await?;
        self.codes.clear(email).await?;

        tracing::info!(email = %email, "Password reset completed");
        Ok("Password reset successfully".to_string())
    }

    fn simulated_outcome(code: String) -> ResetRequestOutcome {
        ResetRequestOutcome {
            message: format!(
                "[simulated] Reset code: {}. Configure SMTP for real delivery.",
                code
            ),
            simulated: true,
            code: Some(code),
        }
    }
}
