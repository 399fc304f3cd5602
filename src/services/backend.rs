//! Client for the external password-update backend
//!
//! Local code verification only gates the flow; this backend is the final
//! authority on whether a password update is accepted.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordBackend: Send + Sync {
    /// Whether an account exists for the email
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    /// Ask the backend to validate the code and persist the new password
    async fn update_password(&self, email: &str, code: &str, new_password: &str) -> AppResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    email: &'a str,
    code: &'a str,
    new_password: &'a str,
}

#[derive(Deserialize)]
struct BackendResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl PasswordBackend for BackendClient {
    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let url = format!("{}{}/email/{}", self.config.base_url, self.config.users_path, email);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::BackendUnreachable(format!("Failed to reach backend: {}", e)))?;

        Ok(response.status().is_success())
    }

    async fn update_password(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        let url = format!("{}{}", self.config.base_url, self.config.reset_path);

        let response = self
            .http
            .post(&url)
            .json(&ResetPasswordBody {
                email,
                code,
                new_password,
            })
            .send()
            .await
            .map_err(|e| AppError::BackendUnreachable(format!("Failed to reach backend: {}", e)))?;

        let status = response.status();
        let body: BackendResponse = response.json().await.unwrap_or(BackendResponse {
            success: false,
            message: None,
        });

        if status.is_success() && body.success {
            Ok(())
        } else {
            // surface the backend's own message when it gives one
            Err(AppError::Backend(
                body.message
                    .unwrap_or_else(|| "Failed to reset password".to_string()),
            ))
        }
    }
}
