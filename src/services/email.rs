//! Email service for delivering reset codes

use std::str::FromStr;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
#[cfg(test)]
use mockall::automock;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// Delivery collaborator for reset codes. The recovery service falls back
/// to the simulated path when delivery is unconfigured or fails.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CodeMailer: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn send_reset_code(&self, to: &str, code: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Rescate Recovery");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Delivery(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Delivery(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Delivery(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            // Use STARTTLS for secure connection
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Delivery(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Delivery(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl CodeMailer for EmailService {
    fn is_configured(&self) -> bool {
        !self.config.smtp_host.is_empty()
    }

    /// Send a reset code, addressing the recipient by the local part
    /// of the email address
    async fn send_reset_code(&self, to: &str, code: &str) -> AppResult<()> {
        let display_name = to.split('@').next().unwrap_or(to);
        let subject = "Your password reset code";
        let body = format!(
            r#"
Hello {name},

Your password reset code is: {code}

This code will expire in 15 minutes and can only be used once.

If you didn't request a password reset, please ignore this email.
"#,
            name = display_name,
            code = code
        );

        self.send_email(to, subject, &body).await
    }
}
