//! Recovery API request and response types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Request a reset code for an account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestReset {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResetResponse {
    pub message: String,
    /// True when SMTP delivery did not happen and the code is returned inline
    pub simulated: bool,
    /// Present only on the simulated path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Advisory check of a submitted code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyCode {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be exactly 6 digits"))]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub valid: bool,
}

/// Complete a reset: code plus the new password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPassword {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be exactly 6 digits"))]
    pub code: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = new_password, message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetPasswordResponse {
    pub message: String,
}
