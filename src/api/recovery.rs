//! Password recovery endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::recovery::{
        RequestReset, RequestResetResponse, ResetPassword, ResetPasswordResponse, VerifyCode,
        VerifyCodeResponse,
    },
    AppState,
};

fn check<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Request a reset code for an account
#[utoipa::path(
    post,
    path = "/recovery/request",
    tag = "recovery",
    request_body = RequestReset,
    responses(
        (status = 200, description = "Code issued; delivered or returned inline", body = RequestResetResponse),
        (status = 400, description = "Invalid email format"),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestReset>,
) -> AppResult<Json<RequestResetResponse>> {
    check(&body)?;

    let outcome = state.services.recovery.request_reset(&body.email).await?;

    Ok(Json(RequestResetResponse {
        message: outcome.message,
        simulated: outcome.simulated,
        code: outcome.code,
    }))
}

/// Check a submitted code without consuming it
#[utoipa::path(
    post,
    path = "/recovery/verify",
    tag = "recovery",
    request_body = VerifyCode,
    responses(
        (status = 200, description = "Verification result", body = VerifyCodeResponse),
        (status = 400, description = "Malformed email or code")
    )
)]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCode>,
) -> AppResult<Json<VerifyCodeResponse>> {
    check(&body)?;

    let valid = state
        .services
        .recovery
        .verify_code(&body.email, &body.code)
        .await?;

    Ok(Json(VerifyCodeResponse { valid }))
}

/// Complete a password reset
#[utoipa::path(
    post,
    path = "/recovery/reset",
    tag = "recovery",
    request_body = ResetPassword,
    responses(
        (status = 200, description = "Password updated", body = ResetPasswordResponse),
        (status = 400, description = "Validation failure or invalid/expired code"),
        (status = 422, description = "Backend rejected the update"),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPassword>,
) -> AppResult<Json<ResetPasswordResponse>> {
    check(&body)?;

    let message = state
        .services
        .recovery
        .complete_reset(&body.email, &body.code, &body.new_password)
        .await?;

    Ok(Json(ResetPasswordResponse { message }))
}
