//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, recovery};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rescate API",
        version = "1.0.0",
        description = "Password Recovery Code Service REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Rescate Team", email = "contact@rescate.dev")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Recovery
        recovery::request_reset,
        recovery::verify_code,
        recovery::reset_password,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::recovery::RequestReset,
            crate::models::recovery::RequestResetResponse,
            crate::models::recovery::VerifyCode,
            crate::models::recovery::VerifyCodeResponse,
            crate::models::recovery::ResetPassword,
            crate::models::recovery::ResetPasswordResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "recovery", description = "Password recovery flow")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
