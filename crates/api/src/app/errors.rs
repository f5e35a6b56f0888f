use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hure_infra::ServiceError;

/// Generic error body used by the protected read endpoints.
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Onboarding endpoints answer in the wizard's `{success, error}` shape.
pub fn onboard_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
        .into_response()
}

/// One status code per error bucket; messages pass through verbatim.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::SkipDisabled => StatusCode::FORBIDDEN,
    };
    onboard_error(status, err.to_string())
}
