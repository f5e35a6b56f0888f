//! Onboarding wizard endpoints (steps 2 through 5 of the flow; step 1 is
//! client-local plan selection and arrives folded into the registration).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use hure_core::{OtpCode, TempPassword, TenantId};

use crate::app::dto::{
    Ack, ClinicRegistered, RegisterClinicRequest, SkipPaymentRequest, TempPasswordRequest,
    VerifyEmailRequest, VerifyOtpRequest,
};
use crate::app::services::AppServices;
use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/onboard/clinic", post(register_clinic))
        .route("/onboard/temp-password", post(set_temp_password))
        .route("/onboard/verify-email", post(verify_email))
        .route("/onboard/verify-otp", post(verify_otp))
        .route("/onboard/skip-payment", post(skip_payment))
        .route("/onboard/:clinic_id/status", get(status))
}

/// POST /onboard/clinic — create (or idempotently update) a pending clinic.
pub async fn register_clinic(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<RegisterClinicRequest>,
) -> axum::response::Response {
    let command = match req.into_command() {
        Ok(command) => command,
        Err(e) => return errors::onboard_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match services.onboarding.register_clinic(command).await {
        Ok(clinic_id) => (StatusCode::OK, Json(ClinicRegistered::new(clinic_id))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /onboard/temp-password — step 3; triggers the first OTP email.
pub async fn set_temp_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<TempPasswordRequest>,
) -> axum::response::Response {
    let password = match TempPassword::new_unconfirmed(req.password) {
        Ok(password) => password,
        Err(e) => return errors::onboard_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match services
        .onboarding
        .set_temp_password(req.clinic_id, &req.email, password)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(Ack::ok())).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /onboard/verify-email — step 4 resend; the step does not move.
pub async fn verify_email(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<VerifyEmailRequest>,
) -> axum::response::Response {
    match services
        .onboarding
        .resend_verification(req.clinic_id, &req.email)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(Ack::ok())).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /onboard/verify-otp — step 4 confirmation.
pub async fn verify_otp(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<VerifyOtpRequest>,
) -> axum::response::Response {
    // Format check first: a malformed code never reaches the directory.
    let code = match OtpCode::new(req.code) {
        Ok(code) => code,
        Err(e) => return errors::onboard_error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match services.onboarding.verify_otp(req.clinic_id, code).await {
        Ok(()) => (StatusCode::OK, Json(Ack::ok())).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /onboard/skip-payment — dev-mode terminal step.
pub async fn skip_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<SkipPaymentRequest>,
) -> axum::response::Response {
    match services.onboarding.skip_payment(req.clinic_id).await {
        Ok(()) => (StatusCode::OK, Json(Ack::ok())).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /onboard/:clinic_id/status — wizard position and audit count.
pub async fn status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(clinic_id): Path<TenantId>,
) -> axum::response::Response {
    match services.onboarding.status(clinic_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
