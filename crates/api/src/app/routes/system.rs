use axum::http::StatusCode;

/// Liveness probe. No dependencies are checked; the in-memory services
/// cannot be down while the process is up.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
