//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (directory, OTP dispatcher, service)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> Router {
    build_app_with_services(config).await.0
}

/// Build the router and hand back the wired services as well.
///
/// The black-box tests use the services handle to read the last dispatched
/// OTP, standing in for the verification email inbox.
pub async fn build_app_with_services(config: AppConfig) -> (Router, Arc<AppServices>) {
    let jwt = Arc::new(hure_auth::Hs256JwtValidator::new(
        config.jwt_secret.as_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services(&config));

    // Public routes: prospective tenants have no token yet.
    let public = routes::public_router().layer(Extension(services.clone()));

    // Protected routes: require auth + tenant context.
    let protected = routes::protected_router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let router = Router::new()
        .route("/health", get(routes::system::health))
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new());

    (router, services)
}
