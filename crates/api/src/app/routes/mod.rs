use axum::Router;

pub mod onboard;
pub mod plans;
pub mod rbac;
pub mod system;
pub mod tenants;

/// Routes reachable without a token (marketing site + onboarding wizard).
pub fn public_router() -> Router {
    Router::new()
        .merge(onboard::router())
        .merge(plans::router())
}

/// Routes behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .merge(tenants::router())
        .merge(rbac::router())
}
