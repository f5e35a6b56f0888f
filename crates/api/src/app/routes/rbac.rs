//! RBAC audit endpoints: the flat permission table, readable over HTTP.
//!
//! Reviewing these responses fully describes the access-control policy; there
//! is no hidden composition to chase.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use hure_auth::{has_permission, Capability, Role};

use crate::app::dto::PermissionCheckQuery;
use crate::app::errors;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/rbac/roles", get(list_roles))
        .route("/rbac/roles/:name", get(get_role))
        .route("/rbac/check", get(check_permission))
}

fn role_row(role: Role) -> serde_json::Value {
    serde_json::json!({
        "role": role.as_str(),
        "capabilities": role.capabilities().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
    })
}

/// GET /rbac/roles — every role row of the table.
pub async fn list_roles(
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(response) = authz::require_capability(&principal, Capability::ViewReports) {
        return response;
    }

    let roles: Vec<_> = Role::ALL.into_iter().map(role_row).collect();
    (StatusCode::OK, Json(serde_json::json!({ "roles": roles }))).into_response()
}

/// GET /rbac/roles/:name — one role row.
pub async fn get_role(
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    if let Err(response) = authz::require_capability(&principal, Capability::ViewReports) {
        return response;
    }

    match name.parse::<Role>() {
        Ok(role) => (StatusCode::OK, Json(role_row(role))).into_response(),
        Err(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
    }
}

/// GET /rbac/check?role=...&capability=... — fail-closed lookup. Unknown
/// names answer `allowed: false` rather than an error.
pub async fn check_permission(
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<PermissionCheckQuery>,
) -> axum::response::Response {
    if let Err(response) = authz::require_capability(&principal, Capability::ViewReports) {
        return response;
    }

    let allowed = has_permission(&query.role, &query.capability);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "role": query.role,
            "capability": query.capability,
            "allowed": allowed,
        })),
    )
        .into_response()
}
