//! Tenant-scoped reads. Every handler here runs behind bearer auth and the
//! tenant-isolation check.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use hure_auth::Capability;
use hure_core::TenantId;
use hure_plans::{check_plan_limits, plan_details};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/tenants/:tenant_id/limits", get(tenant_limits))
}

/// GET /tenants/:tenant_id/limits — current usage measured against the
/// tenant's plan caps.
pub async fn tenant_limits(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(tenant_id): Path<TenantId>,
) -> axum::response::Response {
    if let Err(response) = authz::require_same_tenant(&tenant, tenant_id) {
        return response;
    }
    if let Err(response) = authz::require_capability(&principal, Capability::ViewReports) {
        return response;
    }

    let Some(record) = services.directory.get(tenant_id).await else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "unknown tenant");
    };
    let Some(plan) = plan_details(record.product, &record.plan_key) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "tenant plan is not in the catalog",
        );
    };

    let report = check_plan_limits(&record.usage, plan);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "tenantId": tenant_id,
            "plan": plan.key,
            "limits": report,
        })),
    )
        .into_response()
}
