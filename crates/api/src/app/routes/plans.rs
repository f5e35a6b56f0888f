//! Public plan catalog and pricing endpoints (marketing/pricing pages).

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use hure_plans::{bundle_quote, plan_details, PlanProduct, CATALOG};

use crate::app::dto::BundleQuoteQuery;
use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/bundle-quote", get(quote_bundle))
        .route("/plans/:product/:key", get(get_plan))
}

/// GET /plans — the whole catalog.
pub async fn list_plans() -> impl IntoResponse {
    Json(serde_json::json!({ "plans": CATALOG }))
}

/// GET /plans/:product/:key — one tier.
pub async fn get_plan(Path((product, key)): Path<(String, String)>) -> axum::response::Response {
    let product: PlanProduct = match product.parse() {
        Ok(product) => product,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_product", e.to_string()),
    };

    match plan_details(product, &key) {
        Some(tier) => (StatusCode::OK, Json(serde_json::json!({ "plan": tier }))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "plan not found"),
    }
}

/// GET /plans/bundle-quote?core=...&care=... — core + care at the bundle
/// discount. Unknown keys come back as the zeroed quote, not an error.
pub async fn quote_bundle(Query(query): Query<BundleQuoteQuery>) -> impl IntoResponse {
    Json(bundle_quote(&query.core, query.care.as_deref()))
}
