//! API-side authorization guard.
//!
//! Route handlers call [`require_capability`] before touching tenant data,
//! keeping the domain crates auth-agnostic. The decision itself is the flat
//! role table in `hure-auth`.

use axum::http::StatusCode;
use axum::response::Response;

use hure_auth::Capability;

use crate::app::errors;
use crate::context::{PrincipalContext, TenantContext};

/// Deny unless the authenticated role grants `capability`.
pub fn require_capability(
    principal: &PrincipalContext,
    capability: Capability,
) -> Result<(), Response> {
    if principal.role().allows(capability) {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("role '{}' lacks '{}'", principal.role(), capability),
        ))
    }
}

/// Deny cross-tenant access: the token's tenant must match the path tenant.
pub fn require_same_tenant(
    tenant: &TenantContext,
    requested: hure_core::TenantId,
) -> Result<(), Response> {
    if tenant.tenant_id() == requested {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "tenant_isolation",
            "token is not valid for the requested tenant",
        ))
    }
}
