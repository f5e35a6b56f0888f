use hure_auth::Role;
use hure_core::{AccountId, TenantId};

/// Tenant context for a request.
///
/// This is immutable and must be present for all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Principal context for a request (authenticated identity + role).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    account_id: AccountId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
