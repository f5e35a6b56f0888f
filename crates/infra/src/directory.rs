//! Tenant directory: the system-of-record for clinic accounts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use hure_core::{OtpCode, TenantId};
use hure_onboarding::BusinessDetails;
use hure_plans::{PlanProduct, TenantUsage};

/// Lifecycle of a clinic account as onboarding sees it.
///
/// `Active` is reached by superadmin activation, which is outside this
/// service; onboarding only ever produces the two pending states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicStatus {
    PendingVerification,
    PendingActivation,
}

/// A clinic row as the directory stores it.
///
/// The temporary password is held verbatim at this layer; hashing happens
/// when the identity provider takes over at activation.
#[derive(Debug, Clone)]
pub struct ClinicRecord {
    pub tenant_id: TenantId,
    pub product: PlanProduct,
    pub plan_key: String,
    pub details: BusinessDetails,
    pub status: ClinicStatus,
    pub temp_password: Option<String>,
    pub otp: Option<OtpCode>,
    pub usage: TenantUsage,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("clinic not found")]
    NotFound,

    #[error("a clinic is already registered under '{0}'")]
    DuplicateEmail(String),
}

/// Storage port for clinic accounts.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Insert a new pending clinic. Fails on an email already registered to a
    /// *different* tenant.
    async fn register(&self, record: ClinicRecord) -> Result<(), DirectoryError>;

    /// Replace details/plan of an existing pending clinic (back-navigation
    /// re-submission path).
    async fn update_registration(
        &self,
        tenant_id: TenantId,
        product: PlanProduct,
        plan_key: String,
        details: BusinessDetails,
    ) -> Result<(), DirectoryError>;

    async fn set_temp_password(
        &self,
        tenant_id: TenantId,
        password: String,
    ) -> Result<(), DirectoryError>;

    async fn store_otp(&self, tenant_id: TenantId, code: OtpCode) -> Result<(), DirectoryError>;

    /// True when the stored code matches. A match consumes the stored code.
    async fn consume_otp_if_match(
        &self,
        tenant_id: TenantId,
        code: &OtpCode,
    ) -> Result<bool, DirectoryError>;

    async fn mark_pending_activation(&self, tenant_id: TenantId) -> Result<(), DirectoryError>;

    async fn get(&self, tenant_id: TenantId) -> Option<ClinicRecord>;

    /// The tenant registered under this email, if any.
    async fn find_by_email(&self, email: &str) -> Option<ClinicRecord>;

    /// Current resource counts (mutated by staff/location CRUD elsewhere;
    /// onboarding only reads them).
    async fn usage(&self, tenant_id: TenantId) -> Option<TenantUsage>;
}

/// In-memory directory for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    inner: Mutex<HashMap<TenantId, ClinicRecord>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn register(&self, record: ClinicRecord) -> Result<(), DirectoryError> {
        let mut map = self.inner.lock().await;
        let email = record.details.email.as_str();
        if map
            .values()
            .any(|r| r.tenant_id != record.tenant_id && r.details.email.as_str() == email)
        {
            return Err(DirectoryError::DuplicateEmail(email.to_string()));
        }
        map.insert(record.tenant_id, record);
        Ok(())
    }

    async fn update_registration(
        &self,
        tenant_id: TenantId,
        product: PlanProduct,
        plan_key: String,
        details: BusinessDetails,
    ) -> Result<(), DirectoryError> {
        let mut map = self.inner.lock().await;
        let record = map.get_mut(&tenant_id).ok_or(DirectoryError::NotFound)?;
        record.product = product;
        record.plan_key = plan_key;
        record.details = details;
        Ok(())
    }

    async fn set_temp_password(
        &self,
        tenant_id: TenantId,
        password: String,
    ) -> Result<(), DirectoryError> {
        let mut map = self.inner.lock().await;
        let record = map.get_mut(&tenant_id).ok_or(DirectoryError::NotFound)?;
        record.temp_password = Some(password);
        Ok(())
    }

    async fn store_otp(&self, tenant_id: TenantId, code: OtpCode) -> Result<(), DirectoryError> {
        let mut map = self.inner.lock().await;
        let record = map.get_mut(&tenant_id).ok_or(DirectoryError::NotFound)?;
        record.otp = Some(code);
        Ok(())
    }

    async fn consume_otp_if_match(
        &self,
        tenant_id: TenantId,
        code: &OtpCode,
    ) -> Result<bool, DirectoryError> {
        let mut map = self.inner.lock().await;
        let record = map.get_mut(&tenant_id).ok_or(DirectoryError::NotFound)?;
        if record.otp.as_ref() == Some(code) {
            record.otp = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn mark_pending_activation(&self, tenant_id: TenantId) -> Result<(), DirectoryError> {
        let mut map = self.inner.lock().await;
        let record = map.get_mut(&tenant_id).ok_or(DirectoryError::NotFound)?;
        record.status = ClinicStatus::PendingActivation;
        Ok(())
    }

    async fn get(&self, tenant_id: TenantId) -> Option<ClinicRecord> {
        self.inner.lock().await.get(&tenant_id).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<ClinicRecord> {
        self.inner
            .lock()
            .await
            .values()
            .find(|r| r.details.email.as_str() == email)
            .cloned()
    }

    async fn usage(&self, tenant_id: TenantId) -> Option<TenantUsage> {
        self.inner.lock().await.get(&tenant_id).map(|r| r.usage)
    }
}
