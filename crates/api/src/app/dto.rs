//! Request/response DTOs.
//!
//! Every wire shape is an explicit typed record; validation converts them
//! into domain value objects before anything reaches a service, so malformed
//! input fails here with no side effects.

use serde::{Deserialize, Serialize};

use hure_core::{DomainError, EmailAddress, PhoneNumber, TenantId};
use hure_infra::RegisterClinic;
use hure_onboarding::BusinessDetails;
use hure_plans::PlanProduct;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClinicRequest {
    pub name: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub country: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub business_license: Option<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    pub plan_key: String,
    pub plan_product: String,
}

impl RegisterClinicRequest {
    pub fn into_command(self) -> Result<RegisterClinic, DomainError> {
        let product: PlanProduct = self.plan_product.parse()?;
        let email = EmailAddress::new(self.email)?;
        let phone = PhoneNumber::new(self.phone)?;
        let details = BusinessDetails::new(
            self.name,
            self.town,
            self.country,
            self.contact_name,
            email,
            phone,
            self.business_license,
            self.modules,
        )?;

        Ok(RegisterClinic {
            product,
            plan_key: self.plan_key,
            details,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempPasswordRequest {
    pub clinic_id: TenantId,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub clinic_id: TenantId,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub clinic_id: TenantId,
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipPaymentRequest {
    pub clinic_id: TenantId,
}

#[derive(Debug, Deserialize)]
pub struct BundleQuoteQuery {
    pub core: String,
    pub care: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionCheckQuery {
    pub role: String,
    pub capability: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicRegistered {
    pub success: bool,
    pub clinic_id: TenantId,
}

impl ClinicRegistered {
    pub fn new(clinic_id: TenantId) -> Self {
        Self {
            success: true,
            clinic_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
