//! Onboarding orchestration: the command pipeline around the session
//! aggregate.
//!
//! Each operation follows the same shape: load the session, let the pure
//! aggregate decide, append the events under an optimistic version check,
//! then perform the side effects (directory writes, OTP dispatch). Domain
//! decisions never happen here.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use hure_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, ExpectedVersion, OtpCode, TempPassword,
    TenantId,
};
use hure_events::EventEnvelope;
use hure_onboarding::session::{
    OnboardingCommand, OnboardingSession, OnboardingStep, RequestOtpResend, SelectPlan, SessionId,
    SetTempPassword, SkipPayment, StepBack, SubmitBusinessDetails, VerifyOtp,
};
use hure_onboarding::BusinessDetails;
use hure_plans::PlanProduct;
use serde::Serialize;

use crate::directory::{ClinicRecord, ClinicStatus, DirectoryError, TenantDirectory};
use crate::otp::{generate_otp, OtpDispatcher};
use crate::session_store::InMemorySessionStore;

/// Errors surfaced to the HTTP layer, one variant per failure class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Client-side validation failure; no storage or dispatch was touched.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backend refused the action (wrong code, duplicate registration).
    #[error("{0}")]
    Rejected(String),

    #[error("not found")]
    NotFound,

    /// The session is in a state that does not admit this action.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Payment cannot be skipped in this environment.
    #[error("payment skip is not available in this environment")]
    SkipDisabled,
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvariantViolation(msg) | DomainError::Conflict(msg) => {
                ServiceError::Conflict(msg)
            }
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::Unauthorized => ServiceError::Rejected("unauthorized".into()),
        }
    }
}

impl From<DirectoryError> for ServiceError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound => ServiceError::NotFound,
            DirectoryError::DuplicateEmail(email) => {
                ServiceError::Rejected(format!("a clinic is already registered under '{email}'"))
            }
        }
    }
}

/// Step-1 + step-2 input arriving in the clinic registration call.
#[derive(Debug, Clone)]
pub struct RegisterClinic {
    pub product: PlanProduct,
    pub plan_key: String,
    pub details: BusinessDetails,
}

/// Snapshot of where a clinic is in the wizard (status endpoint).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub step: u8,
    pub step_name: OnboardingStep,
    pub status: ClinicStatus,
    pub email_verified: bool,
    pub complete: bool,
    pub events: u64,
}

pub struct OnboardingService {
    directory: Arc<dyn TenantDirectory>,
    otp: Arc<dyn OtpDispatcher>,
    sessions: InMemorySessionStore,
    skip_payment_enabled: bool,
}

impl OnboardingService {
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        otp: Arc<dyn OtpDispatcher>,
        skip_payment_enabled: bool,
    ) -> Self {
        Self {
            directory,
            otp,
            sessions: InMemorySessionStore::new(),
            skip_payment_enabled,
        }
    }

    /// Register a clinic: plan selection plus business details in one call.
    ///
    /// A repeat submission for an email still in `PendingVerification` is the
    /// back-navigation path: the existing tenant row is updated in place and
    /// the same clinic id comes back, never a duplicate row.
    pub async fn register_clinic(&self, input: RegisterClinic) -> Result<TenantId, ServiceError> {
        if let Some(existing) = self
            .directory
            .find_by_email(input.details.email.as_str())
            .await
        {
            if existing.status != ClinicStatus::PendingVerification {
                return Err(DirectoryError::DuplicateEmail(
                    input.details.email.as_str().to_string(),
                )
                .into());
            }
            return self.reregister_clinic(existing.tenant_id, input).await;
        }

        let tenant_id = TenantId::new();
        let session_id = SessionId::new(AggregateId::new());
        let mut session = OnboardingSession::empty(session_id);
        let mut stream = Vec::new();

        for command in [
            OnboardingCommand::SelectPlan(SelectPlan {
                session_id,
                product: input.product,
                plan_key: input.plan_key.clone(),
                occurred_at: Utc::now(),
            }),
            OnboardingCommand::SubmitBusinessDetails(SubmitBusinessDetails {
                session_id,
                tenant_id,
                details: input.details.clone(),
                occurred_at: Utc::now(),
            }),
        ] {
            for event in session.handle(&command)? {
                session.apply(&event);
                stream.push(EventEnvelope::new(
                    tenant_id,
                    session.version(),
                    Utc::now(),
                    event,
                ));
            }
        }

        // Directory first: if a concurrent registration wins the
        // duplicate-email race here, no session entry is left behind.
        self.directory
            .register(ClinicRecord {
                tenant_id,
                product: input.product,
                plan_key: input.plan_key,
                details: input.details,
                status: ClinicStatus::PendingVerification,
                temp_password: None,
                otp: None,
                usage: Default::default(),
                registered_at: Utc::now(),
            })
            .await?;
        self.sessions.create(tenant_id, session, stream).await;

        tracing::info!(%tenant_id, "clinic registered, pending verification");
        Ok(tenant_id)
    }

    /// Re-submission after back-navigation: rewind the session to the step
    /// being redone, replay forward with the new input, update the row.
    async fn reregister_clinic(
        &self,
        tenant_id: TenantId,
        input: RegisterClinic,
    ) -> Result<TenantId, ServiceError> {
        let mut session = self
            .sessions
            .get(tenant_id)
            .await
            .ok_or(ServiceError::NotFound)?;
        let session_id = session.id_typed();

        let plan_changed = session.plan() != Some((input.product, input.plan_key.as_str()));
        let target = if plan_changed {
            OnboardingStep::PlanSelection
        } else {
            OnboardingStep::BusinessDetails
        };

        while session.step() != target {
            session = self
                .dispatch(
                    tenant_id,
                    &session,
                    OnboardingCommand::StepBack(StepBack {
                        session_id,
                        occurred_at: Utc::now(),
                    }),
                )
                .await?;
        }

        if plan_changed {
            session = self
                .dispatch(
                    tenant_id,
                    &session,
                    OnboardingCommand::SelectPlan(SelectPlan {
                        session_id,
                        product: input.product,
                        plan_key: input.plan_key.clone(),
                        occurred_at: Utc::now(),
                    }),
                )
                .await?;
        }

        self.dispatch(
            tenant_id,
            &session,
            OnboardingCommand::SubmitBusinessDetails(SubmitBusinessDetails {
                session_id,
                tenant_id,
                details: input.details.clone(),
                occurred_at: Utc::now(),
            }),
        )
        .await?;

        self.directory
            .update_registration(tenant_id, input.product, input.plan_key, input.details)
            .await?;

        tracing::info!(%tenant_id, "clinic registration updated");
        Ok(tenant_id)
    }

    /// Step 3: set the temporary password, then send the first OTP.
    pub async fn set_temp_password(
        &self,
        tenant_id: TenantId,
        email: &str,
        password: TempPassword,
    ) -> Result<(), ServiceError> {
        let record = self.require_record(tenant_id, email).await?;
        let session = self.require_session(tenant_id).await?;

        self.dispatch(
            tenant_id,
            &session,
            OnboardingCommand::SetTempPassword(SetTempPassword {
                session_id: session.id_typed(),
                password: password.clone(),
                occurred_at: Utc::now(),
            }),
        )
        .await?;

        self.directory
            .set_temp_password(tenant_id, password.as_str().to_string())
            .await?;
        self.send_fresh_code(&record).await
    }

    /// Step 4 resend: a fresh code goes out, the step does not move.
    pub async fn resend_verification(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<(), ServiceError> {
        let record = self.require_record(tenant_id, email).await?;
        let session = self.require_session(tenant_id).await?;

        self.dispatch(
            tenant_id,
            &session,
            OnboardingCommand::RequestOtpResend(RequestOtpResend {
                session_id: session.id_typed(),
                occurred_at: Utc::now(),
            }),
        )
        .await?;

        self.send_fresh_code(&record).await
    }

    /// Step 4: check the code. A mismatch leaves the session exactly where it
    /// was; the aggregate is consulted first so a wrong-step call cannot
    /// consume the stored code.
    pub async fn verify_otp(&self, tenant_id: TenantId, code: OtpCode) -> Result<(), ServiceError> {
        let session = self.require_session(tenant_id).await?;

        let command = OnboardingCommand::VerifyOtp(VerifyOtp {
            session_id: session.id_typed(),
            code: code.clone(),
            occurred_at: Utc::now(),
        });
        let events = session.handle(&command)?;

        if !self.directory.consume_otp_if_match(tenant_id, &code).await? {
            return Err(ServiceError::Rejected(
                "incorrect or expired verification code".into(),
            ));
        }

        self.sessions
            .append(tenant_id, ExpectedVersion::Exact(session.version()), events)
            .await?;
        tracing::info!(%tenant_id, "email verified");
        Ok(())
    }

    /// Step 5 fast path: end the session without payment (non-production).
    pub async fn skip_payment(&self, tenant_id: TenantId) -> Result<(), ServiceError> {
        if !self.skip_payment_enabled {
            return Err(ServiceError::SkipDisabled);
        }

        let session = self.require_session(tenant_id).await?;
        self.dispatch(
            tenant_id,
            &session,
            OnboardingCommand::SkipPayment(SkipPayment {
                session_id: session.id_typed(),
                occurred_at: Utc::now(),
            }),
        )
        .await?;

        self.directory.mark_pending_activation(tenant_id).await?;
        tracing::info!(%tenant_id, "payment skipped, clinic pending activation");
        Ok(())
    }

    pub async fn status(&self, tenant_id: TenantId) -> Result<OnboardingStatus, ServiceError> {
        let record = self
            .directory
            .get(tenant_id)
            .await
            .ok_or(ServiceError::NotFound)?;
        let session = self.require_session(tenant_id).await?;

        Ok(OnboardingStatus {
            step: session.step().number(),
            step_name: session.step(),
            status: record.status,
            email_verified: session.email_verified(),
            complete: session.is_complete(),
            events: self.sessions.event_count(tenant_id).await,
        })
    }

    pub fn directory(&self) -> &Arc<dyn TenantDirectory> {
        &self.directory
    }

    async fn dispatch(
        &self,
        tenant_id: TenantId,
        session: &OnboardingSession,
        command: OnboardingCommand,
    ) -> Result<OnboardingSession, ServiceError> {
        let events = session.handle(&command)?;
        let updated = self
            .sessions
            .append(tenant_id, ExpectedVersion::Exact(session.version()), events)
            .await?;
        Ok(updated)
    }

    async fn require_session(&self, tenant_id: TenantId) -> Result<OnboardingSession, ServiceError> {
        self.sessions
            .get(tenant_id)
            .await
            .ok_or(ServiceError::NotFound)
    }

    async fn require_record(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<ClinicRecord, ServiceError> {
        let record = self
            .directory
            .get(tenant_id)
            .await
            .ok_or(ServiceError::NotFound)?;
        if record.details.email.as_str() != email {
            return Err(ServiceError::Rejected(
                "email does not match the registration".into(),
            ));
        }
        Ok(record)
    }

    async fn send_fresh_code(&self, record: &ClinicRecord) -> Result<(), ServiceError> {
        let code = generate_otp();
        self.directory.store_otp(record.tenant_id, code.clone()).await?;
        self.otp
            .dispatch(&record.details.email, &code)
            .await
            .map_err(|e| ServiceError::Rejected(e.to_string()))
    }
}
