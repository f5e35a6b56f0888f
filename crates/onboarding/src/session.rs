use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hure_core::{Aggregate, AggregateId, AggregateRoot, DomainError, OtpCode, TempPassword, TenantId};
use hure_events::Event;
use hure_plans::PlanProduct;

use crate::details::BusinessDetails;

/// Onboarding session identifier.
///
/// Distinct from the tenant id: a session exists before a tenant row does,
/// and the tenant id is bound to it at step 2.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub AggregateId);

impl SessionId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// The five wizard steps.
///
/// Transitions are strictly linear, one step at a time in either direction.
/// The only exception is the dev-mode payment skip, which ends the session
/// from `Payment` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    PlanSelection,
    BusinessDetails,
    TempPassword,
    EmailVerification,
    Payment,
}

impl OnboardingStep {
    /// 1-based step number as shown in the wizard.
    pub fn number(self) -> u8 {
        match self {
            OnboardingStep::PlanSelection => 1,
            OnboardingStep::BusinessDetails => 2,
            OnboardingStep::TempPassword => 3,
            OnboardingStep::EmailVerification => 4,
            OnboardingStep::Payment => 5,
        }
    }

    fn previous(self) -> Option<OnboardingStep> {
        match self {
            OnboardingStep::PlanSelection => None,
            OnboardingStep::BusinessDetails => Some(OnboardingStep::PlanSelection),
            OnboardingStep::TempPassword => Some(OnboardingStep::BusinessDetails),
            OnboardingStep::EmailVerification => Some(OnboardingStep::TempPassword),
            OnboardingStep::Payment => Some(OnboardingStep::EmailVerification),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: pick a product and plan (step 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectPlan {
    pub session_id: SessionId,
    pub product: PlanProduct,
    pub plan_key: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: submit business details (step 2).
///
/// The tenant id is minted by the caller before dispatch; on a re-submission
/// after back-navigation the caller passes the already-bound id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitBusinessDetails {
    pub session_id: SessionId,
    pub tenant_id: TenantId,
    pub details: BusinessDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: set the temporary password (step 3).
///
/// The password rides on the command only; it is never echoed into an event,
/// so the audit stream stays free of credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTempPassword {
    pub session_id: SessionId,
    pub password: TempPassword,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ask for the OTP email again (step 4, step unchanged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOtpResend {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: confirm the emailed code (step 4).
///
/// Format is already proven by [`OtpCode`]; whether the code matches the one
/// on file is the caller's check, made before this command is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOtp {
    pub session_id: SessionId,
    pub code: OtpCode,
    pub occurred_at: DateTime<Utc>,
}

/// Command: end the session without paying (step 5, non-production only —
/// the environment gate sits in front of the dispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPayment {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: go back one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepBack {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingCommand {
    SelectPlan(SelectPlan),
    SubmitBusinessDetails(SubmitBusinessDetails),
    SetTempPassword(SetTempPassword),
    RequestOtpResend(RequestOtpResend),
    VerifyOtp(VerifyOtp),
    SkipPayment(SkipPayment),
    StepBack(StepBack),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: PlanSelected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSelected {
    pub session_id: SessionId,
    pub product: PlanProduct,
    pub plan_key: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BusinessDetailsAccepted. Binds the tenant id to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetailsAccepted {
    pub session_id: SessionId,
    pub tenant_id: TenantId,
    pub details: BusinessDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TempPasswordSet. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempPasswordSet {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OtpResendRequested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpResendRequested {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EmailVerified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerified {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentSkipped. Terminal; the tenant moves to pending activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSkipped {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SteppedBack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedBack {
    pub session_id: SessionId,
    pub to_step: OnboardingStep,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingEvent {
    PlanSelected(PlanSelected),
    BusinessDetailsAccepted(BusinessDetailsAccepted),
    TempPasswordSet(TempPasswordSet),
    OtpResendRequested(OtpResendRequested),
    EmailVerified(EmailVerified),
    PaymentSkipped(PaymentSkipped),
    SteppedBack(SteppedBack),
}

impl Event for OnboardingEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OnboardingEvent::PlanSelected(_) => "onboarding.plan.selected",
            OnboardingEvent::BusinessDetailsAccepted(_) => "onboarding.details.accepted",
            OnboardingEvent::TempPasswordSet(_) => "onboarding.temp_password.set",
            OnboardingEvent::OtpResendRequested(_) => "onboarding.otp.resend_requested",
            OnboardingEvent::EmailVerified(_) => "onboarding.email.verified",
            OnboardingEvent::PaymentSkipped(_) => "onboarding.payment.skipped",
            OnboardingEvent::SteppedBack(_) => "onboarding.step.back",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OnboardingEvent::PlanSelected(e) => e.occurred_at,
            OnboardingEvent::BusinessDetailsAccepted(e) => e.occurred_at,
            OnboardingEvent::TempPasswordSet(e) => e.occurred_at,
            OnboardingEvent::OtpResendRequested(e) => e.occurred_at,
            OnboardingEvent::EmailVerified(e) => e.occurred_at,
            OnboardingEvent::PaymentSkipped(e) => e.occurred_at,
            OnboardingEvent::SteppedBack(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: one clinic's trip through the wizard.
///
/// # Invariants
/// - The step moves by at most one, except the payment skip ending the session.
/// - The tenant id is bound exactly once and never unbound, including on
///   back-navigation (the pending tenant row created at step 2 survives a
///   2 → 1 → 2 round trip).
/// - A completed session accepts no further commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSession {
    id: SessionId,
    step: OnboardingStep,
    product: Option<PlanProduct>,
    plan_key: Option<String>,
    tenant_id: Option<TenantId>,
    details: Option<BusinessDetails>,
    temp_password_set: bool,
    email_verified: bool,
    payment_resolved: bool,
    version: u64,
}

impl OnboardingSession {
    /// A fresh session at step 1 (also the rehydration starting point).
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            step: OnboardingStep::PlanSelection,
            product: None,
            plan_key: None,
            tenant_id: None,
            details: None,
            temp_password_set: false,
            email_verified: false,
            payment_resolved: false,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn plan(&self) -> Option<(PlanProduct, &str)> {
        Some((self.product?, self.plan_key.as_deref()?))
    }

    pub fn details(&self) -> Option<&BusinessDetails> {
        self.details.as_ref()
    }

    pub fn temp_password_set(&self) -> bool {
        self.temp_password_set
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Terminal: payment completed or explicitly skipped.
    pub fn is_complete(&self) -> bool {
        self.payment_resolved
    }
}

impl AggregateRoot for OnboardingSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for OnboardingSession {
    type Command = OnboardingCommand;
    type Event = OnboardingEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OnboardingEvent::PlanSelected(e) => {
                self.product = Some(e.product);
                self.plan_key = Some(e.plan_key.clone());
                self.step = OnboardingStep::BusinessDetails;
            }
            OnboardingEvent::BusinessDetailsAccepted(e) => {
                self.tenant_id = Some(e.tenant_id);
                self.details = Some(e.details.clone());
                self.step = OnboardingStep::TempPassword;
            }
            OnboardingEvent::TempPasswordSet(_) => {
                self.temp_password_set = true;
                self.step = OnboardingStep::EmailVerification;
            }
            OnboardingEvent::OtpResendRequested(_) => {}
            OnboardingEvent::EmailVerified(_) => {
                self.email_verified = true;
                self.step = OnboardingStep::Payment;
            }
            OnboardingEvent::PaymentSkipped(_) => {
                self.payment_resolved = true;
            }
            OnboardingEvent::SteppedBack(e) => {
                // Going back rewinds the cursor only; bound state (tenant id,
                // details, plan) is retained for re-submission.
                self.step = e.to_step;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if self.payment_resolved {
            return Err(DomainError::invariant("onboarding is already complete"));
        }

        match command {
            OnboardingCommand::SelectPlan(cmd) => self.handle_select_plan(cmd),
            OnboardingCommand::SubmitBusinessDetails(cmd) => self.handle_submit_details(cmd),
            OnboardingCommand::SetTempPassword(cmd) => self.handle_set_temp_password(cmd),
            OnboardingCommand::RequestOtpResend(cmd) => self.handle_request_resend(cmd),
            OnboardingCommand::VerifyOtp(cmd) => self.handle_verify_otp(cmd),
            OnboardingCommand::SkipPayment(cmd) => self.handle_skip_payment(cmd),
            OnboardingCommand::StepBack(cmd) => self.handle_step_back(cmd),
        }
    }
}

impl OnboardingSession {
    fn ensure_session_id(&self, session_id: SessionId) -> Result<(), DomainError> {
        if self.id != session_id {
            return Err(DomainError::invariant("session_id mismatch"));
        }
        Ok(())
    }

    fn ensure_step(&self, expected: OnboardingStep) -> Result<(), DomainError> {
        if self.step != expected {
            return Err(DomainError::invariant(format!(
                "expected step {} but session is at step {}",
                expected.number(),
                self.step.number()
            )));
        }
        Ok(())
    }

    fn handle_select_plan(&self, cmd: &SelectPlan) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::PlanSelection)?;

        if cmd.plan_key.trim().is_empty() {
            return Err(DomainError::validation("plan key must not be empty"));
        }

        Ok(vec![OnboardingEvent::PlanSelected(PlanSelected {
            session_id: cmd.session_id,
            product: cmd.product,
            plan_key: cmd.plan_key.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_submit_details(
        &self,
        cmd: &SubmitBusinessDetails,
    ) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::BusinessDetails)?;

        // Re-submission after back-navigation must address the tenant row
        // already created, not mint a second one.
        if let Some(bound) = self.tenant_id {
            if bound != cmd.tenant_id {
                return Err(DomainError::conflict(
                    "session is already bound to a different tenant",
                ));
            }
        }

        Ok(vec![OnboardingEvent::BusinessDetailsAccepted(
            BusinessDetailsAccepted {
                session_id: cmd.session_id,
                tenant_id: cmd.tenant_id,
                details: cmd.details.clone(),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_set_temp_password(
        &self,
        cmd: &SetTempPassword,
    ) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::TempPassword)?;

        Ok(vec![OnboardingEvent::TempPasswordSet(TempPasswordSet {
            session_id: cmd.session_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_request_resend(
        &self,
        cmd: &RequestOtpResend,
    ) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::EmailVerification)?;

        Ok(vec![OnboardingEvent::OtpResendRequested(
            OtpResendRequested {
                session_id: cmd.session_id,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_verify_otp(&self, cmd: &VerifyOtp) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::EmailVerification)?;

        Ok(vec![OnboardingEvent::EmailVerified(EmailVerified {
            session_id: cmd.session_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_skip_payment(&self, cmd: &SkipPayment) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;
        self.ensure_step(OnboardingStep::Payment)?;

        Ok(vec![OnboardingEvent::PaymentSkipped(PaymentSkipped {
            session_id: cmd.session_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_step_back(&self, cmd: &StepBack) -> Result<Vec<OnboardingEvent>, DomainError> {
        self.ensure_session_id(cmd.session_id)?;

        let Some(to_step) = self.step.previous() else {
            return Err(DomainError::invariant("already at the first step"));
        };

        Ok(vec![OnboardingEvent::SteppedBack(SteppedBack {
            session_id: cmd.session_id,
            to_step,
            occurred_at: cmd.occurred_at,
        })])
    }
}
