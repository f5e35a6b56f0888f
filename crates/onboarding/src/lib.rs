//! `hure-onboarding` — the clinic registration flow.
//!
//! A five-step linear wizard modeled as a pure aggregate: commands in, events
//! out, no IO. Side effects (tenant rows, OTP dispatch, payment) are the
//! orchestrating service's job; this crate only decides what is allowed to
//! happen next.

pub mod details;
pub mod session;

pub use details::BusinessDetails;
pub use session::{
    OnboardingCommand, OnboardingEvent, OnboardingSession, OnboardingStep, SessionId,
};
