//! Infrastructure layer: ports to the outside world and their in-memory
//! adapters, plus the onboarding orchestration service.
//!
//! The domain crates stay pure; everything that touches storage or sends
//! email goes through the traits defined here.

pub mod directory;
pub mod onboarding_service;
pub mod otp;
pub mod session_store;

pub use directory::{
    ClinicRecord, ClinicStatus, DirectoryError, InMemoryTenantDirectory, TenantDirectory,
};
pub use onboarding_service::{OnboardingService, OnboardingStatus, RegisterClinic, ServiceError};
pub use otp::{generate_otp, InMemoryOtpDispatcher, OtpDispatcher, OtpSendError};
pub use session_store::InMemorySessionStore;
