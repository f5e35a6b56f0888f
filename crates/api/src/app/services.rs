//! Service wiring: the in-process application container.

use std::sync::Arc;

use hure_infra::{
    InMemoryOtpDispatcher, InMemoryTenantDirectory, OnboardingService, TenantDirectory,
};

use crate::config::AppConfig;

/// Everything the route handlers need, built once at startup.
pub struct AppServices {
    pub onboarding: OnboardingService,
    pub directory: Arc<dyn TenantDirectory>,
    pub otp: Arc<InMemoryOtpDispatcher>,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let directory: Arc<dyn TenantDirectory> = Arc::new(InMemoryTenantDirectory::new());
    let otp = Arc::new(InMemoryOtpDispatcher::new());

    let onboarding = OnboardingService::new(
        directory.clone(),
        otp.clone(),
        config.skip_payment_enabled(),
    );

    AppServices {
        onboarding,
        directory,
        otp,
    }
}
