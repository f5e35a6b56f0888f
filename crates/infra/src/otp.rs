//! One-time passcode generation and dispatch.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use hure_core::{EmailAddress, OtpCode};

/// Derive a fresh 6-digit code from UUID randomness.
pub fn generate_otp() -> OtpCode {
    let n = Uuid::new_v4().as_u128() % 1_000_000;
    OtpCode::new(format!("{n:06}")).expect("formatted code is always 6 digits")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to send verification code: {0}")]
pub struct OtpSendError(pub String);

/// Outbound email port for verification codes.
#[async_trait]
pub trait OtpDispatcher: Send + Sync {
    async fn dispatch(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), OtpSendError>;
}

/// Dispatcher that logs instead of emailing and remembers the last code per
/// address. Used in dev mode and by the black-box API tests.
#[derive(Debug, Default)]
pub struct InMemoryOtpDispatcher {
    sent: Mutex<HashMap<String, OtpCode>>,
}

impl InMemoryOtpDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last_code_for(&self, email: &str) -> Option<OtpCode> {
        self.sent.lock().await.get(email).cloned()
    }
}

#[async_trait]
impl OtpDispatcher for InMemoryOtpDispatcher {
    async fn dispatch(&self, email: &EmailAddress, code: &OtpCode) -> Result<(), OtpSendError> {
        tracing::info!(email = %email, "dispatching verification code");
        self.sent
            .lock()
            .await
            .insert(email.as_str().to_string(), code.clone());
        Ok(())
    }
}
