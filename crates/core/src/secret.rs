//! Credential value objects used during onboarding.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minimum length of a temporary password.
pub const MIN_TEMP_PASSWORD_LEN: usize = 6;

/// A temporary password chosen during onboarding.
///
/// Construction checks length and the confirmation field in one place, so a
/// mismatch never reaches the directory. The value is stored as given at this
/// layer; hashing is the identity provider's concern once the tenant is
/// activated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TempPassword(String);

impl TempPassword {
    pub fn new(password: impl Into<String>, confirmation: &str) -> DomainResult<Self> {
        let password = password.into();
        if password.chars().count() < MIN_TEMP_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_TEMP_PASSWORD_LEN} characters"
            )));
        }
        if password != confirmation {
            return Err(DomainError::validation("passwords do not match"));
        }
        Ok(Self(password))
    }

    /// Construct without a confirmation field (server side, where the wire
    /// contract carries a single password field).
    pub fn new_unconfirmed(password: impl Into<String>) -> DomainResult<Self> {
        let password = password.into();
        Self::new(password.clone(), &password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep passwords out of logs and error output.
impl core::fmt::Debug for TempPassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TempPassword(****)")
    }
}

impl ValueObject for TempPassword {}

/// A one-time passcode: exactly six ASCII digits.
///
/// Format is checked before any lookup, so a malformed code never issues a
/// verification round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw))
        } else {
            Err(DomainError::validation("code must be exactly 6 digits"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for OtpCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_enforces_minimum_length() {
        assert!(TempPassword::new("abc12", "abc12").is_err());
        assert!(TempPassword::new("abc123", "abc123").is_ok());
    }

    #[test]
    fn password_enforces_confirmation_match() {
        assert!(TempPassword::new("abc123", "abc124").is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let pw = TempPassword::new_unconfirmed("abc123").unwrap();
        assert_eq!(format!("{pw:?}"), "TempPassword(****)");
    }

    #[test]
    fn otp_accepts_exactly_six_digits() {
        assert!(OtpCode::new("123456").is_ok());
        assert!(OtpCode::new("12345").is_err());
        assert!(OtpCode::new("1234567").is_err());
        assert!(OtpCode::new("abcdef").is_err());
        assert!(OtpCode::new("12345a").is_err());
    }
}
