use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hure_core::{AccountId, TenantId};

use crate::role::Role;

/// JWT claims model.
///
/// This is the claim set every HURE token carries once decoded. Timestamps go
/// on the wire as standard numeric `iat`/`exp` so tokens interoperate with
/// the usual JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / account identifier.
    pub sub: AccountId,

    /// Tenant (clinic) context for the token.
    pub tenant_id: TenantId,

    /// Role granted within the tenant context.
    pub role: Role,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token is malformed or has a bad signature")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::token`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims(issued: DateTime<Utc>, expires: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: AccountId::new(),
            tenant_id: TenantId::new(),
            role: Role::Owner,
            issued_at: issued,
            expires_at: expires,
        }
    }

    #[test]
    fn accepts_a_token_inside_its_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_expired_and_future_tokens() {
        let now = Utc::now();

        let expired = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(
            validate_claims(&expired, now),
            Err(TokenValidationError::Expired)
        );

        let future = claims(now + Duration::minutes(5), now + Duration::hours(1));
        assert_eq!(
            validate_claims(&future, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_an_inverted_window() {
        let now = Utc::now();
        let inverted = claims(now, now - Duration::minutes(1));
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
