//! `hure-auth` — authentication/authorization boundary.
//!
//! The permission model is deliberately flat: four roles, fifteen
//! capabilities, one exhaustive table, no inheritance. Reviewing
//! [`Role::allows`] fully describes the access-control policy.
//!
//! Token handling is split in two: pure claim validation here, transport
//! (header extraction, 401 mapping) in the API crate.

pub mod capability;
pub mod claims;
pub mod role;
pub mod token;

pub use capability::{has_permission, Capability};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use role::Role;
pub use token::{Hs256JwtValidator, JwtValidator};
