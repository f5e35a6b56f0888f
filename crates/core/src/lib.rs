//! `hure-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod contact;
pub mod error;
pub mod id;
pub mod secret;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use contact::{EmailAddress, PhoneNumber};
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, AggregateId, TenantId};
pub use secret::{OtpCode, TempPassword};
pub use value_object::ValueObject;
