//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable, compared by their attribute values, and carry
/// no identity of their own. `EmailAddress` is a value object; a clinic record
/// keyed by `TenantId` is an entity.
///
/// To "modify" a value object, construct a new one; construction is where
/// validation happens, so a value object that exists is a value object that
/// is valid.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
