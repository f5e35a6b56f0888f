use chrono::{DateTime, Utc};

/// Contract for a recorded domain event.
///
/// Events are facts: once emitted they are never edited, only appended after.
/// The type name is the stable wire identifier; `version` exists so a payload
/// can evolve without renaming the event.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted name, e.g. `"onboarding.email.verified"`.
    fn event_type(&self) -> &'static str;

    /// Schema version of the payload.
    fn version(&self) -> u32;

    /// Business time: when the thing described actually happened.
    fn occurred_at(&self) -> DateTime<Utc>;
}
