//! Event-sourced aggregate contract.
//!
//! The onboarding session is the one aggregate in this system, but the
//! contract stays generic: decisions are pure (`handle` borrows state and
//! returns events), mutation is mechanical (`apply` folds one event), and
//! concurrency is an explicit expectation checked at append time.

use crate::error::{DomainError, DomainResult};

/// Identity and version of a domain aggregate.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events folded into this state. Starts at zero for an empty
    /// aggregate and increases by one per applied event, which makes it
    /// interchangeable with the stream position.
    fn version(&self) -> u64;
}

/// What a writer believes the aggregate's version to be.
///
/// `Exact` is the normal case: the service loaded the session, decided, and
/// appends against the version it saw. `Any` bypasses the check for writes
/// that are safe to interleave.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    Any,
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    /// Turn a mismatch into the conflict error the HTTP layer maps to 409.
    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Decision and evolution for an aggregate.
///
/// `handle` must not mutate and must not do IO; everything it needs arrives
/// on the command. `apply` must be total: it is replayed during rehydration,
/// so an event that was ever emitted must always be applicable.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Fold one event into state, bumping `version()` by one.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events follow from `command` in the current state.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
