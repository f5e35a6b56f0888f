//! `hure-events` — domain event plumbing.
//!
//! Onboarding progress is recorded as an append-only stream of events per
//! tenant; this crate holds the event contract and the tenant-scoped envelope
//! that gets persisted.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
