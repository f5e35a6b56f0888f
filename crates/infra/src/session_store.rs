//! In-memory storage of onboarding sessions and their event streams.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use hure_core::{Aggregate, AggregateRoot, DomainError, ExpectedVersion, TenantId};
use hure_events::EventEnvelope;
use hure_onboarding::{OnboardingEvent, OnboardingSession};

#[derive(Debug)]
struct SessionEntry {
    session: OnboardingSession,
    stream: Vec<EventEnvelope<OnboardingEvent>>,
}

/// One onboarding session per tenant, with its append-only event stream.
///
/// The stream is the audit trail the status endpoint reports on; sequence
/// numbers track the aggregate version one-to-one.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<TenantId, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created session together with its initial events.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        session: OnboardingSession,
        stream: Vec<EventEnvelope<OnboardingEvent>>,
    ) {
        self.inner
            .lock()
            .await
            .insert(tenant_id, SessionEntry { session, stream });
    }

    pub async fn get(&self, tenant_id: TenantId) -> Option<OnboardingSession> {
        self.inner
            .lock()
            .await
            .get(&tenant_id)
            .map(|e| e.session.clone())
    }

    /// Append events after an optimistic version check and return the evolved
    /// session.
    pub async fn append(
        &self,
        tenant_id: TenantId,
        expected: ExpectedVersion,
        events: Vec<OnboardingEvent>,
    ) -> Result<OnboardingSession, DomainError> {
        let mut map = self.inner.lock().await;
        let entry = map.get_mut(&tenant_id).ok_or(DomainError::NotFound)?;

        expected.check(entry.session.version())?;

        for event in events {
            entry.session.apply(&event);
            entry.stream.push(EventEnvelope::new(
                tenant_id,
                entry.session.version(),
                Utc::now(),
                event,
            ));
        }
        Ok(entry.session.clone())
    }

    pub async fn event_count(&self, tenant_id: TenantId) -> u64 {
        self.inner
            .lock()
            .await
            .get(&tenant_id)
            .map(|e| e.stream.len() as u64)
            .unwrap_or(0)
    }

    pub async fn stream(&self, tenant_id: TenantId) -> Vec<EventEnvelope<OnboardingEvent>> {
        self.inner
            .lock()
            .await
            .get(&tenant_id)
            .map(|e| e.stream.clone())
            .unwrap_or_default()
    }
}
