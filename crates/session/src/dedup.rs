//! Duplicate suppression for interruption and route-change events.
//!
//! Keeps only the last *emitted* event per category. A new event is
//! suppressed when it matches that event in everything but the timestamp and
//! arrived within the window. Suppressed events do not move the baseline.

use std::time::Duration;

use audio_session_events::{DomainEvent, EventCategory};

#[derive(Debug, Clone)]
pub struct DedupFilter {
    window_ms: u64,
    last_interruption: Option<DomainEvent>,
    last_route_change: Option<DomainEvent>,
}

impl DedupFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            last_interruption: None,
            last_route_change: None,
        }
    }

    fn slot(&mut self, category: EventCategory) -> Option<&mut Option<DomainEvent>> {
        match category {
            EventCategory::Interruption => Some(&mut self.last_interruption),
            EventCategory::RouteChange => Some(&mut self.last_route_change),
            EventCategory::AppState | EventCategory::Session => None,
        }
    }

    /// Returns true when the event should be delivered.
    pub fn admit(&mut self, event: &DomainEvent) -> bool {
        let window_ms = self.window_ms;
        let Some(slot) = self.slot(event.category()) else {
            return true;
        };

        if let Some(last) = slot.as_ref() {
            let elapsed_ms = event.timestamp().abs_diff(last.timestamp());
            if elapsed_ms <= window_ms && last.same_content(event) {
                tracing::debug!(?event, elapsed_ms, "duplicate event suppressed");
                return false;
            }
        }

        *slot = Some(event.clone());
        true
    }

    pub fn last_emitted(&self, category: EventCategory) -> Option<&DomainEvent> {
        match category {
            EventCategory::Interruption => self.last_interruption.as_ref(),
            EventCategory::RouteChange => self.last_route_change.as_ref(),
            EventCategory::AppState | EventCategory::Session => None,
        }
    }

    /// Forget both baselines.
    pub fn clear(&mut self) {
        self.last_interruption = None;
        self.last_route_change = None;
    }
}

impl Default for DedupFilter {
    fn default() -> Self {
        Self::new(crate::policy::DEFAULT_DEDUP_WINDOW)
    }
}
