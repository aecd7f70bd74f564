//! Event bus abstraction for decoupled event emission.
//!
//! The session core pushes events through this trait so it can be tested
//! without a host bridge and driven by any transport that can carry JSON.

use std::sync::{Arc, Mutex};

use crate::DomainEvent;

/// Trait for emitting events to subscribers.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name/topic (e.g., "audioRouteChange")
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize a domain event and emit it on its topic.
pub fn publish(bus: &dyn EventBus, event: &DomainEvent) {
    match serde_json::to_value(event) {
        Ok(payload) => bus.emit(event.topic(), payload),
        Err(e) => tracing::error!(error = %e, topic = event.topic(), "failed to serialize event"),
    }
}

/// In-memory event bus for testing.
///
/// Captures all emitted events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// A captured event from InMemoryEventBus.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl EmittedEvent {
    /// Decode the payload back into a domain event.
    pub fn decode(&self) -> Option<DomainEvent> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Get events for a specific topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.topic == topic)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if let Ok(mut events) = self.events.lock() {
            events.push(EmittedEvent {
                topic: topic.to_string(),
                payload,
            });
        }
    }
}

/// No-op event bus that discards all events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_names, InterruptionReason};
    use serde_json::json;

    #[test]
    fn test_in_memory_event_bus() {
        let bus = InMemoryEventBus::new();

        bus.emit("test:event1", json!({"key": "value1"}));
        bus.emit("test:event2", json!({"key": "value2"}));
        bus.emit("test:event1", json!({"key": "value3"}));

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.events_for("test:event1").len(), 2);
        assert_eq!(bus.events_for("test:event2").len(), 1);
        assert_eq!(bus.events_for("test:missing").len(), 0);
    }

    #[test]
    fn test_in_memory_event_bus_clear() {
        let bus = InMemoryEventBus::new();

        bus.emit("test:event", json!({}));
        assert!(!bus.is_empty());

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_publish_routes_by_topic() {
        let bus = InMemoryEventBus::new();
        let event = DomainEvent::InterruptionBegan {
            reason: InterruptionReason::Call,
            timestamp: 10,
        };

        publish(&bus, &event);

        let emitted = bus.events_for(event_names::AUDIO_INTERRUPTION);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].decode(), Some(event));
    }

    #[test]
    fn test_null_event_bus() {
        let bus = NullEventBus;
        bus.emit("test:event", json!({"data": "ignored"}));
    }
}
