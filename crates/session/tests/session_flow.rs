//! End-to-end tests for the session core.
//!
//! Wires a `RecordingPort` through the controller, listener registry and
//! signal pump, and observes what reaches the event bus. Timing-dependent
//! cases run on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use audio_session_core::port::codes;
use audio_session_core::testing::RecordingPort;
use audio_session_core::{
    ListenerRegistry, PortError, PortErrorKind, RawInterruption, RawRouteChange,
    SessionConfigRequest, SessionController, SessionSettings, SharedController, SignalPipeline,
};
use audio_session_events::{
    event_names, DomainEvent, InMemoryEventBus, InterruptionReason, RouteChangeReason,
    SuggestedAction,
};

struct Harness {
    port: Arc<RecordingPort>,
    bus: Arc<InMemoryEventBus>,
    controller: SharedController,
    pipeline: Arc<SignalPipeline>,
    listeners: ListenerRegistry,
}

fn harness() -> Harness {
    let port = Arc::new(RecordingPort::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let controller = Arc::new(tokio::sync::Mutex::new(SessionController::new(port.clone())));
    let pipeline = Arc::new(SignalPipeline::new(
        Arc::clone(&controller),
        bus.clone(),
        SessionSettings::default(),
    ));
    let listeners = ListenerRegistry::new(port.clone(), Arc::clone(&pipeline));
    Harness {
        port,
        bus,
        controller,
        pipeline,
        listeners,
    }
}

/// Let the pump and any spawned reactivation tasks run.
async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

fn unplugged_at(timestamp: i64) -> DomainEvent {
    DomainEvent::RouteChanged {
        reason: RouteChangeReason::DeviceUnavailable,
        suggested_action: SuggestedAction::Pause,
        timestamp,
    }
}

// =============================================================================
// Controller
// =============================================================================

mod controller {
    use super::*;

    #[tokio::test]
    async fn test_configure_then_activate_ends_configured_and_active() {
        let h = harness();
        let mut controller = h.controller.lock().await;

        controller.configure(SessionConfigRequest::default()).unwrap();
        controller.activate(true).unwrap();

        let state = controller.state();
        assert!(state.configured);
        assert!(state.active);
    }

    #[tokio::test]
    async fn test_failed_configure_then_activate_uses_fallback() {
        let h = harness();
        let mut controller = h.controller.lock().await;

        h.port
            .fail_configure(Some(PortError::new(PortErrorKind::BadParam, "bad category")));
        assert!(controller.configure(SessionConfigRequest::default()).is_err());
        assert!(!controller.is_configured());

        h.port.fail_configure(None);
        assert_eq!(controller.activate(true), Ok(true));
        assert!(controller.is_configured());
        assert!(controller.is_active());
        assert_eq!(h.port.apply_count(), 2);
    }

    #[tokio::test]
    async fn test_notify_others_only_on_deactivate() {
        let h = harness();
        let mut controller = h.controller.lock().await;

        controller.activate(true).unwrap();
        controller.activate(false).unwrap();
        controller.activate(true).unwrap();

        for (active, notify) in h.port.set_active_calls() {
            assert_eq!(notify, !active);
        }
    }
}

// =============================================================================
// Deduplication
// =============================================================================

mod dedup {
    use super::*;

    #[tokio::test]
    async fn test_route_changes_200ms_apart_emit_once() {
        let h = harness();
        h.pipeline.deliver(unplugged_at(50_000)).await;
        h.pipeline.deliver(unplugged_at(50_200)).await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE).len(), 1);
    }

    #[tokio::test]
    async fn test_route_changes_2s_apart_emit_twice() {
        let h = harness();
        h.pipeline.deliver(unplugged_at(50_000)).await;
        h.pipeline.deliver(unplugged_at(52_000)).await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE).len(), 2);
    }

    #[tokio::test]
    async fn test_categories_do_not_suppress_each_other() {
        let h = harness();
        h.pipeline
            .deliver(DomainEvent::InterruptionBegan {
                reason: InterruptionReason::Call,
                timestamp: 1_000,
            })
            .await;
        h.pipeline.deliver(unplugged_at(1_001)).await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_INTERRUPTION).len(), 1);
        assert_eq!(h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE).len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_platform_signals_are_collapsed() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        let raw = RawRouteChange::new(codes::ROUTE_OLD_DEVICE_UNAVAILABLE);
        assert!(h.port.emit_route_change(raw));
        assert!(h.port.emit_route_change(raw));
        settle().await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE).len(), 1);
    }

    #[tokio::test]
    async fn test_resubscribe_resets_dedup_state() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        let raw = RawRouteChange::new(codes::ROUTE_NEW_DEVICE_AVAILABLE);
        h.port.emit_route_change(raw);
        settle().await;

        h.listeners.unsubscribe();
        h.listeners.subscribe().unwrap();

        h.port.emit_route_change(raw);
        settle().await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE).len(), 2);
    }
}

// =============================================================================
// Listener Registry
// =============================================================================

mod listeners {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_twice_registers_once() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();
        h.listeners.subscribe().unwrap();

        assert_eq!(h.port.subscribe_count(), 1);

        h.port.emit_app_foreground();
        settle().await;
        assert_eq!(h.bus.events_for(event_names::APP_STATE_CHANGE).len(), 1);
    }

    #[tokio::test]
    async fn test_signals_arrive_in_order() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        h.port.emit_interruption(RawInterruption::began(Some(
            codes::INTERRUPTION_REASON_APP_SUSPENDED,
        )));
        h.port
            .emit_route_change(RawRouteChange::new(codes::ROUTE_WAKE_FROM_SLEEP));
        h.port.emit_app_background();
        settle().await;

        let topics: Vec<_> = h.bus.events().into_iter().map(|e| e.topic).collect();
        assert_eq!(
            &topics[..3],
            &[
                event_names::AUDIO_INTERRUPTION.to_string(),
                event_names::AUDIO_ROUTE_CHANGE.to_string(),
                event_names::APP_STATE_CHANGE.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_while_pump_waits_on_controller() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        let guard = h.controller.lock().await;
        h.port.emit_interruption(RawInterruption::began(None));
        settle().await;
        h.listeners.unsubscribe();
        drop(guard);
        settle().await;

        assert!(h.bus.events_for(event_names::AUDIO_INTERRUPTION).is_empty());

        h.listeners.subscribe().unwrap();
        h.port.emit_interruption(RawInterruption::began(None));
        settle().await;

        assert_eq!(h.bus.events_for(event_names::AUDIO_INTERRUPTION).len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_delivered_after_unsubscribe() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();
        h.listeners.unsubscribe();

        assert!(!h.port.emit_app_foreground());
        settle().await;
        assert!(h.bus.is_empty());
    }
}

// =============================================================================
// Reactivation
// =============================================================================

mod reactivation {
    use super::*;

    fn ready_events(bus: &InMemoryEventBus) -> Vec<DomainEvent> {
        bus.events_for(event_names::AUDIO_SESSION_READY)
            .iter()
            .filter_map(|e| e.decode())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_resumable_interruption_emits_session_ready() {
        let mut h = harness();
        h.controller.lock().await.activate(true).unwrap();
        h.listeners.subscribe().unwrap();

        h.port.emit_interruption(RawInterruption::began(None));
        settle().await;
        assert!(!h.controller.lock().await.is_active());

        h.port.emit_interruption(RawInterruption::ended(true));
        settle().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;

        assert!(h.controller.lock().await.is_active());
        let ready = ready_events(&h.bus);
        assert_eq!(ready.len(), 1);
        assert!(matches!(
            &ready[0],
            DomainEvent::SessionReady { cause_reason, .. } if cause_reason == "interruption_ended"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_resumable_interruption_never_reactivates() {
        let mut h = harness();
        h.controller.lock().await.activate(true).unwrap();
        h.listeners.subscribe().unwrap();

        h.port.emit_interruption(RawInterruption::began(None));
        h.port.emit_interruption(RawInterruption::ended(false));
        settle().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;

        assert!(!h.controller.lock().await.is_active());
        assert!(ready_events(&h.bus).is_empty());
        assert_eq!(h.port.set_active_calls(), vec![(true, false)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreground_reactivates_after_delay() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        h.port.emit_app_foreground();
        settle().await;
        assert!(h.port.set_active_calls().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        settle().await;
        assert_eq!(h.port.set_active_calls(), vec![(true, false)]);
        assert_eq!(ready_events(&h.bus).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_abandons_pending_reactivation() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();

        h.port.emit_interruption(RawInterruption::ended(true));
        settle().await;
        h.listeners.unsubscribe();

        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;

        assert!(h.port.set_active_calls().is_empty());
        assert!(ready_events(&h.bus).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivation_failure_is_silent() {
        let mut h = harness();
        h.listeners.subscribe().unwrap();
        h.port
            .fail_activation(Some(PortError::new(PortErrorKind::Busy, "in use")));

        h.port.emit_app_foreground();
        settle().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        settle().await;

        assert_eq!(h.port.set_active_calls().len(), 1);
        assert!(ready_events(&h.bus).is_empty());
    }
}

// =============================================================================
// End to end
// =============================================================================

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn test_configure_then_unplugged_headphones() {
        let mut h = harness();

        let config = h
            .controller
            .lock()
            .await
            .configure(SessionConfigRequest {
                allow_mixing: false,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.resolved.category, "playback");
        assert!(config.resolved.options.contains(&0x4));
        assert!(config.resolved.options.contains(&0x40));
        assert!(!config.resolved.options.contains(&0x1));

        h.listeners.subscribe().unwrap();
        h.port
            .emit_route_change(RawRouteChange::new(codes::ROUTE_OLD_DEVICE_UNAVAILABLE));
        settle().await;

        let emitted = h.bus.events_for(event_names::AUDIO_ROUTE_CHANGE);
        assert_eq!(emitted.len(), 1);
        let payload = &emitted[0].payload;
        assert_eq!(payload["type"], "route_change");
        assert_eq!(payload["reason"], "device_unavailable");
        assert_eq!(payload["action"], "pause");
        assert!(payload["timestamp"].as_i64().unwrap_or_default() > 0);
    }
}
