//! Simulated platform used by the demo in place of a native audio session.

use std::sync::Mutex;

use audio_session_core::port::{
    AppliedConfig, CapabilityPort, PortError, PortErrorKind, RawInterruption, RawRouteChange,
    SessionCategory, SessionOption, SignalHandlers, SubscriptionHandle,
};
use audio_session_events::EventBus;
use audio_session_plugin::{NowPlayingCenter, NowPlayingInfo};

#[derive(Default)]
pub struct SimulatedPlatform {
    subscription: Mutex<Option<(SubscriptionHandle, SignalHandlers)>>,
    active: Mutex<bool>,
}

impl SimulatedPlatform {
    fn handlers(&self) -> Option<SignalHandlers> {
        self.subscription
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|(_, h)| h.clone()))
    }

    pub fn interrupt(&self, raw: RawInterruption) {
        match self.handlers() {
            Some(h) => (h.on_interruption)(raw),
            None => tracing::debug!("no listener for interruption"),
        }
    }

    pub fn change_route(&self, raw: RawRouteChange) {
        match self.handlers() {
            Some(h) => (h.on_route_change)(raw),
            None => tracing::debug!("no listener for route change"),
        }
    }

    pub fn enter_background(&self) {
        if let Some(h) = self.handlers() {
            (h.on_app_background)();
        }
    }

    pub fn enter_foreground(&self) {
        if let Some(h) = self.handlers() {
            (h.on_app_foreground)();
        }
    }
}

impl CapabilityPort for SimulatedPlatform {
    fn apply_configuration(
        &self,
        category: SessionCategory,
        options: &[SessionOption],
    ) -> Result<AppliedConfig, PortError> {
        tracing::info!(%category, ?options, "platform: set category");
        Ok(AppliedConfig {
            category: category.as_str().to_string(),
            options: options.iter().map(|o| o.raw()).collect(),
        })
    }

    fn set_active(&self, active: bool, notify_on_deactivate: bool) -> Result<(), PortError> {
        let mut current = self
            .active
            .lock()
            .map_err(|_| PortError::new(PortErrorKind::Other, "platform state poisoned"))?;
        tracing::info!(active, notify_on_deactivate, was = *current, "platform: set active");
        *current = active;
        Ok(())
    }

    fn subscribe(&self, handlers: SignalHandlers) -> Result<SubscriptionHandle, PortError> {
        let handle = SubscriptionHandle::new();
        let mut slot = self
            .subscription
            .lock()
            .map_err(|_| PortError::new(PortErrorKind::Other, "platform state poisoned"))?;
        *slot = Some((handle, handlers));
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if let Ok(mut slot) = self.subscription.lock() {
            if slot.as_ref().is_some_and(|(h, _)| *h == handle) {
                *slot = None;
            }
        }
    }
}

/// Prints every pushed event as JSON.
pub struct LoggingEventBus;

impl EventBus for LoggingEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        tracing::info!(topic, %payload, "event");
    }
}

pub struct LoggingNowPlaying;

impl NowPlayingCenter for LoggingNowPlaying {
    fn update(&self, info: &NowPlayingInfo) {
        tracing::info!(
            title = %info.title,
            artist = %info.artist,
            position = info.current_time,
            duration = info.duration,
            playing = info.is_playing,
            "now playing"
        );
    }
}
