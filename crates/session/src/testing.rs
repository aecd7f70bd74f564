//! In-memory capability port for tests and simulations.
//!
//! Records every port call, can be told to fail configure or activation, and
//! lets the caller inject raw signals through the subscribed handlers.

use std::sync::Mutex;

use crate::port::{
    AppliedConfig, CapabilityPort, PortError, RawInterruption, RawRouteChange, SessionCategory,
    SessionOption, SignalHandlers, SubscriptionHandle,
};

/// A captured call on [`RecordingPort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    ApplyConfiguration {
        category: SessionCategory,
        options: Vec<SessionOption>,
    },
    SetActive {
        active: bool,
        notify_on_deactivate: bool,
    },
    Subscribe,
    Unsubscribe,
}

#[derive(Default)]
struct Inner {
    calls: Vec<PortCall>,
    subscription: Option<(SubscriptionHandle, SignalHandlers)>,
    configure_failure: Option<PortError>,
    activation_failure: Option<PortError>,
    subscribe_failure: Option<PortError>,
    resolved_category: Option<String>,
}

#[derive(Default)]
pub struct RecordingPort {
    inner: Mutex<Inner>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Fail every configure until cleared with `None`.
    pub fn fail_configure(&self, error: Option<PortError>) {
        self.with(|inner| inner.configure_failure = error);
    }

    /// Fail every activate (not deactivate) until cleared with `None`.
    pub fn fail_activation(&self, error: Option<PortError>) {
        self.with(|inner| inner.activation_failure = error);
    }

    pub fn fail_subscribe(&self, error: Option<PortError>) {
        self.with(|inner| inner.subscribe_failure = error);
    }

    /// Report a different category than requested, as a coercing platform would.
    pub fn resolve_category_as(&self, category: impl Into<String>) {
        let category = category.into();
        self.with(|inner| inner.resolved_category = Some(category));
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.with(|inner| inner.calls.clone())
    }

    pub fn apply_count(&self) -> usize {
        self.with(|inner| {
            inner
                .calls
                .iter()
                .filter(|c| matches!(c, PortCall::ApplyConfiguration { .. }))
                .count()
        })
    }

    /// `(active, notify_on_deactivate)` for each set_active call.
    pub fn set_active_calls(&self) -> Vec<(bool, bool)> {
        self.with(|inner| {
            inner
                .calls
                .iter()
                .filter_map(|c| match c {
                    PortCall::SetActive {
                        active,
                        notify_on_deactivate,
                    } => Some((*active, *notify_on_deactivate)),
                    _ => None,
                })
                .collect()
        })
    }

    pub fn subscribe_count(&self) -> usize {
        self.with(|inner| {
            inner
                .calls
                .iter()
                .filter(|c| matches!(c, PortCall::Subscribe))
                .count()
        })
    }

    pub fn is_subscribed(&self) -> bool {
        self.with(|inner| inner.subscription.is_some())
    }

    fn handlers(&self) -> Option<SignalHandlers> {
        self.with(|inner| inner.subscription.as_ref().map(|(_, h)| h.clone()))
    }

    /// Deliver an interruption signal. Returns false when nobody is subscribed.
    pub fn emit_interruption(&self, raw: RawInterruption) -> bool {
        self.handlers()
            .map(|h| (h.on_interruption)(raw))
            .is_some()
    }

    pub fn emit_route_change(&self, raw: RawRouteChange) -> bool {
        self.handlers()
            .map(|h| (h.on_route_change)(raw))
            .is_some()
    }

    pub fn emit_app_background(&self) -> bool {
        self.handlers().map(|h| (h.on_app_background)()).is_some()
    }

    pub fn emit_app_foreground(&self) -> bool {
        self.handlers().map(|h| (h.on_app_foreground)()).is_some()
    }
}

impl CapabilityPort for RecordingPort {
    fn apply_configuration(
        &self,
        category: SessionCategory,
        options: &[SessionOption],
    ) -> Result<AppliedConfig, PortError> {
        self.with(|inner| {
            inner.calls.push(PortCall::ApplyConfiguration {
                category,
                options: options.to_vec(),
            });
            if let Some(err) = inner.configure_failure.clone() {
                return Err(err);
            }
            Ok(AppliedConfig {
                category: inner
                    .resolved_category
                    .clone()
                    .unwrap_or_else(|| category.as_str().to_string()),
                options: options.iter().map(|o| o.raw()).collect(),
            })
        })
    }

    fn set_active(&self, active: bool, notify_on_deactivate: bool) -> Result<(), PortError> {
        self.with(|inner| {
            inner.calls.push(PortCall::SetActive {
                active,
                notify_on_deactivate,
            });
            match inner.activation_failure.clone() {
                Some(err) if active => Err(err),
                _ => Ok(()),
            }
        })
    }

    fn subscribe(&self, handlers: SignalHandlers) -> Result<SubscriptionHandle, PortError> {
        self.with(|inner| {
            inner.calls.push(PortCall::Subscribe);
            if let Some(err) = inner.subscribe_failure.clone() {
                return Err(err);
            }
            let handle = SubscriptionHandle::new();
            inner.subscription = Some((handle, handlers));
            Ok(handle)
        })
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.with(|inner| {
            inner.calls.push(PortCall::Unsubscribe);
            if inner
                .subscription
                .as_ref()
                .is_some_and(|(current, _)| *current == handle)
            {
                inner.subscription = None;
            }
        });
    }
}
