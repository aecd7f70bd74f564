//! Automatic reactivation after interruptions and app-state transitions.
//!
//! Each trigger owns one pending slot. Arming a trigger that already has a
//! pending attempt cancels the old one, so at most one attempt per trigger is
//! ever waiting. All attempts hang off a root token that `cancel_all` fires
//! and replaces, which makes the policy restartable across subscriptions.
//!
//! Attempts are fire-and-forget: success emits `SessionReady`, failure is
//! logged and waits for the next triggering signal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use audio_session_events::{publish, DomainEvent, EventBusRef};
use tokio_util::sync::CancellationToken;

use crate::settings::SessionSettings;
use crate::SharedController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactivationTrigger {
    InterruptionEnded,
    AppForegrounded,
    AppBackgrounded,
}

impl ReactivationTrigger {
    /// Reported as `cause_reason` on the `SessionReady` event.
    pub fn cause_reason(self) -> &'static str {
        match self {
            Self::InterruptionEnded => "interruption_ended",
            Self::AppForegrounded => "app_foregrounded",
            Self::AppBackgrounded => "app_backgrounded",
        }
    }

    /// Which trigger, if any, an event arms.
    pub fn for_event(event: &DomainEvent) -> Option<Self> {
        match event {
            DomainEvent::InterruptionEnded {
                should_resume: true,
                ..
            } => Some(Self::InterruptionEnded),
            DomainEvent::AppForegrounded { .. } => Some(Self::AppForegrounded),
            DomainEvent::AppBackgrounded { .. } => Some(Self::AppBackgrounded),
            _ => None,
        }
    }
}

struct PendingAttempt {
    id: u64,
    token: CancellationToken,
}

type PendingMap = Arc<Mutex<HashMap<ReactivationTrigger, PendingAttempt>>>;

pub struct ReactivationPolicy {
    controller: SharedController,
    bus: EventBusRef,
    settings: SessionSettings,
    pending: PendingMap,
    root: Mutex<CancellationToken>,
    next_id: AtomicU64,
}

impl ReactivationPolicy {
    pub fn new(controller: SharedController, bus: EventBusRef, settings: SessionSettings) -> Self {
        Self {
            controller,
            bus,
            settings,
            pending: Arc::new(Mutex::new(HashMap::new())),
            root: Mutex::new(CancellationToken::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Delay used for a trigger; zero means attempt right away.
    pub fn delay_for(&self, trigger: ReactivationTrigger) -> Duration {
        match trigger {
            ReactivationTrigger::InterruptionEnded => self.settings.interruption_resume_delay(),
            ReactivationTrigger::AppForegrounded => self.settings.foreground_resume_delay(),
            ReactivationTrigger::AppBackgrounded => Duration::ZERO,
        }
    }

    /// React to a delivered event. Must be called from within a tokio runtime.
    pub fn on_event(&self, event: &DomainEvent) {
        let Some(trigger) = ReactivationTrigger::for_event(event) else {
            return;
        };
        if trigger == ReactivationTrigger::AppBackgrounded && !self.settings.reactivate_on_background
        {
            return;
        }
        self.schedule(trigger, self.delay_for(trigger));
    }

    /// Arm `trigger`, replacing any attempt still pending for it.
    pub fn schedule(&self, trigger: ReactivationTrigger, delay: Duration) {
        let token = match self.root.lock() {
            Ok(root) => root.child_token(),
            Err(_) => return,
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.insert(
                trigger,
                PendingAttempt {
                    id,
                    token: token.clone(),
                },
            ) {
                tracing::debug!(?trigger, "replacing pending reactivation");
                previous.token.cancel();
            }
        }

        tracing::debug!(?trigger, delay_ms = delay.as_millis() as u64, "reactivation scheduled");

        let controller = Arc::clone(&self.controller);
        let bus = Arc::clone(&self.bus);
        let pending = Arc::clone(&self.pending);

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!(?trigger, "reactivation cancelled before firing");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let result = {
                let mut controller = controller.lock().await;
                if token.is_cancelled() {
                    tracing::debug!(?trigger, "reactivation abandoned");
                    return;
                }
                controller.reactivate()
            };

            release(&pending, trigger, id);

            match result {
                Ok(_) if token.is_cancelled() => {
                    tracing::debug!(?trigger, "session reactivated after listeners removed");
                }
                Ok(_) => {
                    tracing::info!(cause = trigger.cause_reason(), "session reactivated");
                    let event = DomainEvent::SessionReady {
                        timestamp: chrono::Utc::now().timestamp_millis(),
                        cause_reason: trigger.cause_reason().to_string(),
                    };
                    publish(&*bus, &event);
                }
                Err(e) => {
                    tracing::warn!(error = %e, cause = trigger.cause_reason(), "reactivation failed");
                }
            }
        });
    }

    /// Whether an attempt for `trigger` is still waiting to run.
    pub fn is_pending(&self, trigger: ReactivationTrigger) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.contains_key(&trigger))
            .unwrap_or(false)
    }

    /// Abandon every pending attempt and start a fresh root for later ones.
    pub fn cancel_all(&self) {
        if let Ok(mut root) = self.root.lock() {
            root.cancel();
            *root = CancellationToken::new();
        }
        if let Ok(mut pending) = self.pending.lock() {
            pending.clear();
        }
    }
}

fn release(pending: &PendingMap, trigger: ReactivationTrigger, id: u64) {
    if let Ok(mut pending) = pending.lock() {
        if pending.get(&trigger).is_some_and(|p| p.id == id) {
            pending.remove(&trigger);
        }
    }
}
