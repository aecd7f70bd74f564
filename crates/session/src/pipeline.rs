//! Signal pump: raw signal → normalize → dedup → publish → reactivation.
//!
//! All port callbacks funnel into one channel, so events are handled one at a
//! time in arrival order and the dedup state is never touched concurrently.

use std::sync::{Arc, Mutex};

use audio_session_events::{publish, DomainEvent, EventBusRef};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::dedup::DedupFilter;
use crate::normalizer;
use crate::port::RawSignal;
use crate::reactivation::ReactivationPolicy;
use crate::settings::SessionSettings;
use crate::SharedController;

pub struct SignalPipeline {
    dedup: Mutex<DedupFilter>,
    controller: SharedController,
    reactivation: ReactivationPolicy,
    bus: EventBusRef,
}

impl SignalPipeline {
    pub fn new(controller: SharedController, bus: EventBusRef, settings: SessionSettings) -> Self {
        Self {
            dedup: Mutex::new(DedupFilter::new(settings.dedup_window())),
            reactivation: ReactivationPolicy::new(
                Arc::clone(&controller),
                Arc::clone(&bus),
                settings,
            ),
            controller,
            bus,
        }
    }

    pub fn reactivation(&self) -> &ReactivationPolicy {
        &self.reactivation
    }

    /// Handle a single raw signal. Returns the event if it was delivered.
    pub async fn process(&self, signal: RawSignal) -> Option<DomainEvent> {
        let event = normalizer::normalize(&signal)?;
        self.deliver(event).await
    }

    /// Deliver an already-normalized event.
    pub async fn deliver(&self, event: DomainEvent) -> Option<DomainEvent> {
        self.deliver_unless_cancelled(event, None).await
    }

    async fn deliver_unless_cancelled(
        &self,
        event: DomainEvent,
        cancel: Option<&CancellationToken>,
    ) -> Option<DomainEvent> {
        // The platform has already taken the session away; record it even if
        // the event itself turns out to be a duplicate.
        if matches!(event, DomainEvent::InterruptionBegan { .. }) {
            self.controller.lock().await.resign();
        }

        // Checked under the dedup lock: `reset` takes the same lock, so a pump
        // that was stopped while parked above cannot repopulate cleared state.
        let mut dedup = match self.dedup.lock() {
            Ok(dedup) => dedup,
            Err(poisoned) => poisoned.into_inner(),
        };
        if cancel.is_some_and(|c| c.is_cancelled()) {
            tracing::debug!(?event, "listeners removed, dropping event");
            return None;
        }
        if !dedup.admit(&event) {
            return None;
        }

        tracing::debug!(topic = event.topic(), ?event, "delivering event");
        publish(&*self.bus, &event);
        self.reactivation.on_event(&event);
        Some(event)
    }

    /// Drain `rx` until it closes or `cancel` fires.
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<RawSignal>, cancel: CancellationToken) {
        tracing::debug!("signal pump started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                signal = rx.recv() => match signal {
                    Some(signal) => {
                        if let Some(event) = normalizer::normalize(&signal) {
                            self.deliver_unless_cancelled(event, Some(&cancel)).await;
                        }
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("signal pump stopped");
    }

    /// Drop dedup history and abandon pending reactivations.
    pub fn reset(&self) {
        match self.dedup.lock() {
            Ok(mut dedup) => dedup.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
        self.reactivation.cancel_all();
    }
}
