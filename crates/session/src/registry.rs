//! Listener registry: owns the platform subscription and the signal pump.
//!
//! At most one subscription exists at a time. Subscribing again is a no-op.
//! Unsubscribing stops the pump, clears dedup history and abandons pending
//! reactivations, so a later subscribe starts from a clean slate.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ListenerError;
use crate::pipeline::SignalPipeline;
use crate::port::{PortRef, SignalHandlers, SubscriptionHandle};

struct ActiveSubscription {
    handle: SubscriptionHandle,
    cancel: CancellationToken,
}

pub struct ListenerRegistry {
    port: PortRef,
    pipeline: Arc<SignalPipeline>,
    active: Option<ActiveSubscription>,
}

impl ListenerRegistry {
    pub fn new(port: PortRef, pipeline: Arc<SignalPipeline>) -> Self {
        Self {
            port,
            pipeline,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start observing platform signals. Idempotent.
    ///
    /// Must be called from within a tokio runtime; the pump runs as a task on it.
    pub fn subscribe(&mut self) -> Result<(), ListenerError> {
        if self.active.is_some() {
            tracing::debug!("listeners already registered");
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ListenerError::NoRuntime)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.port.subscribe(SignalHandlers::forwarding(tx))?;

        let cancel = CancellationToken::new();
        let pipeline = Arc::clone(&self.pipeline);
        let pump_cancel = cancel.clone();
        runtime.spawn(async move {
            pipeline.run(rx, pump_cancel).await;
        });

        tracing::info!(?handle, "audio session listeners registered");
        self.active = Some(ActiveSubscription { handle, cancel });
        Ok(())
    }

    /// Stop observing platform signals. Safe to call at any time.
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.active.take() {
            self.port.unsubscribe(subscription.handle);
            subscription.cancel.cancel();
            tracing::info!("audio session listeners removed");
        }
        self.pipeline.reset();
    }
}

impl Drop for ListenerRegistry {
    fn drop(&mut self) {
        if let Some(subscription) = self.active.take() {
            self.port.unsubscribe(subscription.handle);
            subscription.cancel.cancel();
        }
    }
}
