//! Plugin state shared by all command handlers.

use std::sync::Arc;

use audio_session_core::{
    ListenerRegistry, PortRef, SessionController, SessionSettings, SharedController,
    SignalPipeline,
};
use audio_session_events::EventBusRef;
use tokio::sync::Mutex;

use crate::now_playing::NowPlayingCenter;

pub struct AudioSessionState {
    /// Session state machine, shared with background reactivation.
    controller: SharedController,
    /// Signal pump; also owns pending reactivations.
    pipeline: Arc<SignalPipeline>,
    /// Owns the platform subscription and the signal pump.
    listeners: Mutex<ListenerRegistry>,
    /// Destination for now-playing metadata.
    now_playing: Arc<dyn NowPlayingCenter>,
}

impl AudioSessionState {
    pub fn new(
        port: PortRef,
        bus: EventBusRef,
        settings: SessionSettings,
        now_playing: Arc<dyn NowPlayingCenter>,
    ) -> Self {
        let controller = Arc::new(tokio::sync::Mutex::new(SessionController::new(Arc::clone(
            &port,
        ))));
        let pipeline = Arc::new(SignalPipeline::new(Arc::clone(&controller), bus, settings));
        Self {
            controller,
            listeners: Mutex::new(ListenerRegistry::new(port, Arc::clone(&pipeline))),
            pipeline,
            now_playing,
        }
    }

    pub fn controller(&self) -> &SharedController {
        &self.controller
    }

    pub fn pipeline(&self) -> &SignalPipeline {
        &self.pipeline
    }

    pub fn listeners(&self) -> &Mutex<ListenerRegistry> {
        &self.listeners
    }

    pub fn now_playing(&self) -> &dyn NowPlayingCenter {
        self.now_playing.as_ref()
    }
}
