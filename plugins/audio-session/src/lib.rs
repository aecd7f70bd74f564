//! Audio session plugin.
//!
//! Exposes the session core to a consumer as a small command surface
//! (`configureAudioSession`, `setActive`, `addListeners`,
//! `removeAudioListeners`, `updateNowPlaying`) plus a push event stream on
//! the topics in [`audio_session_events::event_names`].

pub mod commands;
mod dto;
mod error;
mod now_playing;
mod state;

use std::sync::Arc;

use audio_session_core::{PortRef, SessionSettings};
use audio_session_events::{EventBusRef, NullEventBus};

pub use dto::{
    ConfigureOptions, ConfigureResult, ListenersAddedResult, ListenersRemovedResult,
    NowPlayingArgs, SessionStateDto, SetActiveArgs, SetActiveResult, UpdatedResult,
};
pub use error::{AudioSessionError, Result};
pub use now_playing::{NowPlayingCenter, NowPlayingInfo, NullNowPlayingCenter};
pub use state::AudioSessionState;

pub const PLUGIN_NAME: &str = "audio-session";

pub struct Builder {
    port: PortRef,
    bus: Option<EventBusRef>,
    settings: SessionSettings,
    now_playing: Option<Arc<dyn NowPlayingCenter>>,
}

impl Builder {
    pub fn new(port: PortRef) -> Self {
        Self {
            port,
            bus: None,
            settings: SessionSettings::default(),
            now_playing: None,
        }
    }

    /// Where session events are pushed. Defaults to discarding them.
    pub fn event_bus(mut self, bus: EventBusRef) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn now_playing(mut self, center: Arc<dyn NowPlayingCenter>) -> Self {
        self.now_playing = Some(center);
        self
    }

    pub fn build(self) -> Result<AudioSessionPlugin> {
        self.settings.validate()?;
        let bus = self.bus.unwrap_or_else(|| Arc::new(NullEventBus) as EventBusRef);
        let now_playing = self
            .now_playing
            .unwrap_or_else(|| Arc::new(NullNowPlayingCenter) as Arc<dyn NowPlayingCenter>);

        tracing::debug!(settings = ?self.settings, "audio session plugin initialised");
        Ok(AudioSessionPlugin {
            state: Arc::new(AudioSessionState::new(
                self.port,
                bus,
                self.settings,
                now_playing,
            )),
        })
    }
}

#[derive(Clone)]
pub struct AudioSessionPlugin {
    state: Arc<AudioSessionState>,
}

impl AudioSessionPlugin {
    pub fn builder(port: PortRef) -> Builder {
        Builder::new(port)
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn state(&self) -> &AudioSessionState {
        &self.state
    }

    /// Invoke a command by name with JSON arguments, returning the JSON result.
    pub async fn invoke(&self, command: &str, args: serde_json::Value) -> Result<serde_json::Value> {
        commands::dispatch(&self.state, command, args).await
    }

    pub async fn configure_audio_session(&self, options: ConfigureOptions) -> Result<ConfigureResult> {
        commands::configure_audio_session(&self.state, options).await
    }

    pub async fn set_active(&self, active: bool) -> Result<SetActiveResult> {
        commands::set_active(&self.state, SetActiveArgs { active }).await
    }

    pub async fn add_listeners(&self) -> Result<ListenersAddedResult> {
        commands::add_listeners(&self.state).await
    }

    pub async fn remove_audio_listeners(&self) -> Result<ListenersRemovedResult> {
        commands::remove_audio_listeners(&self.state).await
    }

    pub fn update_now_playing(&self, args: NowPlayingArgs) -> Result<UpdatedResult> {
        commands::update_now_playing(&self.state, args)
    }

    pub async fn session_state(&self) -> Result<SessionStateDto> {
        commands::get_session_state(&self.state).await
    }
}
