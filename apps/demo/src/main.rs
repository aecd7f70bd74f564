mod platform;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use audio_session_core::port::codes;
use audio_session_core::{RawInterruption, RawRouteChange, SessionSettings};
use audio_session_plugin::commands::command_names;
use audio_session_plugin::AudioSessionPlugin;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use platform::{LoggingEventBus, LoggingNowPlaying, SimulatedPlatform};

/// JSON overrides for [`SessionSettings`], e.g. `{"foreground_resume_delay_ms": 100}`.
const SETTINGS_ENV: &str = "AUDIO_SESSION_SETTINGS";

fn load_settings() -> anyhow::Result<SessionSettings> {
    match std::env::var(SETTINGS_ENV) {
        Ok(json) => SessionSettings::from_json(&json)
            .with_context(|| format!("invalid {}", SETTINGS_ENV)),
        Err(_) => Ok(SessionSettings::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,audio_session=debug")),
        )
        .init();

    let settings = load_settings()?;
    tracing::info!(?settings, "starting audio session demo");

    let platform = Arc::new(SimulatedPlatform::default());
    let plugin = AudioSessionPlugin::builder(platform.clone())
        .event_bus(Arc::new(LoggingEventBus))
        .now_playing(Arc::new(LoggingNowPlaying))
        .settings(settings)
        .build()?;

    let configured = plugin
        .invoke(
            command_names::CONFIGURE_AUDIO_SESSION,
            json!({"allowMixing": false, "backgroundAudio": true}),
        )
        .await?;
    tracing::info!(%configured, "configureAudioSession");

    plugin.invoke(command_names::ADD_LISTENERS, json!({})).await?;
    plugin
        .invoke(command_names::SET_ACTIVE, json!({"active": true}))
        .await?;
    plugin
        .invoke(
            command_names::UPDATE_NOW_PLAYING,
            json!({"title": "Evening Stream", "artist": "Radio", "isPlaying": true}),
        )
        .await?;

    let pause = Duration::from_millis(800);

    tracing::info!("-- headphones unplugged (delivered twice by the platform)");
    platform.change_route(RawRouteChange::new(codes::ROUTE_OLD_DEVICE_UNAVAILABLE));
    platform.change_route(RawRouteChange::new(codes::ROUTE_OLD_DEVICE_UNAVAILABLE));
    tokio::time::sleep(pause).await;

    tracing::info!("-- incoming call");
    platform.interrupt(RawInterruption::began(None));
    tokio::time::sleep(pause).await;
    platform.interrupt(RawInterruption::ended(true));
    tokio::time::sleep(pause).await;

    tracing::info!("-- app backgrounded and foregrounded");
    platform.enter_background();
    tokio::time::sleep(pause).await;
    platform.enter_foreground();
    tokio::time::sleep(pause).await;

    let state = plugin.session_state().await?;
    tracing::info!(?state, "final session state");

    plugin
        .invoke(command_names::REMOVE_AUDIO_LISTENERS, json!({}))
        .await?;
    plugin
        .invoke(command_names::SET_ACTIVE, json!({"active": false}))
        .await?;

    tracing::info!("demo finished");
    Ok(())
}
