//! Command handlers for the consumer-facing contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dto::{
    ConfigureOptions, ConfigureResult, ListenersAddedResult, ListenersRemovedResult,
    NowPlayingArgs, SessionStateDto, SetActiveArgs, SetActiveResult, UpdatedResult,
};
use crate::error::{AudioSessionError, Result};
use crate::now_playing::NowPlayingInfo;
use crate::state::AudioSessionState;

/// Command names as the consumer invokes them.
pub mod command_names {
    pub const CONFIGURE_AUDIO_SESSION: &str = "configureAudioSession";
    pub const SET_ACTIVE: &str = "setActive";
    pub const ADD_LISTENERS: &str = "addListeners";
    pub const REMOVE_AUDIO_LISTENERS: &str = "removeAudioListeners";
    pub const UPDATE_NOW_PLAYING: &str = "updateNowPlaying";
    pub const GET_SESSION_STATE: &str = "getSessionState";
}

/// Apply a session configuration on top of the bluetooth/AirPlay baseline.
pub async fn configure_audio_session(
    state: &AudioSessionState,
    options: ConfigureOptions,
) -> Result<ConfigureResult> {
    let config = state.controller().lock().await.configure(options.into())?;
    Ok(config.into())
}

/// Activate or deactivate the session.
///
/// A successful deactivate abandons pending automatic reactivations.
pub async fn set_active(state: &AudioSessionState, args: SetActiveArgs) -> Result<SetActiveResult> {
    let mut controller = state.controller().lock().await;
    let active = controller.activate(args.active)?;
    if !active {
        // Still under the controller lock, so an attempt already waiting on it
        // sees its token cancelled once it gets in.
        state.pipeline().reactivation().cancel_all();
    }
    Ok(SetActiveResult { active })
}

/// Start delivering session events. Calling again while listening is a no-op.
pub async fn add_listeners(state: &AudioSessionState) -> Result<ListenersAddedResult> {
    state.listeners().lock().await.subscribe()?;
    Ok(ListenersAddedResult {
        listeners_added: true,
    })
}

/// Stop delivering session events and forget dedup history.
pub async fn remove_audio_listeners(state: &AudioSessionState) -> Result<ListenersRemovedResult> {
    state.listeners().lock().await.unsubscribe();
    Ok(ListenersRemovedResult {
        listeners_removed: true,
    })
}

pub fn update_now_playing(state: &AudioSessionState, args: NowPlayingArgs) -> Result<UpdatedResult> {
    let info = NowPlayingInfo::from(args);
    tracing::debug!(title = %info.title, playing = info.is_playing, "now playing updated");
    state.now_playing().update(&info);
    Ok(UpdatedResult { updated: true })
}

pub async fn get_session_state(state: &AudioSessionState) -> Result<SessionStateDto> {
    let listening = state.listeners().lock().await.is_active();
    let controller = state.controller().lock().await;
    Ok(SessionStateDto::new(controller.state(), listening))
}

/// Route a named command with JSON arguments to its handler.
pub async fn dispatch(
    state: &AudioSessionState,
    command: &str,
    args: serde_json::Value,
) -> Result<serde_json::Value> {
    use self::command_names::*;

    match command {
        CONFIGURE_AUDIO_SESSION => {
            to_value(configure_audio_session(state, from_args(args)?).await?)
        }
        SET_ACTIVE => to_value(set_active(state, from_args(args)?).await?),
        ADD_LISTENERS => to_value(add_listeners(state).await?),
        REMOVE_AUDIO_LISTENERS => to_value(remove_audio_listeners(state).await?),
        UPDATE_NOW_PLAYING => to_value(update_now_playing(state, from_args(args)?)?),
        GET_SESSION_STATE => to_value(get_session_state(state).await?),
        other => {
            tracing::warn!(command = other, "unknown command");
            Err(AudioSessionError::UnknownCommand(other.to_string()))
        }
    }
}

/// `null` is accepted wherever an argument object is optional.
fn from_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T> {
    let args = if args.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        args
    };
    Ok(serde_json::from_value(args)?)
}

fn to_value<T: Serialize>(value: T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}
