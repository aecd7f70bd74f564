//! Wire shapes for the consumer-facing commands.
//!
//! Field names are camelCase on the wire; absent arguments take the
//! documented defaults.

use audio_session_core::{SessionCategory, SessionConfig, SessionConfigRequest, SessionState};
use serde::{Deserialize, Serialize};

/// Arguments for `configureAudioSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigureOptions {
    pub allow_mixing: bool,
    pub background_audio: bool,
    pub category: SessionCategory,
    pub duck_others: bool,
}

impl Default for ConfigureOptions {
    fn default() -> Self {
        Self {
            allow_mixing: false,
            background_audio: true,
            category: SessionCategory::Playback,
            duck_others: false,
        }
    }
}

impl From<ConfigureOptions> for SessionConfigRequest {
    fn from(opts: ConfigureOptions) -> Self {
        Self {
            category: opts.category,
            allow_mixing: opts.allow_mixing,
            duck_others: opts.duck_others,
            background_audio: opts.background_audio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureResult {
    pub configured: bool,
    /// Category as the platform applied it.
    pub category: String,
    /// Raw option bits as the platform applied them.
    pub options: Vec<u32>,
}

impl From<SessionConfig> for ConfigureResult {
    fn from(config: SessionConfig) -> Self {
        Self {
            configured: true,
            category: config.resolved.category,
            options: config.resolved.options,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Arguments for `setActive`. A missing flag means activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveArgs {
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveResult {
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenersAddedResult {
    pub listeners_added: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenersRemovedResult {
    pub listeners_removed: bool,
}

/// Arguments for `updateNowPlaying`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NowPlayingArgs {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
    /// Seconds.
    pub current_time: Option<f64>,
    pub is_playing: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResult {
    pub updated: bool,
}

/// Snapshot returned by `getSessionState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateDto {
    pub configured: bool,
    pub active: bool,
    pub category: Option<String>,
    pub listening: bool,
}

impl SessionStateDto {
    pub fn new(state: &SessionState, listening: bool) -> Self {
        Self {
            configured: state.configured,
            active: state.active,
            category: state
                .current_config
                .as_ref()
                .map(|c| c.resolved.category.clone()),
            listening,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_options_defaults() {
        let opts: ConfigureOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ConfigureOptions::default());
        assert!(opts.background_audio);
        assert!(!opts.allow_mixing);
    }

    #[test]
    fn test_configure_options_camel_case() {
        let opts: ConfigureOptions =
            serde_json::from_str(r#"{"allowMixing":true,"category":"ambient","backgroundAudio":false}"#)
                .unwrap();
        assert!(opts.allow_mixing);
        assert!(!opts.background_audio);
        assert_eq!(opts.category, SessionCategory::Ambient);
    }

    #[test]
    fn test_set_active_defaults_to_true() {
        let args: SetActiveArgs = serde_json::from_str("{}").unwrap();
        assert!(args.active);
    }

    #[test]
    fn test_listener_results_wire_names() {
        let added = serde_json::to_value(ListenersAddedResult {
            listeners_added: true,
        })
        .unwrap();
        assert_eq!(added, serde_json::json!({"listenersAdded": true}));

        let removed = serde_json::to_value(ListenersRemovedResult {
            listeners_removed: true,
        })
        .unwrap();
        assert_eq!(removed, serde_json::json!({"listenersRemoved": true}));
    }

    #[test]
    fn test_now_playing_args_partial() {
        let args: NowPlayingArgs =
            serde_json::from_str(r#"{"title":"Song","currentTime":12.5}"#).unwrap();
        assert_eq!(args.title.as_deref(), Some("Song"));
        assert_eq!(args.current_time, Some(12.5));
        assert_eq!(args.artist, None);
        assert_eq!(args.is_playing, None);
    }
}
