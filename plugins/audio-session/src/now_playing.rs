//! Now-playing metadata pass-through.
//!
//! Stateless: each update is forwarded as-is after default substitution.

use serde::Serialize;

use crate::dto::NowPlayingArgs;

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_ARTIST: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    pub duration: f64,
    pub current_time: f64,
    pub is_playing: bool,
}

impl From<NowPlayingArgs> for NowPlayingInfo {
    fn from(args: NowPlayingArgs) -> Self {
        Self {
            title: args.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            artist: args.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            duration: args.duration.unwrap_or(0.0),
            current_time: args.current_time.unwrap_or(0.0),
            is_playing: args.is_playing.unwrap_or(false),
        }
    }
}

/// Sink for lock-screen / media-center metadata.
pub trait NowPlayingCenter: Send + Sync {
    fn update(&self, info: &NowPlayingInfo);
}

/// Used when no media center is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNowPlayingCenter;

impl NowPlayingCenter for NullNowPlayingCenter {
    fn update(&self, _info: &NowPlayingInfo) {}
}
