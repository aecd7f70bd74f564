//! Shared event contracts for the audio session event stream.
//!
//! This crate defines the typed domain events the session core produces and
//! the payload shapes the consumer receives. Keeping them in one place means
//! the session core and the plugin surface cannot drift on field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{publish, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use serde::{Deserialize, Serialize};

/// Why an interruption began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionReason {
    /// A competing audio source (phone call, alarm, other app).
    Call,
    /// The OS suspended the app while the session was active.
    AppSuspended,
    /// The built-in microphone was muted.
    MicMuted,
    /// Any reason the platform reports that we do not map explicitly.
    System,
}

/// Why the output route changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteChangeReason {
    DeviceUnavailable,
    DeviceAvailable,
    CategoryChange,
    WakeFromSleep,
    NoSuitableRoute,
    Other,
}

impl RouteChangeReason {
    /// Playback action a consumer should take for this kind of route change.
    pub fn suggested_action(self) -> SuggestedAction {
        match self {
            Self::DeviceUnavailable | Self::CategoryChange | Self::NoSuitableRoute => {
                SuggestedAction::Pause
            }
            Self::DeviceAvailable | Self::WakeFromSleep | Self::Other => SuggestedAction::Continue,
        }
    }
}

/// What the consumer should do with playback after a route change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Pause,
    Continue,
}

/// Grouping used by deduplication and topic routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Interruption,
    RouteChange,
    AppState,
    Session,
}

/// Normalized session event.
///
/// Timestamps are milliseconds since the Unix epoch, set when the raw
/// platform signal was normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    #[serde(rename = "began")]
    InterruptionBegan {
        reason: InterruptionReason,
        timestamp: i64,
    },
    #[serde(rename = "ended")]
    InterruptionEnded { should_resume: bool, timestamp: i64 },
    #[serde(rename = "route_change")]
    RouteChanged {
        reason: RouteChangeReason,
        #[serde(rename = "action")]
        suggested_action: SuggestedAction,
        timestamp: i64,
    },
    #[serde(rename = "background")]
    AppBackgrounded { timestamp: i64 },
    #[serde(rename = "foreground")]
    AppForegrounded { timestamp: i64 },
    #[serde(rename = "ready")]
    SessionReady { timestamp: i64, cause_reason: String },
}

impl DomainEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::InterruptionBegan { timestamp, .. }
            | Self::InterruptionEnded { timestamp, .. }
            | Self::RouteChanged { timestamp, .. }
            | Self::AppBackgrounded { timestamp }
            | Self::AppForegrounded { timestamp }
            | Self::SessionReady { timestamp, .. } => *timestamp,
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            Self::InterruptionBegan { .. } | Self::InterruptionEnded { .. } => {
                EventCategory::Interruption
            }
            Self::RouteChanged { .. } => EventCategory::RouteChange,
            Self::AppBackgrounded { .. } | Self::AppForegrounded { .. } => EventCategory::AppState,
            Self::SessionReady { .. } => EventCategory::Session,
        }
    }

    /// Topic this event is delivered on.
    pub fn topic(&self) -> &'static str {
        match self.category() {
            EventCategory::Interruption => event_names::AUDIO_INTERRUPTION,
            EventCategory::RouteChange => event_names::AUDIO_ROUTE_CHANGE,
            EventCategory::AppState => event_names::APP_STATE_CHANGE,
            EventCategory::Session => event_names::AUDIO_SESSION_READY,
        }
    }

    /// Copy of this event with the timestamp replaced.
    pub fn with_timestamp(&self, timestamp: i64) -> Self {
        let mut event = self.clone();
        match &mut event {
            Self::InterruptionBegan { timestamp: ts, .. }
            | Self::InterruptionEnded { timestamp: ts, .. }
            | Self::RouteChanged { timestamp: ts, .. }
            | Self::AppBackgrounded { timestamp: ts }
            | Self::AppForegrounded { timestamp: ts }
            | Self::SessionReady { timestamp: ts, .. } => *ts = timestamp,
        }
        event
    }

    /// Structural equality ignoring the timestamp.
    pub fn same_content(&self, other: &DomainEvent) -> bool {
        self.with_timestamp(0) == other.with_timestamp(0)
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Interruption began/ended.
    pub const AUDIO_INTERRUPTION: &str = "audioInterruption";
    /// Output route changed.
    pub const AUDIO_ROUTE_CHANGE: &str = "audioRouteChange";
    /// App moved to background or foreground.
    pub const APP_STATE_CHANGE: &str = "appStateChange";
    /// Session was reactivated automatically.
    pub const AUDIO_SESSION_READY: &str = "audioSessionReady";
}
