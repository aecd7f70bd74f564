//! Capability port: the platform audio-routing surface the session core drives.
//!
//! The core never talks to a native API directly. Everything it needs from
//! the platform goes through [`CapabilityPort`], and everything the platform
//! reports comes back as raw signals delivered to [`SignalHandlers`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Audio session category requested from the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    #[default]
    Playback,
    PlayAndRecord,
    Record,
    Ambient,
    SoloAmbient,
}

impl SessionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playback => "playback",
            Self::PlayAndRecord => "play_and_record",
            Self::Record => "record",
            Self::Ambient => "ambient",
            Self::SoloAmbient => "solo_ambient",
        }
    }

    /// Whether audio in this category keeps running when the screen locks
    /// or the app is backgrounded.
    pub fn continues_in_background(self) -> bool {
        !matches!(self, Self::Ambient | Self::SoloAmbient)
    }
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category option flags understood by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOption {
    MixWithOthers,
    DuckOthers,
    AllowBluetooth,
    AllowBluetoothA2dp,
    AllowAirPlay,
}

impl SessionOption {
    /// Raw option bit as the platform reports it.
    pub const fn raw(self) -> u32 {
        match self {
            Self::MixWithOthers => 0x1,
            Self::DuckOthers => 0x2,
            Self::AllowBluetooth => 0x4,
            Self::AllowBluetoothA2dp => 0x20,
            Self::AllowAirPlay => 0x40,
        }
    }
}

/// What the platform actually applied. Providers may coerce requested values,
/// so this is reported back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedConfig {
    pub category: String,
    pub options: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortErrorKind {
    /// A parameter or property value was rejected.
    BadParam,
    NotInitialized,
    AlreadyInitialized,
    /// The session is in a state where the operation is not allowed.
    InvalidState,
    /// The current category does not support the request.
    IncompatibleCategory,
    /// The session is already in the requested activation state.
    AlreadyInState,
    /// Deactivation refused while I/O is still running.
    Busy,
    Other,
}

/// Failure reported by the capability port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct PortError {
    pub kind: PortErrorKind,
    pub message: String,
}

impl PortError {
    pub fn new(kind: PortErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Raw signal codes as the platform reports them.
pub mod codes {
    pub const INTERRUPTION_ENDED: u32 = 0;
    pub const INTERRUPTION_BEGAN: u32 = 1;

    pub const INTERRUPTION_REASON_DEFAULT: u32 = 0;
    pub const INTERRUPTION_REASON_APP_SUSPENDED: u32 = 1;
    pub const INTERRUPTION_REASON_MIC_MUTED: u32 = 2;

    /// Bit set in the interruption options when playback may resume.
    pub const INTERRUPTION_OPTION_SHOULD_RESUME: u32 = 0x1;

    pub const ROUTE_UNKNOWN: u32 = 0;
    pub const ROUTE_NEW_DEVICE_AVAILABLE: u32 = 1;
    pub const ROUTE_OLD_DEVICE_UNAVAILABLE: u32 = 2;
    pub const ROUTE_CATEGORY_CHANGE: u32 = 3;
    pub const ROUTE_OVERRIDE: u32 = 4;
    pub const ROUTE_WAKE_FROM_SLEEP: u32 = 6;
    pub const ROUTE_NO_SUITABLE_ROUTE: u32 = 7;
    pub const ROUTE_CONFIGURATION_CHANGE: u32 = 8;
}

/// Interruption notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInterruption {
    pub kind: u32,
    pub reason: Option<u32>,
    pub options: Option<u32>,
}

impl RawInterruption {
    pub fn began(reason: Option<u32>) -> Self {
        Self {
            kind: codes::INTERRUPTION_BEGAN,
            reason,
            options: None,
        }
    }

    pub fn ended(should_resume: bool) -> Self {
        Self {
            kind: codes::INTERRUPTION_ENDED,
            reason: None,
            options: Some(if should_resume {
                codes::INTERRUPTION_OPTION_SHOULD_RESUME
            } else {
                0
            }),
        }
    }
}

/// Route-change notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRouteChange {
    pub reason: Option<u32>,
}

impl RawRouteChange {
    pub fn new(reason: u32) -> Self {
        Self {
            reason: Some(reason),
        }
    }
}

/// Any raw signal, as carried on the internal signal channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSignal {
    Interruption(RawInterruption),
    RouteChange(RawRouteChange),
    AppBackground,
    AppForeground,
}

pub type InterruptionCallback = Arc<dyn Fn(RawInterruption) + Send + Sync + 'static>;
pub type RouteChangeCallback = Arc<dyn Fn(RawRouteChange) + Send + Sync + 'static>;
pub type AppStateCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Callbacks handed to the port on subscribe.
#[derive(Clone)]
pub struct SignalHandlers {
    pub on_interruption: InterruptionCallback,
    pub on_route_change: RouteChangeCallback,
    pub on_app_background: AppStateCallback,
    pub on_app_foreground: AppStateCallback,
}

impl SignalHandlers {
    /// Handlers that forward every signal into one channel, so the rest of
    /// the pipeline consumes a single ordered stream.
    pub fn forwarding(tx: mpsc::UnboundedSender<RawSignal>) -> Self {
        let send = move |signal: RawSignal| {
            if tx.send(signal).is_err() {
                tracing::debug!(?signal, "signal channel closed, dropping");
            }
        };
        let on_interruption = {
            let send = send.clone();
            Arc::new(move |raw: RawInterruption| send(RawSignal::Interruption(raw))) as InterruptionCallback
        };
        let on_route_change = {
            let send = send.clone();
            Arc::new(move |raw: RawRouteChange| send(RawSignal::RouteChange(raw))) as RouteChangeCallback
        };
        let on_app_background = {
            let send = send.clone();
            Arc::new(move || send(RawSignal::AppBackground)) as AppStateCallback
        };
        let on_app_foreground = Arc::new(move || send(RawSignal::AppForeground)) as AppStateCallback;

        Self {
            on_interruption,
            on_route_change,
            on_app_background,
            on_app_foreground,
        }
    }
}

impl fmt::Debug for SignalHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHandlers").finish_non_exhaustive()
    }
}

/// Opaque token identifying one port subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(uuid::Uuid);

impl SubscriptionHandle {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform audio-routing operations.
///
/// Implementations must tolerate redundant `set_active(true)` calls: a caller
/// activation and an automatic reactivation may both reach the port.
pub trait CapabilityPort: Send + Sync {
    /// Apply a category and option set.
    fn apply_configuration(
        &self,
        category: SessionCategory,
        options: &[SessionOption],
    ) -> Result<AppliedConfig, PortError>;

    /// Activate or deactivate the session.
    fn set_active(&self, active: bool, notify_on_deactivate: bool) -> Result<(), PortError>;

    /// Start delivering platform signals to `handlers`.
    fn subscribe(&self, handlers: SignalHandlers) -> Result<SubscriptionHandle, PortError>;

    /// Stop delivering signals for `handle`.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Type alias for shared port reference.
pub type PortRef = Arc<dyn CapabilityPort>;
