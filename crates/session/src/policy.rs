//! Domain policy for session configuration and recovery.
//!
//! Centralizes the fixed option baseline, the fallback configuration used when
//! activating an unconfigured session, and the default timing constants.

use std::time::Duration;

use crate::port::{SessionCategory, SessionOption};

/// Window within which content-identical events of one category are suppressed.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_millis(1000);

/// Delay before reactivating after an interruption that allows resuming.
pub const INTERRUPTION_RESUME_DELAY: Duration = Duration::from_millis(500);

/// Delay before reasserting activation after returning to the foreground.
pub const FOREGROUND_RESUME_DELAY: Duration = Duration::from_millis(300);

/// Routing options applied to every configuration regardless of the request.
pub const BASELINE_OPTIONS: &[SessionOption] = &[
    SessionOption::AllowBluetooth,
    SessionOption::AllowBluetoothA2dp,
    SessionOption::AllowAirPlay,
];

/// Category and caller-controlled flags for one configuration attempt.
///
/// Bluetooth and AirPlay routing are implied by [`BASELINE_OPTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPlan {
    pub category: SessionCategory,
    pub allow_mixing: bool,
    pub duck_others: bool,
}

impl ConfigPlan {
    /// Full option set sent to the port.
    pub fn options(&self) -> Vec<SessionOption> {
        let mut options = BASELINE_OPTIONS.to_vec();
        if self.allow_mixing {
            options.push(SessionOption::MixWithOthers);
        }
        if self.duck_others {
            options.push(SessionOption::DuckOthers);
        }
        options
    }
}

/// Build the plan for a caller request.
///
/// Categories that fall silent on lock are promoted to playback when the
/// caller asked for background audio.
pub fn plan_for(
    category: SessionCategory,
    allow_mixing: bool,
    duck_others: bool,
    background_audio: bool,
) -> ConfigPlan {
    let category = if background_audio && !category.continues_in_background() {
        tracing::warn!(
            requested = %category,
            "category does not play in background, using playback"
        );
        SessionCategory::Playback
    } else {
        category
    };

    ConfigPlan {
        category,
        allow_mixing,
        duck_others,
    }
}

/// Minimal configuration applied when activating before any configure call.
pub fn fallback_plan() -> ConfigPlan {
    ConfigPlan {
        category: SessionCategory::Playback,
        allow_mixing: true,
        duck_others: true,
    }
}

/// Deactivation tells other audio producers they may resume; activation
/// takes exclusive control and passes nothing.
pub fn notify_others_on(active: bool) -> bool {
    !active
}
