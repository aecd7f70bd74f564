//! Raw platform signal → typed domain event.
//!
//! Pure mapping. The timestamp is the only field that depends on when the
//! signal was normalized. Unmapped reason codes fall into the catch-all
//! variants; signals that cannot be read at all are dropped.

use audio_session_events::{DomainEvent, InterruptionReason, RouteChangeReason};

use crate::port::{codes, RawInterruption, RawRouteChange, RawSignal};

/// Normalize using the current wall clock.
pub fn normalize(signal: &RawSignal) -> Option<DomainEvent> {
    normalize_at(signal, chrono::Utc::now().timestamp_millis())
}

/// Normalize with an explicit timestamp (milliseconds since epoch).
pub fn normalize_at(signal: &RawSignal, timestamp: i64) -> Option<DomainEvent> {
    match signal {
        RawSignal::Interruption(raw) => normalize_interruption(raw, timestamp),
        RawSignal::RouteChange(raw) => normalize_route_change(raw, timestamp),
        RawSignal::AppBackground => Some(DomainEvent::AppBackgrounded { timestamp }),
        RawSignal::AppForeground => Some(DomainEvent::AppForegrounded { timestamp }),
    }
}

fn normalize_interruption(raw: &RawInterruption, timestamp: i64) -> Option<DomainEvent> {
    match raw.kind {
        codes::INTERRUPTION_BEGAN => Some(DomainEvent::InterruptionBegan {
            reason: interruption_reason(raw.reason),
            timestamp,
        }),
        codes::INTERRUPTION_ENDED => {
            let options = raw.options.unwrap_or(0);
            Some(DomainEvent::InterruptionEnded {
                should_resume: options & codes::INTERRUPTION_OPTION_SHOULD_RESUME != 0,
                timestamp,
            })
        }
        kind => {
            tracing::debug!(kind, "unknown interruption type, dropping");
            None
        }
    }
}

fn normalize_route_change(raw: &RawRouteChange, timestamp: i64) -> Option<DomainEvent> {
    let Some(code) = raw.reason else {
        tracing::debug!("route change without reason, dropping");
        return None;
    };
    let reason = route_change_reason(code);
    Some(DomainEvent::RouteChanged {
        reason,
        suggested_action: reason.suggested_action(),
        timestamp,
    })
}

/// A began signal without a reason is treated as a competing call.
pub fn interruption_reason(code: Option<u32>) -> InterruptionReason {
    match code {
        None | Some(codes::INTERRUPTION_REASON_DEFAULT) => InterruptionReason::Call,
        Some(codes::INTERRUPTION_REASON_APP_SUSPENDED) => InterruptionReason::AppSuspended,
        Some(codes::INTERRUPTION_REASON_MIC_MUTED) => InterruptionReason::MicMuted,
        Some(_) => InterruptionReason::System,
    }
}

pub fn route_change_reason(code: u32) -> RouteChangeReason {
    match code {
        codes::ROUTE_OLD_DEVICE_UNAVAILABLE => RouteChangeReason::DeviceUnavailable,
        codes::ROUTE_NEW_DEVICE_AVAILABLE => RouteChangeReason::DeviceAvailable,
        codes::ROUTE_CATEGORY_CHANGE | codes::ROUTE_OVERRIDE => RouteChangeReason::CategoryChange,
        codes::ROUTE_WAKE_FROM_SLEEP => RouteChangeReason::WakeFromSleep,
        codes::ROUTE_NO_SUITABLE_ROUTE => RouteChangeReason::NoSuitableRoute,
        _ => RouteChangeReason::Other,
    }
}
