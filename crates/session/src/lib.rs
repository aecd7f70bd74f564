//! Audio session lifecycle core.
//!
//! Owns the session state machine and turns raw platform signals into a
//! clean, deduplicated event stream, re-activating the session automatically
//! after interruptions and app-state transitions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                            │
//! │  port.rs       - CapabilityPort trait, raw signal types     │
//! │  policy.rs     - Option baseline, fallback, timing          │
//! │  normalizer.rs - Raw signal → DomainEvent (pure)            │
//! │  dedup.rs      - Per-category duplicate suppression         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                         │
//! │  controller.rs   - Session state, configure / activate      │
//! │  reactivation.rs - Delayed, cancellable recovery attempts   │
//! │  pipeline.rs     - Signal pump feeding the event bus        │
//! │  registry.rs     - Subscription lifecycle                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use audio_session_core::{ListenerRegistry, SessionController, SignalPipeline};
//! use std::sync::Arc;
//!
//! let controller = Arc::new(tokio::sync::Mutex::new(SessionController::new(port.clone())));
//! let pipeline = Arc::new(SignalPipeline::new(controller.clone(), bus, settings));
//! let mut listeners = ListenerRegistry::new(port, pipeline);
//! listeners.subscribe()?;
//! ```

mod controller;
mod dedup;
mod error;
mod normalizer;
mod pipeline;
mod reactivation;
mod registry;
mod settings;

pub mod policy;
pub mod port;
pub mod testing;

use std::sync::Arc;

pub use controller::{SessionConfig, SessionConfigRequest, SessionController, SessionState};
pub use dedup::DedupFilter;
pub use error::{ActivationError, ConfigError, ListenerError, SettingsError};
pub use normalizer::{interruption_reason, normalize, normalize_at, route_change_reason};
pub use pipeline::SignalPipeline;
pub use port::{
    AppliedConfig, CapabilityPort, PortError, PortErrorKind, PortRef, RawInterruption,
    RawRouteChange, RawSignal, SessionCategory, SessionOption, SignalHandlers, SubscriptionHandle,
};
pub use reactivation::{ReactivationPolicy, ReactivationTrigger};
pub use registry::ListenerRegistry;
pub use settings::SessionSettings;

/// Controller shared between command handlers and background reactivation.
pub type SharedController = Arc<tokio::sync::Mutex<SessionController>>;
