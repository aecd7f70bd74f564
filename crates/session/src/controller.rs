//! Session state controller.
//!
//! Sole writer of [`SessionState`]. Every mutation goes through the
//! capability port first and is recorded only after the port confirms it.
//!
//! ```text
//! Unconfigured ──configure──▶ Configured ──activate(true)──▶ Active
//!      │                                                    ▲   │
//!      └──────activate(true) (fallback configure)───────────┘   │
//!                                Inactive ◀──activate(false)────┤
//!                                Inactive ◀──resign (platform)──┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ActivationError, ConfigError};
use crate::policy::{self, ConfigPlan};
use crate::port::{AppliedConfig, PortRef, SessionCategory};

/// Caller request for `configure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfigRequest {
    pub category: SessionCategory,
    pub allow_mixing: bool,
    pub duck_others: bool,
    pub background_audio: bool,
}

impl Default for SessionConfigRequest {
    fn default() -> Self {
        Self {
            category: SessionCategory::Playback,
            allow_mixing: false,
            duck_others: false,
            background_audio: true,
        }
    }
}

/// An applied configuration. Replaced wholesale by the next successful configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub category: SessionCategory,
    pub allow_mixing: bool,
    pub duck_others: bool,
    /// Always true; bluetooth routing is part of the baseline.
    pub allow_bluetooth: bool,
    /// Always true; AirPlay routing is part of the baseline.
    pub allow_airplay: bool,
    /// Category and options as the port resolved them.
    pub resolved: AppliedConfig,
}

impl SessionConfig {
    fn from_plan(plan: ConfigPlan, resolved: AppliedConfig) -> Self {
        Self {
            category: plan.category,
            allow_mixing: plan.allow_mixing,
            duck_others: plan.duck_others,
            allow_bluetooth: true,
            allow_airplay: true,
            resolved,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub configured: bool,
    pub active: bool,
    pub current_config: Option<SessionConfig>,
}

pub struct SessionController {
    port: PortRef,
    state: SessionState,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    pub fn new(port: PortRef) -> Self {
        Self {
            port,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_configured(&self) -> bool {
        self.state.configured
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Apply a caller configuration on top of the fixed routing baseline.
    pub fn configure(&mut self, request: SessionConfigRequest) -> Result<SessionConfig, ConfigError> {
        let plan = policy::plan_for(
            request.category,
            request.allow_mixing,
            request.duck_others,
            request.background_audio,
        );
        self.apply(plan)
    }

    fn apply(&mut self, plan: ConfigPlan) -> Result<SessionConfig, ConfigError> {
        let options = plan.options();
        let resolved = self
            .port
            .apply_configuration(plan.category, &options)
            .map_err(|e| {
                tracing::error!(error = %e, category = %plan.category, "configure rejected by port");
                ConfigError::from(e)
            })?;

        let config = SessionConfig::from_plan(plan, resolved);
        tracing::info!(
            category = %config.resolved.category,
            options = ?config.resolved.options,
            "audio session configured"
        );
        self.state.configured = true;
        self.state.current_config = Some(config.clone());
        Ok(config)
    }

    /// Activate or deactivate the session.
    ///
    /// Activating an unconfigured session applies [`policy::fallback_plan`]
    /// first; a failure there is reported as
    /// [`ActivationError::FallbackConfiguration`].
    pub fn activate(&mut self, active: bool) -> Result<bool, ActivationError> {
        if active && !self.state.configured {
            tracing::info!("activating before configure, applying fallback configuration");
            self.apply(policy::fallback_plan())
                .map_err(ActivationError::FallbackConfiguration)?;
        }

        self.port
            .set_active(active, policy::notify_others_on(active))
            .map_err(|e| {
                tracing::warn!(error = %e, active, "set_active rejected by port");
                ActivationError::from(e)
            })?;

        self.state.active = active;
        tracing::info!(active, "audio session activation changed");
        Ok(active)
    }

    /// Internal activation path used by automatic recovery.
    pub(crate) fn reactivate(&mut self) -> Result<bool, ActivationError> {
        self.activate(true)
    }

    /// Record that the platform deactivated the session on its own.
    /// Configuration is kept.
    pub fn resign(&mut self) {
        if self.state.active {
            tracing::info!("audio session resigned by platform");
            self.state.active = false;
        }
    }
}
