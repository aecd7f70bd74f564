use crate::port::{PortError, PortErrorKind};

/// The port rejected a configuration request. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid audio session configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Audio session not initialized: {0}")]
    NotInitialized(String),

    #[error("Audio session already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Audio session configuration rejected: {0}")]
    Rejected(String),
}

impl ConfigError {
    /// Stable machine-readable code for the consumer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::NotInitialized(_) => "not_initialized",
            Self::AlreadyInitialized(_) => "already_initialized",
            Self::Rejected(_) => "configuration_rejected",
        }
    }
}

impl From<PortError> for ConfigError {
    fn from(e: PortError) -> Self {
        match e.kind {
            PortErrorKind::BadParam
            | PortErrorKind::InvalidState
            | PortErrorKind::IncompatibleCategory => Self::InvalidConfiguration(e.message),
            PortErrorKind::NotInitialized => Self::NotInitialized(e.message),
            PortErrorKind::AlreadyInitialized => Self::AlreadyInitialized(e.message),
            PortErrorKind::AlreadyInState | PortErrorKind::Busy | PortErrorKind::Other => {
                Self::Rejected(e.message)
            }
        }
    }
}

/// The port rejected an activate/deactivate request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    #[error("Audio session in invalid state: {0}")]
    InvalidState(String),

    #[error("Activation incompatible with current category: {0}")]
    IncompatibleCategory(String),

    #[error("Audio session already in requested state: {0}")]
    AlreadyInState(String),

    #[error("Audio session busy: {0}")]
    Busy(String),

    /// The fallback configuration applied before activating failed.
    #[error("Fallback configuration failed: {0}")]
    FallbackConfiguration(#[source] ConfigError),

    #[error("Activation rejected: {0}")]
    Rejected(String),
}

impl ActivationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "invalid_state",
            Self::IncompatibleCategory(_) => "incompatible_category",
            Self::AlreadyInState(_) => "already_in_state",
            Self::Busy(_) => "session_busy",
            Self::FallbackConfiguration(_) => "fallback_configuration_failed",
            Self::Rejected(_) => "activation_rejected",
        }
    }
}

impl From<PortError> for ActivationError {
    fn from(e: PortError) -> Self {
        match e.kind {
            PortErrorKind::InvalidState | PortErrorKind::NotInitialized => {
                Self::InvalidState(e.message)
            }
            PortErrorKind::IncompatibleCategory => Self::IncompatibleCategory(e.message),
            PortErrorKind::AlreadyInState => Self::AlreadyInState(e.message),
            PortErrorKind::Busy => Self::Busy(e.message),
            PortErrorKind::BadParam | PortErrorKind::AlreadyInitialized | PortErrorKind::Other => {
                Self::Rejected(e.message)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Failed to subscribe to session signals: {0}")]
    Subscribe(#[from] PortError),

    #[error("No async runtime available to deliver session signals")]
    NoRuntime,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_classification() {
        let err: ConfigError = PortError::new(PortErrorKind::BadParam, "bad category").into();
        assert_eq!(err, ConfigError::InvalidConfiguration("bad category".into()));
        assert_eq!(err.code(), "invalid_configuration");

        let err: ConfigError = PortError::new(PortErrorKind::NotInitialized, "x").into();
        assert_eq!(err.code(), "not_initialized");

        let err: ConfigError = PortError::new(PortErrorKind::AlreadyInitialized, "x").into();
        assert_eq!(err.code(), "already_initialized");

        let err: ConfigError = PortError::new(PortErrorKind::Other, "x").into();
        assert_eq!(err.code(), "configuration_rejected");
    }

    #[test]
    fn test_activation_error_classification() {
        let err: ActivationError = PortError::new(PortErrorKind::Busy, "I/O running").into();
        assert_eq!(err, ActivationError::Busy("I/O running".into()));
        assert_eq!(err.to_string(), "Audio session busy: I/O running");

        let err: ActivationError =
            PortError::new(PortErrorKind::IncompatibleCategory, "record only").into();
        assert_eq!(err.code(), "incompatible_category");

        let err: ActivationError = PortError::new(PortErrorKind::AlreadyInState, "x").into();
        assert_eq!(err.code(), "already_in_state");
    }

    #[test]
    fn test_fallback_error_keeps_source() {
        use std::error::Error;

        let err = ActivationError::FallbackConfiguration(ConfigError::Rejected("denied".into()));
        assert_eq!(err.code(), "fallback_configuration_failed");
        assert!(err.source().is_some());
    }
}
