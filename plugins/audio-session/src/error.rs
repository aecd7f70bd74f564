use audio_session_core::{ActivationError, ConfigError, ListenerError, SettingsError};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum AudioSessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl AudioSessionError {
    /// Stable machine-readable code for the consumer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code(),
            Self::Activation(e) => e.code(),
            Self::Listener(ListenerError::Subscribe(_)) => "listener_subscribe_failed",
            Self::Listener(ListenerError::NoRuntime) => "listener_no_runtime",
            Self::Settings(_) => "invalid_settings",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidArguments(_) => "invalid_arguments",
        }
    }
}

impl Serialize for AudioSessionError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("AudioSessionError", 2)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

impl From<serde_json::Error> for AudioSessionError {
    fn from(e: serde_json::Error) -> Self {
        AudioSessionError::InvalidArguments(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AudioSessionError>;
