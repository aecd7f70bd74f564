//! Tunable timing settings for the session core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Duplicate suppression window per event category.
    pub dedup_window_ms: u64,
    /// Delay before reactivating after a resumable interruption ends.
    pub interruption_resume_delay_ms: u64,
    /// Delay before reactivating after the app returns to the foreground.
    pub foreground_resume_delay_ms: u64,
    /// Keep the session alive when the app is backgrounded.
    pub reactivate_on_background: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dedup_window_ms: policy::DEFAULT_DEDUP_WINDOW.as_millis() as u64,
            interruption_resume_delay_ms: policy::INTERRUPTION_RESUME_DELAY.as_millis() as u64,
            foreground_resume_delay_ms: policy::FOREGROUND_RESUME_DELAY.as_millis() as u64,
            reactivate_on_background: true,
        }
    }
}

impl SessionSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.dedup_window_ms == 0 {
            return Err(SettingsError::Invalid(
                "dedup_window_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }

    pub fn interruption_resume_delay(&self) -> Duration {
        Duration::from_millis(self.interruption_resume_delay_ms)
    }

    pub fn foreground_resume_delay(&self) -> Duration {
        Duration::from_millis(self.foreground_resume_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let settings = SessionSettings::default();
        assert_eq!(settings.dedup_window(), policy::DEFAULT_DEDUP_WINDOW);
        assert_eq!(
            settings.interruption_resume_delay(),
            policy::INTERRUPTION_RESUME_DELAY
        );
        assert_eq!(
            settings.foreground_resume_delay(),
            policy::FOREGROUND_RESUME_DELAY
        );
        assert!(settings.reactivate_on_background);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = SessionSettings::from_json(r#"{"dedup_window_ms": 250}"#).unwrap();
        assert_eq!(settings.dedup_window(), Duration::from_millis(250));
        assert_eq!(
            settings.foreground_resume_delay(),
            policy::FOREGROUND_RESUME_DELAY
        );
    }

    #[test]
    fn test_from_json_rejects_zero_window() {
        let err = SessionSettings::from_json(r#"{"dedup_window_ms": 0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = SessionSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
