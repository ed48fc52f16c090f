//! Driver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};

/// Default USB control set timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Send the mode-enter/exit pair on every active open/close. When off,
    /// the enter pair is sent once at the end of init instead.
    pub open_mode: bool,
    /// Timeout for interrupt OUT transfers; 0 waits forever.
    pub transfer_timeout_ms: u64,
    /// Timeout for control transfers; 0 waits forever.
    pub control_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            open_mode: true,
            transfer_timeout_ms: DEFAULT_TIMEOUT_MS,
            control_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl DriverConfig {
    /// Parse a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`DriverError::Config`] on malformed JSON or wrong value types.
    pub fn from_json_str(json: &str) -> DriverResult<Self> {
        serde_json::from_str(json).map_err(|e| DriverError::Config(e.to_string()))
    }

    pub fn transfer_timeout(&self) -> Option<Duration> {
        timeout(self.transfer_timeout_ms)
    }

    pub fn control_timeout(&self) -> Option<Duration> {
        timeout(self.control_timeout_ms)
    }
}

fn timeout(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert!(config.open_mode);
        assert_eq!(config.transfer_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.control_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() -> DriverResult<()> {
        let json = r#"{ "open_mode": false, "transfer_timeout_ms": 0 }"#;
        let config = DriverConfig::from_json_str(json)?;
        assert!(!config.open_mode);
        assert_eq!(config.transfer_timeout(), None);
        assert_eq!(config.control_timeout_ms, DEFAULT_TIMEOUT_MS);
        Ok(())
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = DriverConfig::from_json_str(r#"{ "open_mode": "yes" }"#);
        assert!(matches!(err, Err(DriverError::Config(_))));
    }
}
