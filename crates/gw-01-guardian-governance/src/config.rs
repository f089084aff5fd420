//! Governance timing configuration.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Time periods (seconds) that govern maturation and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Delay between proposing a guardian and being able to confirm it
    pub guardian_security_period: u64,

    /// Window after maturity during which confirmation is accepted
    pub guardian_security_window: u64,

    /// How long a recorded approval keeps counting toward quorum
    pub approval_validity_period: u64,

    /// Delay between recovery execution and finalization
    pub recovery_period: u64,

    /// Lifetime of an explicit lock before it releases on its own
    pub lock_period: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            guardian_security_period: 86_400,
            guardian_security_window: 86_400,
            approval_validity_period: 86_400,
            recovery_period: 172_800,
            lock_period: 259_200,
        }
    }
}

impl GovernanceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GW_GUARDIAN_SECURITY_PERIOD` (default: 86400)
    /// - `GW_GUARDIAN_SECURITY_WINDOW` (default: 86400)
    /// - `GW_APPROVAL_VALIDITY_PERIOD` (default: 86400)
    /// - `GW_RECOVERY_PERIOD` (default: 172800)
    /// - `GW_LOCK_PERIOD` (default: 259200)
    ///
    /// Unset variables fall back to the defaults; set but unparsable values
    /// are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            guardian_security_period: read_period(
                "GW_GUARDIAN_SECURITY_PERIOD",
                defaults.guardian_security_period,
            )?,
            guardian_security_window: read_period(
                "GW_GUARDIAN_SECURITY_WINDOW",
                defaults.guardian_security_window,
            )?,
            approval_validity_period: read_period(
                "GW_APPROVAL_VALIDITY_PERIOD",
                defaults.approval_validity_period,
            )?,
            recovery_period: read_period("GW_RECOVERY_PERIOD", defaults.recovery_period)?,
            lock_period: read_period("GW_LOCK_PERIOD", defaults.lock_period)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero-length periods.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("guardian_security_period", self.guardian_security_period),
            ("guardian_security_window", self.guardian_security_window),
            ("approval_validity_period", self.approval_validity_period),
            ("recovery_period", self.recovery_period),
            ("lock_period", self.lock_period),
        ];
        match periods.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::ZeroPeriod(name)),
            None => Ok(()),
        }
    }
}

fn read_period(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
