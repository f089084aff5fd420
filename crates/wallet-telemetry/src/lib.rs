//! # Wallet Telemetry
//!
//! Structured logging for Guardian-Wallet components.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wallet_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Governance events are now logged with structured fields
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GW_SERVICE_NAME` | `guardian-wallet` | Service name attached to logs |
//! | `GW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `GW_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `GW_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_for_tests, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
