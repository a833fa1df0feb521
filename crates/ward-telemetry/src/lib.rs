//! # Ward Telemetry
//!
//! Log initialization for Ward services and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ward_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!
//!     // Application code; tracing macros now emit formatted output.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WARD_SERVICE_NAME` | `ward` | Service name attached to log lines |
//! | `WARD_LOG_LEVEL` | `info` | Log level filter |
//! | `WARD_CONSOLE_OUTPUT` | `true` | Console output toggle |
//! | `WARD_JSON_LOGS` | `false` | JSON log formatting |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log level filter could not be parsed.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Guard returned by [`init_telemetry`].
///
/// Held for the lifetime of the process; exists so callers keep a handle to
/// the installed subscriber and so future exporters can flush on drop.
#[must_use]
pub struct TracingGuard {
    _private: (),
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level, matching the
/// conventions of `tracing_subscriber::EnvFilter`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        registry
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else if config.console_output {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else {
        registry
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    }

    Ok(TracingGuard { _private: () })
}

/// Initialize telemetry for tests, ignoring double-install errors.
pub fn init_for_tests() {
    let config = TelemetryConfig {
        log_level: "debug".to_string(),
        ..TelemetryConfig::default()
    };
    let _ = init_telemetry(&config);
}
