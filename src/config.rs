//! Server configuration
//!
//! The server deliberately takes no configuration from the environment
//! beyond the CLI flags in `main.rs`; the one tunable with behavioral
//! impact is the display timezone used when rendering time blocks.

use crate::error::{BridgeError, Result};
use chrono_tz::Tz;

/// Context object built once at startup and threaded into the tool
/// handler and protocol engine. Replaces the module-level singletons of
/// earlier iterations so tests can construct isolated instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Timezone used to render wall-clock times in time-block output.
    /// Defaults to UTC.
    pub display_timezone: Tz,

    /// Server identity reported by `initialize`.
    pub server_name: &'static str,
    pub server_version: &'static str,
}

impl ServerConfig {
    /// Build a config with an explicit display timezone name
    /// (IANA identifier, e.g. "Europe/Berlin").
    pub fn with_timezone(tz_name: &str) -> Result<Self> {
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| BridgeError::InvalidTimezone(tz_name.to_string()))?;
        Ok(Self {
            display_timezone: tz,
            ..Self::default()
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            display_timezone: Tz::UTC,
            server_name: env!("CARGO_PKG_NAME"),
            server_version: env!("CARGO_PKG_VERSION"),
        }
    }
}
