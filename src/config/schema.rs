//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for timeout protection.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Poll loop settings.
    pub polling: PollingConfig,

    /// Settings for the bundled HTTP issuer.
    pub transport: TransportConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// What to hand to the callbacks when the wait budget runs out.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetExpiry {
    /// Dispatch the initial 504 response, as if polling had never started.
    #[default]
    GatewayTimeout,
    /// Dispatch an explicit poll timeout error.
    Error,
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    /// Wait budget armed on the first 504, in milliseconds.
    pub poll_timeout_ms: u64,

    /// Pause between a 204 and the next poll. 0 polls continuously.
    pub poll_delay_ms: u64,

    /// Behaviour when the wait budget expires.
    pub on_budget_expiry: BudgetExpiry,
}

impl PollingConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 60_000,
            poll_delay_ms: 0,
            on_budget_expiry: BudgetExpiry::GatewayTimeout,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per round trip timeout in milliseconds. 0 disables it.
    pub request_timeout_ms: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 0,
            user_agent: concat!("timeout-protection/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
