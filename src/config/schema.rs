//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, with
//! per-section defaults so a minimal config is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where route records come from.
    pub routes: RouteSourceConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Function invoker endpoint.
    pub invoker: InvokerConfig,

    /// Runtime sizing and diagnostics.
    pub runtime: RuntimeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Route source: either a backing store or a static single target.
///
/// Exactly one of `routes_file` and `static_target` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteSourceConfig {
    /// Path of the JSON route table (backing-store identifier).
    pub routes_file: Option<PathBuf>,

    /// Static single-target override: every request invokes this function
    /// synchronously and the store is never consulted.
    pub static_target: Option<String>,

    /// Seconds between snapshot refreshes.
    pub refresh_interval_secs: u64,
}

impl Default for RouteSourceConfig {
    fn default() -> Self {
        Self {
            routes_file: None,
            static_target: None,
            refresh_interval_secs: 30,
        }
    }
}

impl RouteSourceConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Function invoker endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Base URL of the function-execution service.
    pub base_url: String,

    /// Optional invocation timeout in seconds. Unset means an unbounded
    /// wait, matching the historical behavior.
    pub timeout_secs: Option<u64>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9001".to_string(),
            timeout_secs: None,
        }
    }
}

impl InvokerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Runtime sizing and diagnostics.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads for the runtime; 0 means one per CPU core.
    pub workers: usize,

    /// Verbose logging.
    pub debug: bool,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
