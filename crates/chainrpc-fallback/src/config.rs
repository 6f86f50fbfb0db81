//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded wait applied to socket-backed endpoints still `Connecting`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Longest time to wait for a `Connecting` socket to open, per gate check.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
    /// How often the socket state is polled while waiting.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_wait_timeout_ms() -> u64 { 1_000 }
fn default_poll_interval_ms() -> u64 { 50 }

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ReadinessConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Poll interval, clamped to at least 1ms so the wait loop always yields.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Which failure wins when a call ends with some endpoints having failed
/// explicitly and others never becoming ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPrecedence {
    /// Name the last attempted endpoint; report a readiness timeout only if
    /// nothing was ever invoked.
    #[default]
    InvocationFirst,
    /// Report a readiness timeout whenever an endpoint was still not ready
    /// after the revisit.
    ReadinessFirst,
}

/// Top-level configuration for [`FallbackDispatcher`](crate::FallbackDispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub readiness: ReadinessConfig,
    /// Give deferred endpoints one more chance after the ordered pass.
    #[serde(default = "bool_true")]
    pub revisit_deferred: bool,
    #[serde(default)]
    pub timeout_precedence: TimeoutPrecedence,
}

fn bool_true() -> bool { true }

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            readiness: ReadinessConfig::default(),
            revisit_deferred: true,
            timeout_precedence: TimeoutPrecedence::default(),
        }
    }
}
