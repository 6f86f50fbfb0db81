//! Readiness gate for socket-backed endpoints.
//!
//! ```text
//! Open        → ready
//! Connecting  → poll every `poll_interval` until Open, up to `wait_timeout`
//! Closing     → not ready (no wait)
//! Closed      → not ready (no wait)
//! no socket   → ready
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::config::ReadinessConfig;
use crate::registry::Endpoint;
use crate::transport::{ReadyState, StreamState};

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Not callable in this pass; carries the state last observed.
    NotReady(ReadyState),
}

/// Decides whether an endpoint may be invoked now.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl ReadinessGate {
    pub fn new(config: &ReadinessConfig) -> Self {
        Self {
            wait_timeout: config.wait_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Check `endpoint`, waiting (cooperatively) if its socket is connecting.
    pub async fn check(&self, endpoint: &Endpoint) -> Readiness {
        let Some(stream) = endpoint.stream() else {
            return Readiness::Ready;
        };
        let state = stream.ready_state();
        if state.is_terminal() {
            return Readiness::NotReady(state);
        }
        if state == ReadyState::Open {
            return Readiness::Ready;
        }
        self.wait_for_open(stream.as_ref()).await
    }

    async fn wait_for_open(&self, stream: &dyn StreamState) -> Readiness {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Readiness::NotReady(ReadyState::Connecting);
            }
            time::sleep(self.poll_interval.min(deadline - now)).await;
            let state = stream.ready_state();
            if state == ReadyState::Open {
                return Readiness::Ready;
            }
            if state.is_terminal() {
                return Readiness::NotReady(state);
            }
        }
    }
}
