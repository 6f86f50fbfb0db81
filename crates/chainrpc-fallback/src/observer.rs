//! Dispatch events, reported through an injected observer.

use crate::error::TransportError;
use crate::network::Network;
use crate::transport::ReadyState;

/// Receives the recoverable events of a dispatch.
///
/// The dispatcher never logs directly; it reports here. The default
/// [`TracingObserver`] turns each event into a `tracing` record.
pub trait DispatchObserver: Send + Sync {
    /// One attempt against `url` failed. `attempt` is 1-based.
    fn attempt_failed(&self, url: &str, attempt: u32, max_attempts: u32, error: &TransportError);

    /// `url` was skipped because its socket was not ready.
    fn deferred(&self, url: &str, state: ReadyState);

    /// A deferred endpoint is being checked again after the ordered pass.
    fn revisiting(&self, url: &str) {
        let _ = url;
    }

    /// `url` was dropped during validation because its network is unknown.
    fn network_undetected(&self, url: &str, error: Option<&TransportError>) {
        let _ = (url, error);
    }

    /// Validation settled on `network` with `eligible` endpoints.
    fn network_validated(&self, network: Network, eligible: usize) {
        let _ = (network, eligible);
    }
}

/// Emits dispatch events as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn attempt_failed(&self, url: &str, attempt: u32, max_attempts: u32, error: &TransportError) {
        tracing::warn!(
            url = %url,
            attempt,
            max_attempts,
            error = %error,
            "provider attempt failed"
        );
    }

    fn deferred(&self, url: &str, state: ReadyState) {
        tracing::debug!(url = %url, state = %state, "provider not ready, deferring");
    }

    fn revisiting(&self, url: &str) {
        tracing::debug!(url = %url, "revisiting deferred provider");
    }

    fn network_undetected(&self, url: &str, error: Option<&TransportError>) {
        match error {
            Some(e) => tracing::warn!(url = %url, error = %e, "network detection failed"),
            None => tracing::warn!(url = %url, "provider reported no network"),
        }
    }

    fn network_validated(&self, network: Network, eligible: usize) {
        tracing::info!(chain_id = network.chain_id, eligible, "network validated");
    }
}
