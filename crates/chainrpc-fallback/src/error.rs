//! Transport-level and dispatch-level error types.

use thiserror::Error;

use crate::network::Network;
use crate::request::JsonRpcError;

/// Errors a single endpoint can return for one attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// WebSocket connection/send/receive error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The transport does not implement an optional capability.
    #[error("{0} is not supported by this transport")]
    Unsupported(&'static str),

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A nested fallback dispatcher ran out of endpoints.
    #[error(transparent)]
    Fallback(Box<FallbackError>),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl From<FallbackError> for TransportError {
    fn from(e: FallbackError) -> Self {
        Self::Fallback(Box::new(e))
    }
}

/// Errors surfaced by network validation and by [`FallbackDispatcher`].
///
/// Per-attempt [`TransportError`]s never reach the caller on their own; only
/// the last one survives, wrapped in [`FallbackError::Exhausted`].
///
/// [`FallbackDispatcher`]: crate::dispatcher::FallbackDispatcher
#[derive(Debug, Error)]
pub enum FallbackError {
    /// No endpoints were configured.
    #[error("no provider configured")]
    NoProvider,

    /// None of the endpoints could report which network it serves.
    #[error("could not detect network on any provider")]
    CannotDetectNetworks,

    /// Endpoints reported different networks.
    #[error("providers disagree on network: {}", join_networks(.networks))]
    InconsistentNetworks { networks: Vec<Network> },

    /// Every endpoint was tried and failed; names the last one attempted.
    #[error("all providers failed, last attempted {endpoint} (#{index}, {attempts} attempts): {source}")]
    Exhausted {
        endpoint: String,
        index: usize,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// No endpoint became ready before the readiness budget ran out.
    #[error("timeout exceeded waiting for {deferred} provider(s) to become ready ({waited_ms}ms budget)")]
    ReadinessTimeout { deferred: usize, waited_ms: u64 },
}

impl FallbackError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoProvider => "NO_PROVIDER",
            Self::CannotDetectNetworks => "CANNOT_DETECT_NETWORKS",
            Self::InconsistentNetworks { .. } => "INCONSISTENT_NETWORKS",
            Self::Exhausted { .. } => "ENDPOINT_FAILURE",
            Self::ReadinessTimeout { .. } => "TIMEOUT",
        }
    }

    /// Returns `true` for errors raised during setup, before any call is made.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::NoProvider | Self::CannotDetectNetworks | Self::InconsistentNetworks { .. }
        )
    }
}

fn join_networks(networks: &[Network]) -> String {
    networks
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
