//! The `RpcTransport` trait — the capability contract every endpoint offers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::network::Network;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Lifecycle of a socket-backed transport, mirroring the WebSocket
/// `readyState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ReadyState {
    /// `Closing` and `Closed` never recover without an external reconnect.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Pollable readiness of a stream-based transport.
pub trait StreamState: Send + Sync {
    fn ready_state(&self) -> ReadyState;
}

/// The central async trait every RPC transport must implement.
///
/// Only [`send`](RpcTransport::send) and [`url`](RpcTransport::url) are
/// required. Network detection and stream readiness are optional
/// capabilities; the defaults report "unsupported" and "always ready".
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Ask the endpoint which network it serves.
    async fn detect_network(&self) -> Result<Network, TransportError> {
        Err(TransportError::Unsupported("network detection"))
    }

    /// Readiness accessor for socket-backed transports.
    ///
    /// Queried once when the endpoint is registered; the returned handle is
    /// polled for every call afterwards.
    fn stream_state(&self) -> Option<Arc<dyn StreamState>> {
        None
    }

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Convenience: call a method and deserialize the result.
    async fn call<T: DeserializeOwned>(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError>
    where
        Self: Sized,
    {
        let req = JsonRpcRequest::new(id, method, params);
        let resp = self.send(req).await?;
        let result = resp.into_result().map_err(TransportError::Rpc)?;
        serde_json::from_value(result).map_err(TransportError::Deserialization)
    }
}
