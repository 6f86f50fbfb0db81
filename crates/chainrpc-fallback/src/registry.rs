//! Endpoint registry: turns raw endpoint configuration into ordered
//! [`Endpoint`] descriptors with fixed retry budgets.

use std::sync::Arc;

use crate::transport::{RpcTransport, StreamState};

/// Raw configuration for one endpoint: a transport plus how many extra
/// attempts it gets after the first failure.
#[derive(Clone)]
pub struct EndpointConfig {
    pub transport: Arc<dyn RpcTransport>,
    pub retries: u32,
}

impl EndpointConfig {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            retries: 0,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

impl From<Arc<dyn RpcTransport>> for EndpointConfig {
    fn from(transport: Arc<dyn RpcTransport>) -> Self {
        Self::new(transport)
    }
}

impl From<(Arc<dyn RpcTransport>, u32)> for EndpointConfig {
    fn from((transport, retries): (Arc<dyn RpcTransport>, u32)) -> Self {
        Self::new(transport).with_retries(retries)
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.transport.url())
            .field("retries", &self.retries)
            .finish()
    }
}

/// A registered endpoint. Immutable once built.
#[derive(Clone)]
pub struct Endpoint {
    transport: Arc<dyn RpcTransport>,
    max_attempts: u32,
    stream: Option<Arc<dyn StreamState>>,
}

impl Endpoint {
    pub fn new(config: EndpointConfig) -> Self {
        let stream = config.transport.stream_state();
        Self {
            max_attempts: config.retries.saturating_add(1),
            transport: config.transport,
            stream,
        }
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Total attempts allowed per pass (`retries + 1`, never zero).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Readiness handle, present only for socket-backed transports.
    pub fn stream(&self) -> Option<&Arc<dyn StreamState>> {
        self.stream.as_ref()
    }

    pub fn url(&self) -> &str {
        self.transport.url()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url())
            .field("max_attempts", &self.max_attempts)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}

/// Normalize configuration items into endpoints, preserving input order.
pub fn normalize<I, E>(items: I) -> Vec<Endpoint>
where
    I: IntoIterator<Item = E>,
    E: Into<EndpointConfig>,
{
    items
        .into_iter()
        .map(|item| Endpoint::new(item.into()))
        .collect()
}
