//! Ordered multi-endpoint fallback with per-endpoint retry budgets.
//!
//! One call walks the endpoints in configuration order:
//! ```text
//! SELECT(i) → GATE-CHECK ─ not ready ─→ defer, SELECT(i+1)
//!                  └ ready → ATTEMPT(k = 1..=max_attempts) ─ ok → SUCCESS
//!                                        └ exhausted → SELECT(i+1)
//! end of pass → REVISIT-DEFERRED (once) → SUCCESS | EXHAUSTED
//! ```
//! Attempts are strictly sequential; nothing is sent to two endpoints at once.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{FallbackConfig, TimeoutPrecedence};
use crate::error::{FallbackError, TransportError};
use crate::network::Network;
use crate::observer::{DispatchObserver, TracingObserver};
use crate::readiness::{Readiness, ReadinessGate};
use crate::registry::{self, Endpoint, EndpointConfig};
use crate::request::{CallContext, JsonRpcRequest, JsonRpcResponse, RpcParam};
use crate::transport::RpcTransport;
use crate::validator::{self, ValidationResult};

/// The last failure seen while dispatching one call.
struct Failure {
    endpoint: String,
    index: usize,
    attempts: u32,
    error: TransportError,
}

impl From<Failure> for FallbackError {
    fn from(f: Failure) -> Self {
        FallbackError::Exhausted {
            endpoint: f.endpoint,
            index: f.index,
            attempts: f.attempts,
            source: f.error,
        }
    }
}

/// A single logical endpoint backed by an ordered list of real ones.
///
/// Holds no mutable state: concurrent `perform` calls share only the
/// read-only endpoint list.
pub struct FallbackDispatcher {
    endpoints: Vec<Endpoint>,
    network: Option<Network>,
    gate: ReadinessGate,
    config: FallbackConfig,
    observer: Arc<dyn DispatchObserver>,
}

impl FallbackDispatcher {
    /// Build a dispatcher with the default configuration.
    ///
    /// Items may be bare transports, `(transport, retries)` pairs or
    /// [`EndpointConfig`]s. No network I/O happens here.
    pub fn new<I, E>(endpoints: I) -> Result<Self, FallbackError>
    where
        I: IntoIterator<Item = E>,
        E: Into<EndpointConfig>,
    {
        Self::with_config(endpoints, FallbackConfig::default())
    }

    pub fn with_config<I, E>(endpoints: I, config: FallbackConfig) -> Result<Self, FallbackError>
    where
        I: IntoIterator<Item = E>,
        E: Into<EndpointConfig>,
    {
        Self::build(registry::normalize(endpoints), None, config)
    }

    /// Build from the eligible endpoints of a network validation.
    pub fn from_validated(
        validated: ValidationResult,
        config: FallbackConfig,
    ) -> Result<Self, FallbackError> {
        Self::build(validated.endpoints, Some(validated.network), config)
    }

    /// Validate the endpoints' networks, then build from the eligible ones.
    pub async fn connect<I, E>(endpoints: I, config: FallbackConfig) -> Result<Self, FallbackError>
    where
        I: IntoIterator<Item = E>,
        E: Into<EndpointConfig>,
    {
        let validated = validator::validate_and_get_network(endpoints).await?;
        Self::from_validated(validated, config)
    }

    fn build(
        endpoints: Vec<Endpoint>,
        network: Option<Network>,
        config: FallbackConfig,
    ) -> Result<Self, FallbackError> {
        if endpoints.is_empty() {
            return Err(FallbackError::NoProvider);
        }
        Ok(Self {
            endpoints,
            network,
            gate: ReadinessGate::new(&config.readiness),
            config,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the default `tracing` observer.
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always `false` for a constructed dispatcher.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Network agreed on during validation, if the dispatcher was built from one.
    pub fn network(&self) -> Option<Network> {
        self.network
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Call `method` on the first endpoint that succeeds.
    pub async fn perform(
        &self,
        method: &str,
        params: Vec<RpcParam>,
    ) -> Result<Value, FallbackError> {
        self.dispatch(&CallContext::new(method, params)).await
    }

    async fn dispatch(&self, ctx: &CallContext) -> Result<Value, FallbackError> {
        let mut last_failure: Option<Failure> = None;
        let mut deferred: Vec<(usize, &Endpoint)> = Vec::new();

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if let Readiness::NotReady(state) = self.gate.check(endpoint).await {
                self.observer.deferred(endpoint.url(), state);
                deferred.push((index, endpoint));
                continue;
            }
            match self.attempt(index, endpoint, ctx).await {
                Ok(value) => return Ok(value),
                Err(failure) => last_failure = Some(failure),
            }
        }

        // Earlier invocations may have opened sockets that were not ready
        // during the pass.
        let mut unready = deferred.len();
        if self.config.revisit_deferred && !deferred.is_empty() {
            unready = 0;
            for (index, endpoint) in deferred {
                self.observer.revisiting(endpoint.url());
                if let Readiness::NotReady(state) = self.gate.check(endpoint).await {
                    self.observer.deferred(endpoint.url(), state);
                    unready += 1;
                    continue;
                }
                match self.attempt(index, endpoint, ctx).await {
                    Ok(value) => return Ok(value),
                    Err(failure) => last_failure = Some(failure),
                }
            }
        }

        Err(self.exhausted(last_failure, unready))
    }

    /// Invoke one endpoint up to its retry budget, retrying immediately.
    async fn attempt(
        &self,
        index: usize,
        endpoint: &Endpoint,
        ctx: &CallContext,
    ) -> Result<Value, Failure> {
        let max_attempts = endpoint.max_attempts();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let error = match endpoint.transport().send(ctx.to_request()).await {
                Ok(resp) => match resp.into_result() {
                    Ok(value) => return Ok(value),
                    Err(rpc) => TransportError::Rpc(rpc),
                },
                Err(e) => e,
            };
            self.observer
                .attempt_failed(endpoint.url(), attempt, max_attempts, &error);
            if attempt >= max_attempts {
                return Err(Failure {
                    endpoint: endpoint.url().to_string(),
                    index,
                    attempts: attempt,
                    error,
                });
            }
        }
    }

    fn exhausted(&self, last_failure: Option<Failure>, unready: usize) -> FallbackError {
        let timeout = FallbackError::ReadinessTimeout {
            deferred: unready,
            waited_ms: self.config.readiness.wait_timeout_ms,
        };
        match (last_failure, self.config.timeout_precedence) {
            (Some(_), TimeoutPrecedence::ReadinessFirst) if unready > 0 => timeout,
            (Some(failure), _) => failure.into(),
            (None, _) => timeout,
        }
    }
}

impl std::fmt::Debug for FallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackDispatcher")
            .field("endpoints", &self.endpoints)
            .field("network", &self.network)
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl RpcTransport for FallbackDispatcher {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let ctx = CallContext::from_request(req);
        let value = self.dispatch(&ctx).await?;
        Ok(JsonRpcResponse::success(ctx.id().clone(), value))
    }

    async fn detect_network(&self) -> Result<Network, TransportError> {
        self.network
            .ok_or(TransportError::Unsupported("network detection"))
    }

    fn url(&self) -> &str {
        "fallback"
    }
}
