//! Scripted transports shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use chainrpc_fallback::{
    DispatchObserver, JsonRpcRequest, JsonRpcResponse, Network, ReadyState, RpcTransport,
    StreamState, TransportError,
};
use chainrpc_fallback::request::JsonRpcError;

// ─── Socket state ─────────────────────────────────────────────────────────────

/// Settable socket state. Optionally flips to `Open` after a number of reads.
pub struct SocketState {
    state: Mutex<ReadyState>,
    open_after_reads: Option<usize>,
    reads: AtomicUsize,
}

impl SocketState {
    pub fn new(state: ReadyState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            open_after_reads: None,
            reads: AtomicUsize::new(0),
        })
    }

    /// `Connecting` for the first `reads` reads, `Open` afterwards.
    pub fn opening_after(reads: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ReadyState::Connecting),
            open_after_reads: Some(reads),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, state: ReadyState) {
        *self.state.lock().unwrap() = state;
    }
}

impl StreamState for SocketState {
    fn ready_state(&self) -> ReadyState {
        let reads = self.reads.fetch_add(1, Ordering::SeqCst);
        match self.open_after_reads {
            Some(n) if reads >= n => ReadyState::Open,
            _ => *self.state.lock().unwrap(),
        }
    }
}

// ─── Mock transport ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum Outcome {
    Ok(Value),
    Fail,
    RpcError,
}

type Hook = Box<dyn Fn() + Send + Sync>;

pub struct MockTransport {
    url: String,
    script: Mutex<VecDeque<Outcome>>,
    otherwise: Outcome,
    calls: AtomicUsize,
    network: Option<u64>,
    detect_delay: Duration,
    socket: Option<Arc<SocketState>>,
    on_send: Option<Hook>,
}

impl MockTransport {
    fn with_outcome(url: &str, otherwise: Outcome) -> Self {
        Self {
            url: url.to_string(),
            script: Mutex::new(VecDeque::new()),
            otherwise,
            calls: AtomicUsize::new(0),
            network: None,
            detect_delay: Duration::ZERO,
            socket: None,
            on_send: None,
        }
    }

    /// Always answers `result`.
    pub fn ok(url: &str, result: &str) -> Self {
        Self::with_outcome(url, Outcome::Ok(Value::String(result.to_string())))
    }

    /// Always fails at the transport level.
    pub fn failing(url: &str) -> Self {
        Self::with_outcome(url, Outcome::Fail)
    }

    /// Always answers with a JSON-RPC error object.
    pub fn rpc_error(url: &str) -> Self {
        Self::with_outcome(url, Outcome::RpcError)
    }

    /// Play `outcomes` first, then fall back to the default outcome.
    pub fn scripted(mut self, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.script = Mutex::new(outcomes.into_iter().collect());
        self
    }

    pub fn on_network(mut self, chain_id: u64) -> Self {
        self.network = Some(chain_id);
        self
    }

    pub fn detect_delay(mut self, delay: Duration) -> Self {
        self.detect_delay = delay;
        self
    }

    pub fn with_socket(mut self, socket: Arc<SocketState>) -> Self {
        self.socket = Some(socket);
        self
    }

    /// Run `hook` on every send, before answering.
    pub fn on_send(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_send = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = &self.on_send {
            hook();
        }
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.otherwise.clone());
        match outcome {
            Outcome::Ok(value) => Ok(JsonRpcResponse::success(req.id, value)),
            Outcome::Fail => Err(TransportError::Http(format!("{} unreachable", self.url))),
            Outcome::RpcError => Ok(JsonRpcResponse {
                jsonrpc: "2.0".into(),
                id: req.id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32000,
                    message: "header not found".into(),
                    data: None,
                }),
            }),
        }
    }

    async fn detect_network(&self) -> Result<Network, TransportError> {
        if !self.detect_delay.is_zero() {
            tokio::time::sleep(self.detect_delay).await;
        }
        self.network
            .map(Network::new)
            .ok_or_else(|| TransportError::Other("eth_chainId failed".into()))
    }

    fn stream_state(&self) -> Option<Arc<dyn StreamState>> {
        self.socket
            .clone()
            .map(|s| s as Arc<dyn StreamState>)
    }

    fn url(&self) -> &str {
        &self.url
    }
}

pub fn dyn_transport(mock: &Arc<MockTransport>) -> Arc<dyn RpcTransport> {
    mock.clone()
}

// ─── Recording observer ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl DispatchObserver for RecordingObserver {
    fn attempt_failed(&self, url: &str, attempt: u32, max_attempts: u32, _error: &TransportError) {
        self.push(format!("failed {url} {attempt}/{max_attempts}"));
    }

    fn deferred(&self, url: &str, state: ReadyState) {
        self.push(format!("deferred {url} {state}"));
    }

    fn revisiting(&self, url: &str) {
        self.push(format!("revisit {url}"));
    }

    fn network_undetected(&self, url: &str, error: Option<&TransportError>) {
        let why = if error.is_some() { "error" } else { "sentinel" };
        self.push(format!("undetected {url} {why}"));
    }

    fn network_validated(&self, network: Network, eligible: usize) {
        self.push(format!("validated {} {eligible}", network.chain_id));
    }
}
