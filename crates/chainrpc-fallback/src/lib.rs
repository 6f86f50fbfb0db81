//! chainrpc-fallback — ordered multi-endpoint RPC fallback.
//!
//! # Overview
//!
//! A [`FallbackDispatcher`] turns a prioritized list of RPC endpoints into a
//! single logical endpoint. Each call walks the list in order, retries an
//! endpoint up to its own budget, skips sockets that are not open yet and
//! returns the first success. The crate defines:
//!
//! - [`RpcTransport`] — the capability contract every endpoint implements
//! - [`registry`] — endpoint descriptors and their retry budgets
//! - [`validator`] — network-consistency check across endpoints
//! - [`readiness`] — bounded readiness wait for socket-backed endpoints
//! - [`dispatcher`] — the fallback engine
//! - [`FallbackError`] / [`TransportError`] — structured error types
//!
//! # Quick start
//! ```rust,no_run
//! # async fn run(
//! #     primary: std::sync::Arc<dyn chainrpc_fallback::RpcTransport>,
//! #     backup: std::sync::Arc<dyn chainrpc_fallback::RpcTransport>,
//! # ) -> Result<(), chainrpc_fallback::FallbackError> {
//! use chainrpc_fallback::{EndpointConfig, FallbackConfig, FallbackDispatcher};
//!
//! let dispatcher = FallbackDispatcher::connect(
//!     vec![EndpointConfig::new(primary).with_retries(2), EndpointConfig::new(backup)],
//!     FallbackConfig::default(),
//! )
//! .await?;
//! let block = dispatcher.perform("eth_blockNumber", vec![]).await?;
//! # let _ = block;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod network;
pub mod observer;
pub mod readiness;
pub mod registry;
pub mod request;
pub mod transport;
pub mod validator;

pub use config::{FallbackConfig, ReadinessConfig, TimeoutPrecedence};
pub use dispatcher::FallbackDispatcher;
pub use error::{FallbackError, TransportError};
pub use network::Network;
pub use observer::{DispatchObserver, TracingObserver};
pub use readiness::{Readiness, ReadinessGate};
pub use registry::{Endpoint, EndpointConfig};
pub use request::{CallContext, JsonRpcRequest, JsonRpcResponse, RpcId, RpcParam};
pub use transport::{ReadyState, RpcTransport, StreamState};
pub use validator::{validate_and_get_network, validate_with_observer, ValidationResult};
