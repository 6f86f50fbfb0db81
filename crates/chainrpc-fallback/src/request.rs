//! JSON-RPC 2.0 wire types and the per-call context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request ID — string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A single JSON-RPC parameter value.
pub type RpcParam = Value;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<RpcParam>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self::with_id(RpcId::Number(id), method, params)
    }

    pub fn with_id(id: RpcId, method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response carrying `result`.
    pub fn success(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Unwrap the result value or return an error.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}

/// Method and parameters of one logical call, built fresh per `perform`.
///
/// Every attempt against every endpoint sends the same request, so retries
/// and fallbacks are indistinguishable on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct CallContext {
    pub method: String,
    pub params: Vec<RpcParam>,
    id: RpcId,
}

impl CallContext {
    pub fn new(method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self {
            method: method.into(),
            params,
            id: RpcId::Number(1),
        }
    }

    /// Keep the caller's request id when dispatching an already-built request.
    pub fn from_request(req: JsonRpcRequest) -> Self {
        Self {
            method: req.method,
            params: req.params,
            id: req.id,
        }
    }

    pub fn id(&self) -> &RpcId {
        &self.id
    }

    /// The request sent for each attempt.
    pub fn to_request(&self) -> JsonRpcRequest {
        JsonRpcRequest::with_id(self.id.clone(), self.method.clone(), self.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let req = JsonRpcRequest::new(1, "eth_blockNumber", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"eth_blockNumber\""));
    }

    #[test]
    fn response_into_result_error() {
        let resp = JsonRpcResponse {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(1),
            result: None,
            error: Some(JsonRpcError {
                code: -32000,
                message: "execution reverted".into(),
                data: None,
            }),
        };
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.code, -32000);
    }

    #[test]
    fn call_context_keeps_request_id() {
        let req = JsonRpcRequest::with_id(
            RpcId::String("abc".into()),
            "eth_getBalance",
            vec![Value::String("0x0".into()), Value::String("latest".into())],
        );
        let ctx = CallContext::from_request(req);
        let rebuilt = ctx.to_request();
        assert_eq!(rebuilt.id, RpcId::String("abc".into()));
        assert_eq!(rebuilt.method, "eth_getBalance");
        assert_eq!(rebuilt.params.len(), 2);
    }

    #[test]
    fn fresh_context_is_deterministic() {
        let a = CallContext::new("eth_chainId", vec![]);
        let b = CallContext::new("eth_chainId", vec![]);
        assert_eq!(a, b);
        assert_eq!(a.id(), &RpcId::Number(1));
    }
}
