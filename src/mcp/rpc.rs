//! JSON-RPC envelope model and wire encoding
//!
//! Outbound envelopes either own their result document or hold a shared,
//! pre-serialized fragment that is written verbatim into the final payload.

use std::sync::Arc;

use rust_mcp_sdk::schema::RpcError;
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use serde_json::{value::RawValue, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Written when an outbound envelope cannot be encoded.
pub const ENCODE_FAILURE_BODY: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Fixed JSON-RPC error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorKind {
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        [
            Self::ParseError,
            Self::InvalidRequest,
            Self::MethodNotFound,
            Self::InvalidParams,
            Self::InternalError,
        ]
        .into_iter()
        .find(|kind| kind.code() == code)
    }
}

/// Inbound envelope. A missing `id` marks a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResultPayload {
    Owned(Value),
    Cached(Arc<RawValue>),
}

impl Serialize for ResultPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Owned(value) => value.serialize(serializer),
            Self::Cached(raw) => RawValue::serialize(raw, serializer),
        }
    }
}

/// Outbound envelope: a result, an error, or the notification sentinel
/// (no id, no result, no error).
#[derive(Debug, Clone)]
pub struct McpResponse {
    id: Option<Value>,
    result: Option<ResultPayload>,
    error: Option<RpcError>,
}

impl McpResponse {
    pub fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            result: Some(ResultPayload::Owned(result)),
            error: None,
        }
    }

    pub fn cached(id: Option<Value>, payload: &Arc<RawValue>) -> Self {
        Self {
            id,
            result: Some(ResultPayload::Cached(Arc::clone(payload))),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::error_with_data(id, kind, message, None)
    }

    pub fn error_with_data(
        id: Option<Value>,
        kind: ErrorKind,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code: kind.code(),
                data,
                message: message.into(),
            }),
        }
    }

    pub fn notification() -> Self {
        Self {
            id: None,
            result: None,
            error: None,
        }
    }

    /// True for the sentinel that tells the transport to send no body.
    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.result.is_none() && self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn result(&self) -> Option<&ResultPayload> {
        self.result.as_ref()
    }

    pub fn error_record(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
            .as_ref()
            .and_then(|error| ErrorKind::from_code(error.code))
    }

    /// The shared buffer behind a cached result, if this response carries one.
    pub fn cached_result(&self) -> Option<&Arc<RawValue>> {
        match &self.result {
            Some(ResultPayload::Cached(raw)) => Some(raw),
            _ => None,
        }
    }

    /// Encodes the envelope, splicing cached fragments in without re-parsing.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode json-rpc response");
                ENCODE_FAILURE_BODY.as_bytes().to_vec()
            }
        }
    }

    /// Decodes the envelope into a plain JSON tree. Intended for tests and
    /// for transports that need to inspect the body.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::from_str(ENCODE_FAILURE_BODY).unwrap_or(Value::Null)
        })
    }
}

impl Serialize for McpResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count =
            2 + usize::from(self.result.is_some()) + usize::from(self.error.is_some());
        let mut envelope = serializer.serialize_struct("McpResponse", field_count)?;
        envelope.serialize_field("jsonrpc", JSONRPC_VERSION)?;
        envelope.serialize_field("id", &self.id)?;
        if let Some(result) = &self.result {
            envelope.serialize_field("result", result)?;
        }
        if let Some(error) = &self.error {
            envelope.serialize_field("error", error)?;
        }
        envelope.end()
    }
}
