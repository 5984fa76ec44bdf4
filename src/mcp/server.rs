//! The central Model Context Protocol engine
//!
//! Routes one inbound envelope plus a request-scoped context value to the
//! matching behavior: cached handshake and listings, keepalive, notification
//! acknowledgment, validated tool calls and resource reads. Callbacks are
//! registered by name and may be added at any time, before or after serving
//! begins.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use rust_mcp_sdk::schema::{ReadResourceContent, ReadResourceResult, TextResourceContents};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use tracing::{info, Dispatch, Level};

use crate::domain::{
    loader,
    registry::Registry,
    resources::ResourceDefinition,
    tools::ToolDefinition,
};
use crate::errors::LoadError;
use crate::mcp::{
    cache::{ResponseCache, ServerInfo},
    handler::{error_result, ResourceHandler, ToolHandler},
    rpc::{ErrorKind, JsonRpcRequest, McpResponse, JSONRPC_VERSION},
};

pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";

/// Closed set of methods the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    Initialize,
    Ping,
    Notification,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    Unknown(&'a str),
}

impl<'a> Method<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            NOTIFICATION_INITIALIZED | NOTIFICATION_CANCELLED => Self::Notification,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            "resources/list" => Self::ResourcesList,
            "resources/read" => Self::ResourcesRead,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
    #[serde(default)]
    client_info: Option<ClientInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ClientInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Default, Deserialize)]
struct ToolCallParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceReadParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    uri: String,
}

type ToolHandlers<C> = RwLock<HashMap<String, Arc<dyn ToolHandler<C>>>>;
type ResourceHandlers<C> = RwLock<HashMap<String, Arc<dyn ResourceHandler<C>>>>;

/// Collects definitions and settings, then freezes them into a [`Server`].
/// Definitions from repeated calls accumulate; duplicates fail at `build`.
pub struct ServerBuilder {
    tools: Vec<ToolDefinition>,
    resources: Vec<ResourceDefinition>,
    info: ServerInfo,
    logger: Dispatch,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            resources: Vec::new(),
            info: ServerInfo::default(),
            logger: Dispatch::none(),
        }
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn tools_json(self, data: &[u8]) -> Result<Self, LoadError> {
        Ok(self.tools(loader::parse_tools(data)?))
    }

    pub fn tools_file(self, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(self.tools(loader::load_tools(path)?))
    }

    pub fn resources(mut self, resources: Vec<ResourceDefinition>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn resources_json(self, data: &[u8]) -> Result<Self, LoadError> {
        Ok(self.resources(loader::parse_resources(data)?))
    }

    pub fn resources_file(self, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(self.resources(loader::load_resources(path)?))
    }

    pub fn server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.info = ServerInfo {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    /// Logging capability used by the dispatcher. Without one, the server
    /// emits nothing.
    pub fn logger(mut self, logger: Dispatch) -> Self {
        self.logger = logger;
        self
    }

    pub fn build<C: Send + 'static>(self) -> Result<Server<C>, LoadError> {
        for resource in &self.resources {
            resource.check()?;
        }
        let registry = Registry::new(self.tools, self.resources)?;
        let cache = ResponseCache::build(&registry, &self.info)?;

        Ok(Server {
            registry,
            cache,
            info: self.info,
            tool_handlers: RwLock::new(HashMap::new()),
            resource_handlers: RwLock::new(HashMap::new()),
            logger: self.logger,
        })
    }
}

pub struct Server<C = Value> {
    registry: Registry,
    cache: ResponseCache,
    info: ServerInfo,
    tool_handlers: ToolHandlers<C>,
    resource_handlers: ResourceHandlers<C>,
    logger: Dispatch,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }
}

impl<C: Send + 'static> Server<C> {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Binds a callback to a tool name. The last registration wins.
    pub fn handle_tool(&self, name: impl Into<String>, handler: Arc<dyn ToolHandler<C>>) {
        self.tool_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), handler);
    }

    /// Binds a callback to a resource name. The last registration wins.
    pub fn handle_resource(&self, name: impl Into<String>, handler: Arc<dyn ResourceHandler<C>>) {
        self.resource_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), handler);
    }

    /// Handles one envelope. The returned response is the notification
    /// sentinel when the transport must not send a body.
    pub async fn handle(&self, request: JsonRpcRequest, context: C) -> McpResponse {
        let JsonRpcRequest {
            jsonrpc,
            id,
            method,
            params,
        } = request;
        let audit_params = self.audit_params(params.as_ref());

        let response = if jsonrpc != JSONRPC_VERSION {
            McpResponse::error(id, ErrorKind::InvalidRequest, "jsonrpc must be '2.0'")
        } else {
            match Method::parse(&method) {
                Method::Initialize => self.initialize(id, params),
                Method::Ping => McpResponse::ok(id, json!({})),
                Method::Notification => McpResponse::notification(),
                Method::ToolsList => McpResponse::cached(id, self.cache.tools_list()),
                Method::ToolsCall => self.call_tool(id, params, context).await,
                Method::ResourcesList => McpResponse::cached(id, self.cache.resources_list()),
                Method::ResourcesRead => self.read_resource(id, params, context).await,
                Method::Unknown(name) => McpResponse::error(
                    id,
                    ErrorKind::MethodNotFound,
                    format!("Method not found: {name}"),
                ),
            }
        };

        if let Some(params) = audit_params {
            self.log(|| {
                info!(
                    method = %method,
                    params = %params,
                    outcome = if response.is_error() { "failure" } else { "success" },
                    "mcp action audited"
                )
            });
        }

        response
    }

    fn initialize(&self, id: Option<Value>, params: Option<Value>) -> McpResponse {
        let params: InitializeParams = match decode_params(params) {
            Ok(params) => params,
            Err(message) => return McpResponse::error(id, ErrorKind::InvalidParams, message),
        };

        let client = params.client_info.unwrap_or_default();
        self.log(|| {
            info!(
                client_name = %client.name,
                client_version = %client.version,
                protocol_version = %params.protocol_version.as_deref().unwrap_or_default(),
                "initialize"
            )
        });

        McpResponse::cached(id, self.cache.initialize())
    }

    async fn call_tool(&self, id: Option<Value>, params: Option<Value>, context: C) -> McpResponse {
        let params: ToolCallParams = match decode_params(params) {
            Ok(params) => params,
            Err(message) => return McpResponse::error(id, ErrorKind::InvalidParams, message),
        };
        if params.name.is_empty() {
            return McpResponse::error(id, ErrorKind::InvalidParams, "tool name must be provided");
        }

        let Some(tool) = self.registry.tool(&params.name) else {
            return McpResponse::error(
                id,
                ErrorKind::MethodNotFound,
                format!("Unknown tool: {}", params.name),
            );
        };

        let arguments = params.arguments.unwrap_or_default();
        if let Err(err) = tool.rules().validate(&arguments) {
            return McpResponse::error(id, ErrorKind::InvalidParams, err.to_string());
        }

        let Some(handler) = self.tool_handler(tool.name()) else {
            return McpResponse::error(
                id,
                ErrorKind::InternalError,
                format!("no handler for tool: {}", tool.name()),
            );
        };

        let result = handler
            .call(context, arguments)
            .await
            .unwrap_or_else(|err| error_result(err.to_string()));

        match serde_json::to_value(result) {
            Ok(result) => McpResponse::ok(id, result),
            Err(err) => McpResponse::error(
                id,
                ErrorKind::InternalError,
                format!("encode tool result: {err}"),
            ),
        }
    }

    async fn read_resource(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        context: C,
    ) -> McpResponse {
        let params: ResourceReadParams = match decode_params(params) {
            Ok(params) => params,
            Err(message) => return McpResponse::error(id, ErrorKind::InvalidParams, message),
        };
        if params.name.is_empty() && params.uri.is_empty() {
            return McpResponse::error(
                id,
                ErrorKind::InvalidParams,
                "either name or uri must be provided",
            );
        }

        // A supplied name is authoritative; the URI is only consulted without one.
        let target = if params.name.is_empty() {
            self.registry.resource_by_uri(&params.uri)
        } else {
            self.registry.resource(&params.name)
        };
        let Some(target) = target else {
            return McpResponse::error(id, ErrorKind::InvalidParams, "resource not found");
        };

        let content = match self.resource_handler(&target.name) {
            Some(handler) => match handler.read(context, &target.uri).await {
                Ok(content) => content,
                Err(err) => {
                    return McpResponse::error(
                        id,
                        ErrorKind::InternalError,
                        format!("read resource: {err}"),
                    )
                }
            },
            None => ReadResourceContent::from(TextResourceContents {
                meta: None,
                mime_type: Some(target.mime_type.clone()),
                text: String::new(),
                uri: target.uri.clone(),
            }),
        };

        let result = ReadResourceResult {
            contents: vec![content],
            meta: None,
        };
        match serde_json::to_value(result) {
            Ok(result) => McpResponse::ok(id, result),
            Err(err) => McpResponse::error(
                id,
                ErrorKind::InternalError,
                format!("encode resource contents: {err}"),
            ),
        }
    }

    // The lock is released before the handler is awaited.
    fn tool_handler(&self, name: &str) -> Option<Arc<dyn ToolHandler<C>>> {
        self.tool_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn resource_handler(&self, name: &str) -> Option<Arc<dyn ResourceHandler<C>>> {
        self.resource_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn audit_params(&self, params: Option<&Value>) -> Option<Value> {
        let enabled = tracing::dispatcher::with_default(&self.logger, || {
            tracing::enabled!(Level::INFO)
        });
        enabled.then(|| redact_audit_params(params))
    }

    fn log(&self, event: impl FnOnce()) {
        tracing::dispatcher::with_default(&self.logger, event);
    }
}

fn decode_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T, String> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(params) => {
            serde_json::from_value(params).map_err(|err| format!("invalid params: {err}"))
        }
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}
