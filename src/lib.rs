use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod session;
pub mod stubs;

pub use domain::{
    registry::Registry, resources::ResourceDefinition, schema::SchemaRules,
    tools::ToolDefinition,
};
pub use errors::{AppError, LoadError};
pub use mcp::{
    handler::{
        error_result, text_result, FnResourceHandler, FnToolHandler, ResourceHandler, ToolHandler,
    },
    rpc::{ErrorKind, JsonRpcRequest, McpResponse},
    server::{Server, ServerBuilder},
};
pub use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub server: Arc<Server>,
    pub sessions: Arc<SessionStore>,
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(server: Arc<Server>, api_token: Option<String>) -> Self {
        Self {
            server,
            sessions: Arc::new(SessionStore::new()),
            api_token: api_token.map(Arc::<str>::from),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/healthz", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .merge(protected)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
