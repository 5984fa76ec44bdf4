//! Axum HTTP handlers for the web server
//!
//! Provides the Streamable-HTTP `/mcp` endpoint plus health and discovery
//! metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;
use crate::mcp::{
    rpc::{ErrorKind, JsonRpcRequest, McpResponse},
    server::Method,
};
use crate::session::SESSION_HEADER;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: String,
    pub version: String,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryResponse> {
    let info = state.server.info();
    Json(DiscoveryResponse {
        name: info.name.clone(),
        version: info.version.clone(),
        mcp_endpoint: "/mcp",
    })
}

pub async fn mcp_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let response =
                McpResponse::error(None, ErrorKind::ParseError, format!("Parse error: {err}"));
            return json_response(StatusCode::BAD_REQUEST, &response, None);
        }
    };

    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let is_initialize = Method::parse(&request.method) == Method::Initialize;

    if !is_initialize {
        if let Some(session_id) = session_id.as_deref() {
            if !state.sessions.contains(session_id).await {
                return AppError::SessionNotFound.into_response();
            }
        }
    }

    let context = json!({ "sessionId": session_id });
    let response = state.server.handle(request, context).await;

    if response.is_notification() {
        return StatusCode::ACCEPTED.into_response();
    }

    let session_id = if is_initialize && !response.is_error() {
        Some(state.sessions.create().await)
    } else {
        session_id
    };

    json_response(StatusCode::OK, &response, session_id.as_deref())
}

fn json_response(status: StatusCode, response: &McpResponse, session_id: Option<&str>) -> Response {
    let mut http_response = (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.to_json_bytes(),
    )
        .into_response();

    if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        http_response.headers_mut().insert(SESSION_HEADER, value);
    }

    http_response
}
