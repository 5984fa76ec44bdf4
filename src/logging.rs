use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{dispatcher::SetGlobalDefaultError, info, warn, Dispatch};
use tracing_subscriber::{fmt, EnvFilter};

use crate::session::SESSION_HEADER;

/// Installs the compact subscriber for the transport layer and returns the
/// same capability so it can be handed to the protocol server explicitly.
pub fn init_logging() -> Result<Dispatch, SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    let dispatch = Dispatch::new(subscriber);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(dispatch)
}

/// Logs one summary line per request, tagged with the MCP session when the
/// client supplied one.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let session = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        session = %session,
        status = status.as_u16(),
        duration_ms = started_at.elapsed().as_millis(),
        "request summary"
    );

    match status {
        StatusCode::UNAUTHORIZED => {
            warn!(method = %method, path = %path, "authentication failure")
        }
        StatusCode::NOT_FOUND if path == "/mcp" => {
            warn!(session = %session, "unknown mcp session")
        }
        _ => {}
    }

    response
}
