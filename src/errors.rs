use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failures raised by callbacks and by the HTTP transport.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Handler { message: String },
    #[error("unauthorized: {message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },
    #[error("session not found")]
    SessionNotFound,
    #[error("internal error: {message}")]
    Internal { code: &'static str, message: String },
}

/// Failures while loading definitions or building the registry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed definitions in {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tool `{tool}` has a malformed input schema: {source}")]
    Schema {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} definition has an empty name")]
    EmptyName { kind: &'static str },
    #[error("duplicate tool name `{0}`")]
    DuplicateTool(String),
    #[error("duplicate resource name `{0}`")]
    DuplicateResource(String),
    #[error("failed to pre-serialize {payload}: {source}")]
    Cache {
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Unauthorized { code, message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, code, message.to_string())
            }
            Self::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "session not found".to_string(),
            ),
            Self::Handler { message } | Self::Internal { message, .. } => {
                tracing::error!(error = %message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::AppError;

    #[test]
    fn handler_error_displays_its_message() {
        assert_eq!(AppError::handler("quota exceeded").to_string(), "quota exceeded");
        assert_eq!(
            AppError::internal("pool closed").to_string(),
            "internal error: pool closed"
        );
    }

    #[test]
    fn transport_errors_map_to_statuses() {
        assert_eq!(
            AppError::unauthorized("missing_token", "missing authorization header")
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::SessionNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::internal("boom").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
