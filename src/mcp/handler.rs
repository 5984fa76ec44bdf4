//! Callback traits bound to tool and resource names
//!
//! Callbacks are shared across concurrent requests, so implementations must be
//! `Send + Sync` and reentrant. The request context `C` is moved into exactly
//! one callback invocation.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, ReadResourceContent, TextContent};
use serde_json::{Map, Value};

use crate::errors::AppError;

pub type ToolArguments = Map<String, Value>;

#[async_trait]
pub trait ToolHandler<C = Value>: Send + Sync
where
    C: Send + 'static,
{
    async fn call(&self, context: C, arguments: ToolArguments) -> Result<CallToolResult, AppError>;
}

#[async_trait]
pub trait ResourceHandler<C = Value>: Send + Sync
where
    C: Send + 'static,
{
    async fn read(&self, context: C, uri: &str) -> Result<ReadResourceContent, AppError>;
}

/// Adapts an async closure `(context, arguments)` into a [`ToolHandler`].
pub struct FnToolHandler<F> {
    f: F,
}

impl<F> FnToolHandler<F> {
    pub fn new<C, Fut>(f: F) -> Arc<dyn ToolHandler<C>>
    where
        C: Send + 'static,
        F: Fn(C, ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, AppError>> + Send + 'static,
    {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<C, F, Fut> ToolHandler<C> for FnToolHandler<F>
where
    C: Send + 'static,
    F: Fn(C, ToolArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult, AppError>> + Send + 'static,
{
    async fn call(&self, context: C, arguments: ToolArguments) -> Result<CallToolResult, AppError> {
        (self.f)(context, arguments).await
    }
}

/// Adapts an async closure `(context, uri)` into a [`ResourceHandler`].
pub struct FnResourceHandler<F> {
    f: F,
}

impl<F> FnResourceHandler<F> {
    pub fn new<C, Fut>(f: F) -> Arc<dyn ResourceHandler<C>>
    where
        C: Send + 'static,
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceContent, AppError>> + Send + 'static,
    {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<C, F, Fut> ResourceHandler<C> for FnResourceHandler<F>
where
    C: Send + 'static,
    F: Fn(C, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ReadResourceContent, AppError>> + Send + 'static,
{
    async fn read(&self, context: C, uri: &str) -> Result<ReadResourceContent, AppError> {
        (self.f)(context, uri.to_string()).await
    }
}

pub fn text_result(text: impl Into<String>) -> CallToolResult {
    text_content_result(text.into(), None)
}

/// Tool-level failure rendered as content rather than as a protocol error.
pub fn error_result(text: impl Into<String>) -> CallToolResult {
    text_content_result(text.into(), Some(true))
}

fn text_content_result(text: String, is_error: Option<bool>) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error,
        meta: None,
        structured_content: None,
    }
}
