//! Pre-serialized payloads for responses that depend only on server configuration

use std::sync::Arc;

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ServerCapabilities, ServerCapabilitiesResources,
    ServerCapabilitiesTools,
};
use serde::Serialize;
use serde_json::value::{to_raw_value, RawValue};

use crate::domain::{registry::Registry, resources::ResourceDefinition, tools::ToolDefinition};
use crate::errors::LoadError;

pub const PROTOCOL_VERSION: &str = "2025-03-26";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "mcpserver".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ToolsListResult<'a> {
    tools: &'a [ToolDefinition],
}

#[derive(Serialize)]
struct ResourcesListResult<'a> {
    resources: &'a [ResourceDefinition],
}

/// Buffers serialized once per server lifetime and shared by every request.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    initialize: Arc<RawValue>,
    tools_list: Arc<RawValue>,
    resources_list: Arc<RawValue>,
}

impl ResponseCache {
    pub fn build(registry: &Registry, info: &ServerInfo) -> Result<Self, LoadError> {
        let initialize = InitializeResult {
            server_info: Implementation {
                name: info.name.clone(),
                version: info.version.clone(),
                title: None,
                description: None,
                icons: vec![],
                website_url: None,
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools {
                    list_changed: Some(false),
                }),
                resources: Some(ServerCapabilitiesResources {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                prompts: None,
                ..Default::default()
            },
            protocol_version: PROTOCOL_VERSION.to_string(),
            instructions: None,
            meta: None,
        };

        Ok(Self {
            initialize: freeze("initialize result", &initialize)?,
            tools_list: freeze(
                "tools/list result",
                &ToolsListResult {
                    tools: registry.tools(),
                },
            )?,
            resources_list: freeze(
                "resources/list result",
                &ResourcesListResult {
                    resources: registry.resources(),
                },
            )?,
        })
    }

    pub fn initialize(&self) -> &Arc<RawValue> {
        &self.initialize
    }

    pub fn tools_list(&self) -> &Arc<RawValue> {
        &self.tools_list
    }

    pub fn resources_list(&self) -> &Arc<RawValue> {
        &self.resources_list
    }
}

fn freeze<T: Serialize>(payload: &'static str, value: &T) -> Result<Arc<RawValue>, LoadError> {
    to_raw_value(value)
        .map(Arc::from)
        .map_err(|source| LoadError::Cache { payload, source })
}
