use std::{env, net::SocketAddr, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: Option<String>,
    pub bind_addr: String,
    pub bind_port: u16,
    pub tools_file: PathBuf,
    pub resources_file: PathBuf,
    pub server_name: String,
    pub server_version: String,
    pub stub_tools: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("{name} must be a boolean (true/false/1/0)")]
    InvalidBool { name: &'static str },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parses configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_token = var("MCP_API_TOKEN");
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let tools_file = var("MCP_TOOLS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config/tools.json"));
        let resources_file = var("MCP_RESOURCES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config/resources.json"));
        let server_name = var("MCP_SERVER_NAME").unwrap_or_else(|| "mcpserver".to_string());
        let server_version = var("MCP_SERVER_VERSION").unwrap_or_else(|| "1.0.0".to_string());
        let stub_tools = var("MCP_STUB_TOOLS")
            .map(|value| parse_bool("MCP_STUB_TOOLS", &value))
            .transpose()?
            .unwrap_or(false);

        let config = Self {
            api_token,
            bind_addr,
            bind_port,
            tools_file,
            resources_file,
            server_name,
            server_version,
            stub_tools,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name }),
    }
}
