use std::sync::Arc;

use mcpserver::{build_app, config::Config, logging, stubs, AppState, Server, ServerBuilder};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = logging::init_logging()?;

    let config = Config::from_env()?;

    let server: Server = ServerBuilder::new()
        .tools_file(&config.tools_file)?
        .resources_file(&config.resources_file)?
        .server_info(&config.server_name, &config.server_version)
        .logger(logger)
        .build()?;

    info!(
        tools = server.registry().tools().len(),
        resources = server.registry().resources().len(),
        "definitions loaded"
    );

    if config.stub_tools {
        let registered = stubs::register_stub_tools(&server);
        info!(registered, "stub tool handlers registered");
    }

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(Arc::new(server), config.api_token.clone());
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        auth = config.api_token.is_some(),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
