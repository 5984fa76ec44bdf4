//! Placeholder callbacks for declared tools
//!
//! Lets a freshly configured server answer every declared tool before real
//! implementations exist.

use serde_json::{Map, Value};

use crate::mcp::{
    handler::{text_result, FnToolHandler},
    server::Server,
};

/// Registers a callback answering `stub: <name> accepted` for every declared
/// tool. Returns how many were registered.
pub fn register_stub_tools(server: &Server) -> usize {
    let tools = server.registry().tools();

    for tool in tools {
        let reply = format!("stub: {} accepted", tool.name());
        server.handle_tool(
            tool.name(),
            FnToolHandler::new(move |_: Value, _: Map<String, Value>| {
                let reply = reply.clone();
                async move { Ok(text_result(reply)) }
            }),
        );
    }

    tools.len()
}
