//! Model Context Protocol (MCP) engine and JSON-RPC envelope handling
//!
//! Provides the envelope model and error taxonomy, the pre-serialized response
//! cache, the callback traits and the dispatcher that routes between them.

pub mod cache;
pub mod handler;
pub mod rpc;
pub mod server;
