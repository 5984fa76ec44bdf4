//! Tool and resource definitions, their loading, and the registry built from them
//!
//! Everything here is immutable once the registry is built.

pub mod loader;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod tools;
