//! Streamable-HTTP binding for the protocol engine
//!
//! Maps HTTP requests onto envelopes, tracks sessions and renders status codes.

pub mod handlers;
