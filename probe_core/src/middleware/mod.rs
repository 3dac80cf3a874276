//! Middleware components for the HTTP server

pub mod logging;
pub mod probe;
