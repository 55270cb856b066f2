//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, tracing, timeout layers)
//!     → materialized interceptors router (provenance + action)
//!     → fallback 404 when nothing matched
//! ```

pub mod server;

pub use server::HttpServer;
