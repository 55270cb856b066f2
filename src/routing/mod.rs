//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (at startup):
//!     Interceptors::builder()
//!     → resolve router/controller roots against cwd
//!     → discovery (walk, pair, validate)
//!     → Vec<BindingRecord> held by the facade
//!
//! Materialization (on demand, once):
//!     BindingRecord
//!     → pattern.rs (validate, expand optional params, conflict check)
//!     → engine.rs (method filter + provenance extension + action)
//!     → axum::Router served by http/
//! ```
//!
//! # Design Decisions
//! - Pattern matching belongs to axum; this layer translates syntax and
//!   refuses what axum would reject
//! - Bindings are immutable once discovered
//! - The facade owns its engine and forwards to it

pub mod controller;
pub mod engine;
pub mod interceptors;
pub mod methods;
pub mod pattern;

pub use controller::{Action, Controller};
pub use engine::{AxumEngine, DispatchEngine, Endpoint, RouteError, RouterOptions};
pub use interceptors::{Interceptors, InterceptorsBuilder, DEFAULT_CONTROLLER_ROOT, DEFAULT_ROUTER_ROOT};
pub use methods::METHODS;
pub use pattern::{url, PatternError, UrlError};
