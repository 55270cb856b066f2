//! Convention-based route discovery for axum.
//!
//! Route-definition files under a router root declare URL patterns and the
//! controller actions that serve them; each file is paired with the
//! controller module at the same relative path under a controller root.

pub mod config;
pub mod discovery;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod paths;
pub mod routing;

pub use config::AppConfig;
pub use discovery::{discover, BindingRecord, DiscoveryError, ModuleLoader, ModuleRegistry, RouteData};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{url, Action, Controller, Interceptors, RouteError, RouterOptions};
