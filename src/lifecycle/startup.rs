//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the interceptors router from validated configuration
//! - Materialize routes and wrap them in the HTTP server
//! - Bind the listener last, once routes are known to be good

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::discovery::{DiscoveryError, ModuleLoader};
use crate::http::HttpServer;
use crate::routing::{Interceptors, RouteError};

/// Error type for startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("route registration failed: {0}")]
    Route(#[from] RouteError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Discover routes as configured, resolving roots against `cwd`.
pub fn build_interceptors(
    config: &AppConfig,
    cwd: &Path,
    loader: &dyn ModuleLoader,
) -> Result<Interceptors, DiscoveryError> {
    Interceptors::builder()
        .router_root(config.routes.router_root.as_str())
        .controller_root(config.routes.controller_root.as_str())
        .options(config.router.clone())
        .cwd(cwd)
        .build(loader)
}

/// Discover, materialize and wrap the routes in an [`HttpServer`].
pub fn bootstrap(config: AppConfig, cwd: &Path, loader: &dyn ModuleLoader) -> Result<HttpServer, StartupError> {
    let mut interceptors = build_interceptors(&config, cwd, loader)?;
    let routes = interceptors.materialize()?;

    tracing::info!(
        router_root = %interceptors.router_root().display(),
        bindings = interceptors.bindings().len(),
        prefix = ?config.router.prefix,
        "Router ready"
    );

    Ok(HttpServer::new(config, routes))
}

/// Bind the configured listener address.
pub async fn bind_listener(config: &AppConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
