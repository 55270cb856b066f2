//! Discovery failures.
//!
//! Every variant aborts the whole discovery pass: a route table that cannot be
//! fully resolved must keep the server from starting.

use std::path::PathBuf;

use thiserror::Error;

use crate::discovery::loader::BoxError;

/// Error raised while discovering routes.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The filesystem refused to list or stat a path under the route root.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A route-definition file exists but could not be loaded.
    #[error("router {router} failed to load: {source}")]
    RouteLoad {
        router: String,
        #[source]
        source: BoxError,
    },

    /// A route-definition file did not export a mapping.
    #[error("router {router} invalid")]
    InvalidRouteModule { router: String },

    #[error("controller {controller} not found")]
    ControllerNotFound { controller: String },

    /// The paired controller exists but failed to load.
    #[error("controller {controller} error occurred: {source}")]
    ControllerLoad {
        controller: String,
        #[source]
        source: BoxError,
    },

    /// The paired module is not a controller.
    #[error("controller {controller} invalid")]
    InvalidControllerModule { controller: String },

    /// A URL pattern maps to something other than a list of actions.
    #[error("route {url} in {router} invalid")]
    InvalidRouteEntry { url: String, router: String },

    #[error("action {action} can't be found in controller {controller}")]
    ActionNotFound { action: String, controller: String },

    #[error("method {method} not supported")]
    UnsupportedMethod { method: String },
}
