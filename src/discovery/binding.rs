//! Binding records and route-table resolution.
//!
//! A route-definition module maps URL patterns to lists of action
//! declarations (`{ action, method? }`). Resolution checks each declaration
//! against the paired controller and the method allow-list and emits one
//! [`BindingRecord`] per declaration.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::discovery::DiscoveryError;
use crate::routing::controller::{Action, Controller};
use crate::routing::engine::Endpoint;
use crate::routing::methods::{normalize_method, DEFAULT_METHOD};

/// Provenance of a binding, attached to every request it serves.
///
/// Paths are rendered relative to the working directory with a leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteData {
    /// Name of the controller action.
    pub action: String,
    /// Route-definition file that declared the binding.
    pub router: String,
    /// Controller module the action came from.
    pub controller: String,
}

/// A validated URL + method → action binding.
#[derive(Debug, Clone)]
pub struct BindingRecord {
    url: String,
    method: &'static str,
    action: Action,
    provenance: RouteData,
}

impl BindingRecord {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lower-cased HTTP method from the allow-list.
    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn provenance(&self) -> &RouteData {
        &self.provenance
    }

    /// Endpoint handed to the dispatch engine for this binding.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            action: self.action.clone(),
            route_data: self.provenance.clone(),
        }
    }

    /// Structural equality: same url, method, provenance and handler.
    pub fn same_as(&self, other: &Self) -> bool {
        self.url == other.url
            && self.method == other.method
            && self.provenance == other.provenance
            && self.action.ptr_eq(&other.action)
    }
}

/// Resolve one route-definition module against its controller.
///
/// `router` and `controller` are the display paths used in provenance and
/// error messages.
pub(crate) fn resolve_routes(
    routes: &Map<String, Value>,
    controller: &Controller,
    router: &str,
    controller_path: &str,
    out: &mut Vec<BindingRecord>,
) -> Result<(), DiscoveryError> {
    for (url, entry) in routes {
        let declarations = entry.as_array().ok_or_else(|| DiscoveryError::InvalidRouteEntry {
            url: url.clone(),
            router: router.to_string(),
        })?;

        for declaration in declarations {
            let (action_name, action) = resolve_action(declaration, controller, controller_path)?;
            let method = resolve_method(declaration)?;

            tracing::trace!(method, url = %url, action = %action_name, "Binding resolved");

            out.push(BindingRecord {
                url: url.clone(),
                method,
                action,
                provenance: RouteData {
                    action: action_name,
                    router: router.to_string(),
                    controller: controller_path.to_string(),
                },
            });
        }
    }
    Ok(())
}

fn resolve_action(
    declaration: &Value,
    controller: &Controller,
    controller_path: &str,
) -> Result<(String, Action), DiscoveryError> {
    let not_found = |action: String| DiscoveryError::ActionNotFound {
        action,
        controller: controller_path.to_string(),
    };

    match declaration.get("action") {
        Some(Value::String(name)) => controller
            .get(name)
            .map(|action| (name.clone(), action.clone()))
            .ok_or_else(|| not_found(name.clone())),
        Some(other) => Err(not_found(other.to_string())),
        None => Err(not_found(Value::Null.to_string())),
    }
}

fn resolve_method(declaration: &Value) -> Result<&'static str, DiscoveryError> {
    match declaration.get("method") {
        None => Ok(DEFAULT_METHOD),
        Some(Value::String(raw)) => {
            normalize_method(raw).ok_or_else(|| DiscoveryError::UnsupportedMethod { method: raw.clone() })
        }
        Some(other) => Err(DiscoveryError::UnsupportedMethod {
            method: other.to_string(),
        }),
    }
}
