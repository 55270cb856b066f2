//! Dispatch engine capability and its axum implementation.
//!
//! # Responsibilities
//! - Accept per-method registrations of endpoints
//! - Reject patterns axum cannot hold before they reach the router
//! - Compose registered endpoints into servable middleware
//! - Generate URLs from patterns
//!
//! # Design Decisions
//! - The facade talks to the engine through [`DispatchEngine`] only
//! - Provenance is attached as a request extension before the action runs
//! - A repeated (method, path) keeps the first endpoint; later ones are
//!   logged and dropped
//! - Methods without an axum filter are matched by a per-path fallback
//! - Optional parameters register every path they expand to

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::add_extension::AddExtensionLayer;

use crate::discovery::RouteData;
use crate::routing::controller::Action;
use crate::routing::methods::{http_method, method_filter};
use crate::routing::pattern::{self, expand, PatternError, RoutePath, UrlError};

/// Options applied to the dispatch engine at construction.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterOptions {
    /// Path prefix every discovered route is nested under (e.g. "/api").
    pub prefix: Option<String>,
}

impl RouterOptions {
    /// The prefix with a leading slash and no trailing slashes, or None if it
    /// is empty or "/".
    pub fn normalized_prefix(&self) -> Option<String> {
        let prefix = self.prefix.as_deref()?.trim_matches('/');
        if prefix.is_empty() {
            None
        } else {
            Some(format!("/{prefix}"))
        }
    }
}

/// What gets registered for a single binding.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub action: Action,
    pub route_data: RouteData,
}

/// A binding the engine refused to register.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("route {pattern} conflicts with previously registered route {existing}")]
    Conflict { pattern: String, existing: String },

    #[error("method {method} can't be dispatched")]
    UnroutableMethod { method: String },
}

/// Underlying router capability used by the facade.
pub trait DispatchEngine {
    /// Composed middleware returned by [`DispatchEngine::routes`].
    type Middleware;

    /// Register `endpoint` for requests matching `method` and `url`.
    fn register(&mut self, method: &'static str, url: &str, endpoint: Endpoint) -> Result<(), RouteError>;

    /// Compose everything registered so far.
    fn routes(&self) -> Self::Middleware;

    /// Generate a URL from `pattern` and `params`.
    fn url(&self, pattern: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
        pattern::url(pattern, params)
    }
}

enum Dispatch {
    Filtered(MethodFilter),
    Extension(Method),
}

/// Everything registered under one concrete path.
#[derive(Debug)]
struct PathEntry {
    path: RoutePath,
    axum_path: String,
    /// Pattern as first declared, for error messages.
    pattern: String,
    methods: Option<MethodRouter>,
    extensions: Vec<(Method, Endpoint)>,
}

impl PathEntry {
    fn method_router(&self) -> MethodRouter {
        let router = self.methods.clone().unwrap_or_else(MethodRouter::new);
        if self.extensions.is_empty() {
            return router;
        }

        let extensions = Arc::new(self.extensions.clone());
        router.fallback(move |mut req: Request| {
            let extensions = Arc::clone(&extensions);
            async move {
                match extensions.iter().find(|(method, _)| method == req.method()) {
                    Some((_, endpoint)) => {
                        req.extensions_mut().insert(endpoint.route_data.clone());
                        endpoint.action.call(req).await
                    }
                    None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
                }
            }
        })
    }
}

/// [`DispatchEngine`] backed by `axum::Router`.
#[derive(Debug, Default)]
pub struct AxumEngine {
    entries: Vec<PathEntry>,
    prefix: Option<String>,
    registered: HashSet<(&'static str, String)>,
}

impl AxumEngine {
    pub fn new(options: &RouterOptions) -> Self {
        Self {
            prefix: options.normalized_prefix(),
            ..Self::default()
        }
    }

    /// Number of distinct (method, path) pairs registered.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    fn entry_mut(&mut self, path: RoutePath, axum_path: String, pattern: &str) -> &mut PathEntry {
        let index = match self.entries.iter().position(|entry| entry.axum_path == axum_path) {
            Some(index) => index,
            None => {
                self.entries.push(PathEntry {
                    path,
                    axum_path,
                    pattern: pattern.to_string(),
                    methods: None,
                    extensions: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }
}

impl DispatchEngine for AxumEngine {
    type Middleware = Router;

    fn register(&mut self, method: &'static str, url: &str, endpoint: Endpoint) -> Result<(), RouteError> {
        let dispatch = match method_filter(method) {
            Some(filter) => Dispatch::Filtered(filter),
            None => Dispatch::Extension(http_method(method).ok_or_else(|| RouteError::UnroutableMethod {
                method: method.to_string(),
            })?),
        };

        let paths = expand(url)?;
        for (index, path) in paths.iter().enumerate() {
            if let Some(existing) = self.entries.iter().find(|entry| entry.path.conflicts_with(path)) {
                return Err(RouteError::Conflict {
                    pattern: url.to_string(),
                    existing: existing.pattern.clone(),
                });
            }
            // Two optional parameters side by side expand into clashing paths.
            if paths[..index].iter().any(|earlier| earlier.conflicts_with(path)) {
                return Err(RouteError::Conflict {
                    pattern: url.to_string(),
                    existing: url.to_string(),
                });
            }
        }

        for path in paths {
            let axum_path = path.to_axum();
            if !self.registered.insert((method, axum_path.clone())) {
                tracing::warn!(
                    method,
                    url,
                    action = %endpoint.route_data.action,
                    router = %endpoint.route_data.router,
                    "Duplicate route binding ignored"
                );
                continue;
            }

            tracing::debug!(method, url, path = %axum_path, "Route registered");
            let entry = self.entry_mut(path, axum_path, url);
            match &dispatch {
                Dispatch::Filtered(filter) => {
                    let action = endpoint.action.clone();
                    let method_router: MethodRouter = on(*filter, move |req: Request| action.call(req))
                        .layer(AddExtensionLayer::new(endpoint.route_data.clone()));
                    entry.methods = Some(match entry.methods.take() {
                        Some(existing) => existing.merge(method_router),
                        None => method_router,
                    });
                }
                Dispatch::Extension(wire) => entry.extensions.push((wire.clone(), endpoint.clone())),
            }
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        let router = self
            .entries
            .iter()
            .fold(Router::new(), |router, entry| router.route(&entry.axum_path, entry.method_router()));

        match &self.prefix {
            Some(prefix) => Router::new().nest(prefix, router),
            None => router,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use axum::Extension;
    use tower::ServiceExt;

    async fn describe(Extension(data): Extension<RouteData>) -> String {
        format!("{}#{}", data.controller, data.action)
    }

    async fn other() -> &'static str {
        "other"
    }

    fn endpoint(action: Action, name: &str) -> Endpoint {
        Endpoint {
            action,
            route_data: RouteData {
                action: name.to_string(),
                router: "/routers/users.toml".to_string(),
                controller: "/controllers/users.toml".to_string(),
            },
        }
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 64).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_normalized_prefix() {
        let opts = |p: &str| RouterOptions { prefix: Some(p.to_string()) };
        assert_eq!(opts("/api/").normalized_prefix(), Some("/api".to_string()));
        assert_eq!(opts("/").normalized_prefix(), None);
        assert_eq!(opts("api").normalized_prefix(), Some("/api".to_string()));
        assert_eq!(RouterOptions::default().normalized_prefix(), None);
    }

    #[tokio::test]
    async fn test_registered_endpoint_sees_route_data() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/users/:id", endpoint(Action::new(describe), "show")).unwrap();

        let (status, body) = send(engine.routes(), "GET", "/users/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "/controllers/users.toml#show");
    }

    #[tokio::test]
    async fn test_methods_on_same_path_merge() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/users", endpoint(Action::new(describe), "list")).unwrap();
        engine.register("post", "/users", endpoint(Action::new(describe), "create")).unwrap();
        assert_eq!(engine.len(), 2);

        let router = engine.routes();
        assert_eq!(send(router.clone(), "GET", "/users").await.1, "/controllers/users.toml#list");
        assert_eq!(send(router.clone(), "POST", "/users").await.1, "/controllers/users.toml#create");
        assert_eq!(send(router, "DELETE", "/users").await.0, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_duplicate_binding_keeps_first() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/users", endpoint(Action::new(describe), "list")).unwrap();
        engine.register("get", "/users", endpoint(Action::new(other), "other")).unwrap();
        assert_eq!(engine.len(), 1);

        let (_, body) = send(engine.routes(), "GET", "/users").await;
        assert_eq!(body, "/controllers/users.toml#list");
    }

    #[tokio::test]
    async fn test_prefix_nests_routes() {
        let mut engine = AxumEngine::new(&RouterOptions { prefix: Some("/api".into()) });
        engine.register("get", "/users", endpoint(Action::new(other), "list")).unwrap();

        let router = engine.routes();
        assert_eq!(send(router.clone(), "GET", "/api/users").await.0, StatusCode::OK);
        assert_eq!(send(router, "GET", "/users").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_optional_param_serves_both_paths() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/posts/:id?", endpoint(Action::new(describe), "show")).unwrap();
        assert_eq!(engine.len(), 2);

        let router = engine.routes();
        assert_eq!(send(router.clone(), "GET", "/posts").await.0, StatusCode::OK);
        assert_eq!(send(router, "GET", "/posts/4").await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_extension_methods_dispatch() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/cache", endpoint(Action::new(other), "show")).unwrap();
        engine.register("purge", "/cache", endpoint(Action::new(describe), "purge")).unwrap();
        engine.register("m-search", "/devices", endpoint(Action::new(describe), "search")).unwrap();

        let router = engine.routes();
        assert_eq!(send(router.clone(), "GET", "/cache").await.1, "other");
        assert_eq!(send(router.clone(), "PURGE", "/cache").await.1, "/controllers/users.toml#purge");
        assert_eq!(send(router.clone(), "M-SEARCH", "/devices").await.1, "/controllers/users.toml#search");
        assert_eq!(send(router.clone(), "LOCK", "/cache").await.0, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(send(router, "GET", "/devices").await.0, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_conflicting_param_names_rejected() {
        let mut engine = AxumEngine::default();
        engine.register("get", "/users/:id", endpoint(Action::new(other), "show")).unwrap();

        let err = engine
            .register("put", "/users/:uid", endpoint(Action::new(other), "update"))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::Conflict {
                pattern: "/users/:uid".into(),
                existing: "/users/:id".into(),
            }
        );
        assert_eq!(engine.len(), 1);

        let err = engine.register("get", "/a/:b?/:c?", endpoint(Action::new(other), "ab")).unwrap_err();
        assert!(matches!(err, RouteError::Conflict { ref existing, .. } if existing == "/a/:b?/:c?"));

        // Static siblings of a parameter are fine.
        engine.register("get", "/users/new", endpoint(Action::new(other), "new")).unwrap();
        let _ = engine.routes();
    }

    #[test]
    fn test_pattern_without_leading_slash_rejected() {
        let mut engine = AxumEngine::default();
        let err = engine.register("get", "users", endpoint(Action::new(other), "list")).unwrap_err();
        assert_eq!(err, RouteError::Pattern(PatternError::MissingLeadingSlash("users".into())));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_engine_url_forwards_to_pattern() {
        let engine = AxumEngine::default();
        assert_eq!(engine.url("/users/:id", &[("id", "1")]).unwrap(), "/users/1");
    }
}
