//! Controller modules and their actions.
//!
//! A controller is a table of named actions. Actions wrap any axum handler
//! behind a type-erased, cheaply cloneable pointer so a binding can carry the
//! exact handler the controller exported.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::handler::Handler;
use axum::response::Response;
use futures_util::future::{BoxFuture, FutureExt};

type BoxedHandler = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A request handler exported by a controller.
#[derive(Clone)]
pub struct Action {
    handler: Arc<BoxedHandler>,
}

impl Action {
    /// Wrap an axum handler (async fn with extractors, returning `IntoResponse`).
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, ()>,
    {
        Self {
            handler: Arc::new(move |req: Request| handler.clone().call(req, ()).boxed()),
        }
    }

    /// Run the handler against a request.
    pub fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        (self.handler)(req)
    }

    /// Returns true if both actions refer to the same exported handler.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}

/// Mapping from action name to handler.
#[derive(Clone, Debug, Default)]
pub struct Controller {
    actions: HashMap<String, Action>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a handler under `name`.
    pub fn action<H, T>(mut self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
    {
        self.insert(name, Action::new(handler));
        self
    }

    /// Insert an already wrapped action, replacing any previous one with that name.
    pub fn insert(&mut self, name: impl Into<String>, action: Action) -> Option<Action> {
        self.actions.insert(name.into(), action)
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Names of all exported actions, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
