//! HTTP method allow-list.
//!
//! Route files name methods case-insensitively; bindings always carry the
//! lower-cased form taken from [`METHODS`]. Methods without an axum
//! [`MethodFilter`] (WebDAV and friends) are dispatched by the engine itself.

use axum::http::Method;
use axum::routing::MethodFilter;

/// Methods a route declaration may use, lower-cased.
pub const METHODS: [&str; 34] = [
    "acl", "bind", "checkout", "connect", "copy", "delete", "get", "head", "link", "lock",
    "m-search", "merge", "mkactivity", "mkcalendar", "mkcol", "move", "notify", "options",
    "patch", "post", "propfind", "proppatch", "purge", "put", "rebind", "report", "search",
    "source", "subscribe", "trace", "unbind", "unlink", "unlock", "unsubscribe",
];

/// Method used when an action declaration omits one.
pub const DEFAULT_METHOD: &str = "get";

/// Look up `raw` in the allow-list, ignoring case.
pub fn normalize_method(raw: &str) -> Option<&'static str> {
    let lower = raw.to_lowercase();
    METHODS.iter().copied().find(|m| *m == lower)
}

/// The wire form of an allow-listed method.
pub fn http_method(method: &str) -> Option<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok()
}

/// Map an allow-listed method onto axum's method filter, if it has one.
pub fn method_filter(method: &str) -> Option<MethodFilter> {
    let filter = match method {
        "get" => MethodFilter::GET,
        "head" => MethodFilter::HEAD,
        "post" => MethodFilter::POST,
        "put" => MethodFilter::PUT,
        "delete" => MethodFilter::DELETE,
        "connect" => MethodFilter::CONNECT,
        "options" => MethodFilter::OPTIONS,
        "patch" => MethodFilter::PATCH,
        "trace" => MethodFilter::TRACE,
        _ => return None,
    };
    Some(filter)
}
