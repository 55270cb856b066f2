//! Router facade: construction, materialization and serving.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::Path;
use axum::http::{Request, StatusCode};
use axum::{Extension, Json, Router};
use route_interceptors::config::AppConfig;
use route_interceptors::lifecycle::startup::{bootstrap, StartupError};
use route_interceptors::routing::{DispatchEngine, Endpoint, PatternError, RouteError};
use route_interceptors::{Controller, DiscoveryError, ModuleRegistry, RouteData, RouterOptions, Shutdown};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

mod common;

use common::{controller, registry, Fixture};

async fn show_user(Path(id): Path<u32>, Extension(route): Extension<RouteData>) -> Json<Value> {
    Json(json!({ "id": id, "route": route }))
}

async fn create_user() -> StatusCode {
    StatusCode::CREATED
}

fn users_fixture() -> (Fixture, ModuleRegistry) {
    let fx = Fixture::new();
    fx.route(
        "users.toml",
        "\"/users/:id\" = [{ action = \"show\" }]\n\"/users\" = [{ action = \"create\", method = \"POST\" }]\n",
    );
    let modules = ModuleRegistry::new().with_controller(
        fx.controller_path("users"),
        Controller::new().action("show", show_user).action("create", create_user),
    );
    (fx, modules)
}

async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    (status, body.to_vec())
}

#[test]
fn test_default_roots_resolve_under_cwd() {
    let fx = Fixture::new();
    let interceptors = fx.builder().build(&ModuleRegistry::new()).unwrap();

    assert_eq!(interceptors.router_root(), fx.router_root());
    assert_eq!(interceptors.controller_root(), fx.controller_root());
    assert!(interceptors.bindings().is_empty());
}

#[test]
fn test_configured_roots_ignore_leading_slash() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.cwd().join("app/routes")).unwrap();
    std::fs::write(fx.cwd().join("app/routes/home.toml"), "\"/\" = [{ action = \"index\" }]\n").unwrap();
    let modules = ModuleRegistry::new().with_controller(fx.cwd().join("app/handlers/home"), controller(&["index"]));

    let interceptors = fx
        .builder()
        .router_root("/app/routes")
        .controller_root("app/handlers")
        .build(&modules)
        .unwrap();

    assert_eq!(interceptors.router_root(), fx.cwd().join("app/routes"));
    assert_eq!(interceptors.bindings().len(), 1);
    assert_eq!(interceptors.bindings()[0].provenance().controller, "/app/handlers/home.toml");
}

#[test]
fn test_discovery_failure_prevents_construction() {
    let fx = Fixture::new();
    fx.route("users.toml", "\"/users\" = [{ action = \"list\" }]\n");

    let err = fx.builder().build(&ModuleRegistry::new()).unwrap_err();
    assert!(matches!(err, DiscoveryError::ControllerNotFound { .. }));
}

#[tokio::test]
async fn test_materialized_routes_serve_with_provenance() {
    let (fx, modules) = users_fixture();
    let mut interceptors = fx.builder().build(&modules).unwrap();
    let router = interceptors.materialize().unwrap();

    let (status, body) = send(router.clone(), "GET", "/users/42").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["id"], 42);
    assert_eq!(
        body["route"],
        json!({
            "action": "show",
            "router": "/routers/users.toml",
            "controller": "/controllers/users.toml",
        })
    );

    assert_eq!(send(router.clone(), "POST", "/users").await.0, StatusCode::CREATED);
    assert_eq!(send(router.clone(), "GET", "/users").await.0, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(send(router, "GET", "/missing").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_materialize_twice_serves_the_same_routes() {
    let (fx, modules) = users_fixture();
    let mut interceptors = fx.builder().build(&modules).unwrap();

    let _ = interceptors.materialize().unwrap();
    assert!(interceptors.is_materialized());
    assert_eq!(interceptors.engine().len(), 2);

    let router = interceptors.materialize().unwrap();
    assert_eq!(interceptors.engine().len(), 2);
    assert_eq!(send(router, "POST", "/users").await.0, StatusCode::CREATED);
}

/// Engine that records registrations instead of routing.
#[derive(Debug, Default)]
struct RecordingEngine {
    registered: Vec<(&'static str, String, RouteData)>,
}

impl DispatchEngine for RecordingEngine {
    type Middleware = usize;

    fn register(&mut self, method: &'static str, url: &str, endpoint: Endpoint) -> Result<(), RouteError> {
        self.registered.push((method, url.to_string(), endpoint.route_data));
        Ok(())
    }

    fn routes(&self) -> usize {
        self.registered.len()
    }
}

#[test]
fn test_each_binding_registered_exactly_once() {
    let fx = Fixture::new();
    fx.route(
        "users.toml",
        "\"/users\" = [{ action = \"list\" }, { action = \"create\", method = \"post\" }]\n",
    );
    let modules = registry(&fx, "users", &["list", "create"]);

    let mut interceptors = fx
        .builder()
        .build_with(RecordingEngine::default(), &modules)
        .unwrap();
    assert_eq!(interceptors.engine().registered.len(), 0);

    assert_eq!(interceptors.materialize().unwrap(), 2);
    assert_eq!(interceptors.materialize().unwrap(), 2);

    let mut registered = interceptors.engine().registered.clone();
    registered.sort_by(|a, b| a.0.cmp(b.0));
    assert_eq!(registered[0].0, "get");
    assert_eq!(registered[0].2.action, "list");
    assert_eq!(registered[1].0, "post");
    assert_eq!(registered[1].1, "/users");
    assert_eq!(registered[1].2.router, "/routers/users.toml");
}

#[test]
fn test_conflicting_param_names_fail_materialize() {
    let fx = Fixture::new();
    fx.route("users.toml", "\"/users/:id\" = [{ action = \"show\" }]\n");
    fx.route("admin/users.toml", "\"/users/:uid\" = [{ action = \"update\", method = \"put\" }]\n");
    let mut modules = registry(&fx, "users", &["show"]);
    modules.register(fx.controller_path("admin/users"), controller(&["update"]));

    let mut interceptors = fx.builder().build(&modules).unwrap();
    assert_eq!(interceptors.bindings().len(), 2);

    let err = interceptors.materialize().unwrap_err();
    assert!(matches!(err, RouteError::Conflict { .. }));
    assert!(!interceptors.is_materialized());
}

#[test]
fn test_pattern_without_leading_slash_fails_startup() {
    let fx = Fixture::new();
    fx.route("users.toml", "users = [{ action = \"list\" }]\n");
    let modules = registry(&fx, "users", &["list"]);

    let mut interceptors = fx.builder().build(&modules).unwrap();
    assert_eq!(
        interceptors.materialize().unwrap_err(),
        RouteError::Pattern(PatternError::MissingLeadingSlash("users".into()))
    );

    let err = bootstrap(AppConfig::default(), fx.cwd(), &modules).err().unwrap();
    assert!(matches!(err, StartupError::Route(RouteError::Pattern(_))));
}

#[tokio::test]
async fn test_optional_param_and_extension_method_routes() {
    let fx = Fixture::new();
    fx.route(
        "posts.toml",
        "\"/posts/:id?\" = [{ action = \"show\" }, { action = \"purge\", method = \"PURGE\" }]\n",
    );
    let modules = registry(&fx, "posts", &["show", "purge"]);

    let mut interceptors = fx.builder().build(&modules).unwrap();
    let router = interceptors.materialize().unwrap();

    assert_eq!(send(router.clone(), "GET", "/posts").await.0, StatusCode::OK);
    assert_eq!(send(router.clone(), "GET", "/posts/3").await.0, StatusCode::OK);
    assert_eq!(send(router.clone(), "PURGE", "/posts/3").await.0, StatusCode::OK);
    assert_eq!(send(router, "LOCK", "/posts").await.0, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_prefix_option_nests_routes() {
    let (fx, modules) = users_fixture();
    let mut interceptors = fx
        .builder()
        .options(RouterOptions { prefix: Some("/api/".into()) })
        .build(&modules)
        .unwrap();
    let router = interceptors.materialize().unwrap();

    assert_eq!(send(router.clone(), "GET", "/api/users/1").await.0, StatusCode::OK);
    assert_eq!(send(router, "GET", "/users/1").await.0, StatusCode::NOT_FOUND);
}

#[test]
fn test_url_generation_forwards_to_engine() {
    let (fx, modules) = users_fixture();
    let interceptors = fx.builder().build(&modules).unwrap();

    assert_eq!(interceptors.url("/users/:id", &[("id", "1")]).unwrap(), "/users/1");
    assert!(interceptors.url("/users/:id", &[]).is_err());
    assert_eq!(route_interceptors::url("/users/:id", &[("id", "1")]).unwrap(), "/users/1");
}

#[tokio::test]
async fn test_server_adds_request_id_and_json_fallback() {
    let (fx, modules) = users_fixture();
    let server = bootstrap(AppConfig::default(), fx.cwd(), &modules).unwrap();

    let request = Request::builder().uri("/nothing/here").body(Body::empty()).unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["path"], "/nothing/here");
}

#[tokio::test]
async fn test_server_runs_until_shutdown_triggered() {
    let (fx, modules) = users_fixture();
    let server = bootstrap(AppConfig::default(), fx.cwd(), &modules).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.clone()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /users/5 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("\"controller\":\"/controllers/users.toml\""));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
}
