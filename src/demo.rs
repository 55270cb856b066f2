//! Controllers for the route files under `demos/routers`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{extract::Path as UrlPath, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use route_interceptors::{Controller, ModuleRegistry, RouteData};

/// Registry with every demo controller, keyed under `controller_root`.
pub fn modules(controller_root: &Path) -> ModuleRegistry {
    ModuleRegistry::new()
        .with_controller(controller_root.join("index"), index_controller())
        .with_controller(controller_root.join("api/users"), users_controller())
        .with_controller(controller_root.join("api/posts"), posts_controller())
}

fn index_controller() -> Controller {
    Controller::new()
        .action("home", || async { "route-interceptors demo" })
        .action("health", || async { Json(json!({ "status": "ok" })) })
}

fn users_controller() -> Controller {
    let next_id = Arc::new(AtomicU64::new(3));

    Controller::new()
        .action("list", list_users)
        .action("show", show_user)
        .action(
            "create",
            move |Extension(route): Extension<RouteData>, Json(body): Json<NewUser>| {
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({ "id": id, "name": body.name, "route": route })),
                    )
                }
            },
        )
}

fn posts_controller() -> Controller {
    Controller::new().action("list", |Extension(route): Extension<RouteData>| async move {
        Json(json!({ "posts": [], "route": route }))
    })
}

#[derive(Debug, Deserialize)]
struct NewUser {
    name: String,
}

async fn list_users(Extension(route): Extension<RouteData>) -> Json<Value> {
    Json(json!({
        "users": [{ "id": 1, "name": "ada" }, { "id": 2, "name": "grace" }],
        "route": route,
    }))
}

async fn show_user(UrlPath(id): UrlPath<u64>, Extension(route): Extension<RouteData>) -> Json<Value> {
    Json(json!({ "id": id, "route": route }))
}
