//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use route_interceptors::routing::InterceptorsBuilder;
use route_interceptors::{Controller, Interceptors, ModuleRegistry};
use tempfile::TempDir;

/// A throwaway working directory with `routers/` and `controllers/` roots.
pub struct Fixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("routers")).unwrap();
        fs::create_dir(dir.path().join("controllers")).unwrap();
        Self { dir }
    }

    pub fn cwd(&self) -> &Path {
        self.dir.path()
    }

    pub fn router_root(&self) -> PathBuf {
        self.cwd().join("routers")
    }

    pub fn controller_root(&self) -> PathBuf {
        self.cwd().join("controllers")
    }

    /// Write a route-definition file at `relative` under the router root.
    pub fn route(&self, relative: &str, contents: &str) -> &Self {
        write(&self.router_root().join(relative), contents);
        self
    }

    /// Write a file at `relative` under the controller root.
    pub fn controller_file(&self, relative: &str, contents: &str) -> &Self {
        write(&self.controller_root().join(relative), contents);
        self
    }

    /// Module path for a controller at `relative` (extension optional).
    pub fn controller_path(&self, relative: &str) -> PathBuf {
        self.controller_root().join(relative)
    }

    /// Builder rooted at this fixture's working directory.
    pub fn builder(&self) -> InterceptorsBuilder {
        Interceptors::builder().cwd(self.cwd())
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[allow(dead_code)]
pub async fn ok() -> &'static str {
    "ok"
}

/// Controller exporting `names`, each answering "ok".
#[allow(dead_code)]
pub fn controller(names: &[&str]) -> Controller {
    names.iter().fold(Controller::new(), |c, name| c.action(*name, ok))
}

/// Registry with a single controller exporting `names` at `relative`.
#[allow(dead_code)]
pub fn registry(fixture: &Fixture, relative: &str, names: &[&str]) -> ModuleRegistry {
    ModuleRegistry::new().with_controller(fixture.controller_path(relative), controller(names))
}
