//! Route discovery subsystem.
//!
//! # Data Flow
//! ```text
//! router root (directory tree)
//!     → fs.rs (list entries, classify)
//!     → directories: recurse, depth-first, pre-order
//!     → loadable files: loader.rs loads the route module
//!     → paths.rs pairs it with controller root + relative path
//!     → loader.rs loads the controller module
//!     → binding.rs validates declarations, emits BindingRecords
//! ```
//!
//! # Design Decisions
//! - Runs once, synchronously, before anything is served
//! - All-or-nothing: the first violation aborts the pass
//! - Entries are visited in the order the filesystem lists them; no sort
//!   is imposed, so ordering is only as stable as the platform's `read_dir`
//! - Filesystem and loader are injected capabilities
//! - A directory already on the current descent (a symlink cycle) is
//!   skipped with a warning

pub mod binding;
pub mod error;
pub mod fs;
pub mod loader;

use std::path::{Path, PathBuf};

use serde_json::Value;

pub use binding::{BindingRecord, RouteData};
pub use error::DiscoveryError;
pub use fs::{EntryKind, Filesystem, OsFilesystem};
pub use loader::{LoadError, Module, ModuleLoader, ModuleRegistry};

use crate::paths::{pair_controller_path, path_to_cwd};

/// One discovery pass over a router root and its controller root.
pub struct Discovery<'a> {
    router_root: &'a Path,
    controller_root: &'a Path,
    cwd: &'a Path,
    fs: &'a dyn Filesystem,
    loader: &'a dyn ModuleLoader,
}

impl<'a> Discovery<'a> {
    /// Prepare a pass over absolute `router_root` and `controller_root`.
    ///
    /// `cwd` is only used to render provenance paths.
    pub fn new(
        router_root: &'a Path,
        controller_root: &'a Path,
        cwd: &'a Path,
        loader: &'a dyn ModuleLoader,
    ) -> Self {
        Self {
            router_root,
            controller_root,
            cwd,
            fs: &OsFilesystem,
            loader,
        }
    }

    /// Replace the filesystem capability.
    pub fn with_filesystem(mut self, fs: &'a dyn Filesystem) -> Self {
        self.fs = fs;
        self
    }

    /// Walk the router root and resolve every route file.
    pub fn run(&self) -> Result<Vec<BindingRecord>, DiscoveryError> {
        let mut bindings = Vec::new();
        self.walk(self.router_root, &mut Vec::new(), &mut bindings)?;

        tracing::info!(
            router_root = %self.router_root.display(),
            controller_root = %self.controller_root.display(),
            bindings = bindings.len(),
            "Route discovery complete"
        );
        Ok(bindings)
    }

    /// `ancestors` holds the canonical directories on the current descent.
    fn walk(
        &self,
        dir: &Path,
        ancestors: &mut Vec<PathBuf>,
        out: &mut Vec<BindingRecord>,
    ) -> Result<(), DiscoveryError> {
        let io_error = |source| DiscoveryError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let canonical = self.fs.canonicalize(dir).map_err(io_error)?;
        if ancestors.contains(&canonical) {
            tracing::warn!(path = %dir.display(), "Directory cycle, not descending again");
            return Ok(());
        }

        let entries = self.fs.read_dir(dir).map_err(io_error)?;
        ancestors.push(canonical);

        for path in entries {
            let kind = self.fs.entry_kind(&path).map_err(|source| DiscoveryError::Io {
                path: path.clone(),
                source,
            })?;

            match kind {
                EntryKind::Directory => self.walk(&path, ancestors, out)?,
                EntryKind::File if self.loader.is_loadable(&path) => self.bind_file(&path, out)?,
                _ => tracing::trace!(path = %path.display(), "Skipping non-module entry"),
            }
        }

        ancestors.pop();
        Ok(())
    }

    fn bind_file(&self, route_file: &Path, out: &mut Vec<BindingRecord>) -> Result<(), DiscoveryError> {
        let router = path_to_cwd(self.cwd, route_file);

        let routes = match self.loader.load(route_file) {
            Ok(Module::Data(Value::Object(routes))) => routes,
            Ok(_) => return Err(DiscoveryError::InvalidRouteModule { router }),
            Err(e) => {
                return Err(DiscoveryError::RouteLoad {
                    router,
                    source: Box::new(e),
                })
            }
        };

        let controller_file = pair_controller_path(route_file, self.router_root, self.controller_root);
        let controller_path = path_to_cwd(self.cwd, &controller_file);

        let controller = match self.loader.load(&controller_file) {
            Ok(Module::Controller(controller)) => controller,
            Ok(Module::Data(_)) => {
                return Err(DiscoveryError::InvalidControllerModule {
                    controller: controller_path,
                })
            }
            Err(LoadError::NotFound { .. }) => {
                return Err(DiscoveryError::ControllerNotFound {
                    controller: controller_path,
                })
            }
            Err(LoadError::Failed { source, .. }) => {
                return Err(DiscoveryError::ControllerLoad {
                    controller: controller_path,
                    source,
                })
            }
        };

        let before = out.len();
        binding::resolve_routes(&routes, &controller, &router, &controller_path, out)?;

        tracing::debug!(
            router = %router,
            controller = %controller_path,
            bindings = out.len() - before,
            "Route file bound"
        );
        Ok(())
    }
}

/// Discover bindings under `router_root` using the real filesystem and the
/// process working directory for provenance.
pub fn discover(
    router_root: &Path,
    controller_root: &Path,
    loader: &dyn ModuleLoader,
) -> Result<Vec<BindingRecord>, DiscoveryError> {
    let cwd = std::env::current_dir().map_err(|source| DiscoveryError::Io {
        path: ".".into(),
        source,
    })?;
    Discovery::new(router_root, controller_root, &cwd, loader).run()
}
