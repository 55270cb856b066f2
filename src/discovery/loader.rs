//! Module loading capability.
//!
//! # Responsibilities
//! - Decide which files are loadable modules (by extension)
//! - Load route-definition data modules from disk
//! - Serve controller modules registered by the host binary
//!
//! # Design Decisions
//! - "Not found" and "failed" are distinct variants so callers can tell a
//!   missing controller from a broken one
//! - Controllers are keyed by module path without extension, so
//!   `controllers/users.toml` resolves to the controller registered at
//!   `controllers/users`
//! - Registered controllers shadow data files at the same module path

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::paths::normalize;
use crate::routing::controller::Controller;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Extensions (lower-case) recognized as loadable modules.
pub const MODULE_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Returns true if `path` carries a loadable module extension, ignoring case.
pub fn is_module_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MODULE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// A loaded module.
#[derive(Debug, Clone)]
pub enum Module {
    /// Parsed data exported by a TOML or JSON file.
    Data(Value),
    /// A handler table compiled into the host.
    Controller(Controller),
}

/// Error type for module loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no module at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("module {} failed to load: {source}", .path.display())]
    Failed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

/// Loads modules by absolute path.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<Module, LoadError>;

    /// Whether a file at `path` should be treated as a module at all.
    fn is_loadable(&self, path: &Path) -> bool {
        is_module_path(path)
    }
}

/// Default [`ModuleLoader`]: registered controllers plus data files on disk.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    controllers: HashMap<PathBuf, Controller>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller` at the absolute module path `path`.
    pub fn register(&mut self, path: impl AsRef<Path>, controller: Controller) -> &mut Self {
        self.controllers.insert(module_key(path.as_ref()), controller);
        self
    }

    /// Builder-style [`ModuleRegistry::register`].
    pub fn with_controller(mut self, path: impl AsRef<Path>, controller: Controller) -> Self {
        self.register(path, controller);
        self
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl ModuleLoader for ModuleRegistry {
    fn load(&self, path: &Path) -> Result<Module, LoadError> {
        if let Some(controller) = self.controllers.get(&module_key(path)) {
            return Ok(Module::Controller(controller.clone()));
        }
        load_data_module(path)
    }
}

fn module_key(path: &Path) -> PathBuf {
    let path = normalize(path);
    if is_module_path(&path) {
        path.with_extension("")
    } else {
        path
    }
}

/// Read and parse a TOML or JSON file into a dynamic value.
pub fn load_data_module(path: &Path) -> Result<Module, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Failed {
            path: path.to_path_buf(),
            source: Box::new(e),
        },
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed: Result<Value, BoxError> = if is_json {
        serde_json::from_str(&content).map_err(Into::into)
    } else {
        toml::from_str(&content).map_err(Into::into)
    };

    parsed.map(Module::Data).map_err(|source| LoadError::Failed {
        path: path.to_path_buf(),
        source,
    })
}
