//! Router facade over discovery and the dispatch engine.
//!
//! # Responsibilities
//! - Resolve router and controller roots against the working directory
//! - Run discovery at construction; a failure means no facade
//! - Register discovered bindings with the engine on first materialization
//! - Forward URL generation to the engine
//!
//! # Design Decisions
//! - Composition: the engine is owned, not extended
//! - `materialize` is idempotent; bindings are registered exactly once and
//!   later calls only recompose the engine's middleware

use std::path::{Path, PathBuf};

use crate::discovery::{BindingRecord, Discovery, DiscoveryError, ModuleLoader};
use crate::paths::realpath;
use crate::routing::engine::{AxumEngine, DispatchEngine, RouteError, RouterOptions};
use crate::routing::pattern::UrlError;

/// Router root used when none is configured.
pub const DEFAULT_ROUTER_ROOT: &str = "/routers";
/// Controller root used when none is configured.
pub const DEFAULT_CONTROLLER_ROOT: &str = "/controllers";

/// Convention-based router: discovered bindings plus the engine serving them.
#[derive(Debug)]
pub struct Interceptors<E: DispatchEngine = AxumEngine> {
    engine: E,
    bindings: Vec<BindingRecord>,
    router_root: PathBuf,
    controller_root: PathBuf,
    materialized: bool,
}

/// Builder for [`Interceptors`].
#[derive(Debug, Clone, Default)]
pub struct InterceptorsBuilder {
    router_root: Option<String>,
    controller_root: Option<String>,
    options: RouterOptions,
    cwd: Option<PathBuf>,
}

impl InterceptorsBuilder {
    /// Directory holding route-definition files. Empty means the default.
    pub fn router_root(mut self, root: impl Into<String>) -> Self {
        self.router_root = Some(root.into());
        self
    }

    /// Directory holding controller modules. Empty means the default.
    pub fn controller_root(mut self, root: impl Into<String>) -> Self {
        self.controller_root = Some(root.into());
        self
    }

    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Working directory roots are resolved against. Defaults to the process's.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Discover routes and build a facade over an [`AxumEngine`] configured
    /// with the builder's options.
    pub fn build(self, loader: &dyn ModuleLoader) -> Result<Interceptors, DiscoveryError> {
        let engine = AxumEngine::new(&self.options);
        self.build_with(engine, loader)
    }

    /// Discover routes and build a facade over a caller-supplied engine.
    /// Router options are not applied to `engine`.
    pub fn build_with<E: DispatchEngine>(
        self,
        engine: E,
        loader: &dyn ModuleLoader,
    ) -> Result<Interceptors<E>, DiscoveryError> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir().map_err(|source| DiscoveryError::Io {
                path: ".".into(),
                source,
            })?,
        };

        let router_root = realpath(&cwd, or_default(self.router_root.as_deref(), DEFAULT_ROUTER_ROOT));
        let controller_root = realpath(
            &cwd,
            or_default(self.controller_root.as_deref(), DEFAULT_CONTROLLER_ROOT),
        );

        let bindings = Discovery::new(&router_root, &controller_root, &cwd, loader).run()?;

        Ok(Interceptors {
            engine,
            bindings,
            router_root,
            controller_root,
            materialized: false,
        })
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

impl Interceptors {
    pub fn builder() -> InterceptorsBuilder {
        InterceptorsBuilder::default()
    }

    /// Build with default roots and options.
    pub fn new(loader: &dyn ModuleLoader) -> Result<Self, DiscoveryError> {
        Self::builder().build(loader)
    }
}

impl<E: DispatchEngine> Interceptors<E> {
    /// Register every discovered binding (first call only) and return the
    /// engine's composed middleware.
    ///
    /// Fails on the first binding the engine refuses; nothing is marked as
    /// registered in that case.
    pub fn materialize(&mut self) -> Result<E::Middleware, RouteError> {
        if self.materialized {
            tracing::debug!("Routes already registered, recomposing");
        } else {
            for binding in &self.bindings {
                if let Err(e) = self.engine.register(binding.method(), binding.url(), binding.endpoint()) {
                    let provenance = binding.provenance();
                    tracing::error!(
                        method = binding.method(),
                        url = binding.url(),
                        router = %provenance.router,
                        error = %e,
                        "Route registration failed"
                    );
                    return Err(e);
                }
            }
            self.materialized = true;
            tracing::info!(bindings = self.bindings.len(), "Routes registered");
        }
        Ok(self.engine.routes())
    }

    /// Generate a URL from `pattern` and `params` via the engine.
    pub fn url(&self, pattern: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
        self.engine.url(pattern, params)
    }

    /// Bindings in discovery order.
    pub fn bindings(&self) -> &[BindingRecord] {
        &self.bindings
    }

    pub fn router_root(&self) -> &Path {
        &self.router_root
    }

    pub fn controller_root(&self) -> &Path {
        &self.controller_root
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
