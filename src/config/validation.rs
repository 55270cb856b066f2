//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check the route roots and router prefix are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("routes.{0} must not be empty")]
    EmptyRoot(&'static str),

    #[error("routes.router_root and routes.controller_root are both `{0}`")]
    SameRoots(String),

    #[error("router.prefix `{0}` must start with `/` and contain no parameters")]
    InvalidPrefix(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let router_root = config.routes.router_root.trim_matches('/');
    let controller_root = config.routes.controller_root.trim_matches('/');
    if router_root.is_empty() {
        errors.push(ValidationError::EmptyRoot("router_root"));
    }
    if controller_root.is_empty() {
        errors.push(ValidationError::EmptyRoot("controller_root"));
    }
    if !router_root.is_empty() && router_root == controller_root {
        errors.push(ValidationError::SameRoots(config.routes.router_root.clone()));
    }

    if let Some(prefix) = &config.router.prefix {
        let has_params = prefix.contains([':', '*', '{', '}']);
        if !prefix.starts_with('/') || has_params {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
