//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (discovery summary, registrations, requests)
//!     → logging.rs installs the subscriber that formats them
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (router, controller, method, url)
//! - `RUST_LOG` overrides the configured level

pub mod logging;
