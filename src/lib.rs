//! Meshgate - admission-time validation for service-mesh gateway routes
//!
//! Meshgate guards a declaratively-managed `GatewayRoute` resource that
//! describes how traffic entering a mesh gateway is matched and forwarded to
//! virtual services. It runs as a validating admission webhook: every
//! create/update/delete of a GatewayRoute is checked synchronously before the
//! API server persists it.
//!
//! # Architecture
//!
//! The rule logic is kept free of transport types:
//! - [`validation`] holds the pure rule set (structural checks on create,
//!   immutable-field enforcement on update)
//! - [`webhook`] is a thin axum adapter that decodes admission reviews and
//!   dispatches to the validators
//! - [`cache`] is a namespace-indexed read cache of GatewayRoutes kept warm
//!   by a watcher, for consumers that need indexed lookups
//!
//! # Modules
//!
//! - [`crd`] - The GatewayRoute Custom Resource Definition
//! - [`validation`] - Structural and transition validation rules
//! - [`webhook`] - Admission webhook router and dispatch
//! - [`cache`] - Indexed object cache fed by a watcher
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod cache;
pub mod crd;
pub mod error;
pub mod validation;
pub mod webhook;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Default port for the webhook HTTPS server
///
/// Port 8443 is used instead of 443 to avoid requiring root privileges; the
/// webhook Service maps 443 to this port.
pub const DEFAULT_WEBHOOK_PORT: u16 = 8443;
