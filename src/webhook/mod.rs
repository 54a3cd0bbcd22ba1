//! Validating Admission Webhook for meshgate
//!
//! This module provides the validating admission webhook that intercepts
//! GatewayRoute create/update/delete operations and checks them against the
//! rules in [`crate::validation`] before the API server persists them.
//!
//! The handlers are deliberately stateless: validation is a pure function of
//! the admission payload, so no client, cache, or lock is consulted per
//! request and arbitrarily many requests may be validated concurrently.

pub mod gateway_route;

use axum::{routing::post, Router};

/// Admission endpoint path for GatewayRoute validation
///
/// Follows the `/validate-<group>-<version>-<resource>` convention so the
/// path stays unique if further resource webhooks are registered later.
pub const API_PATH_VALIDATE_GATEWAY_ROUTE: &str = "/validate-meshgate-dev-v1beta2-gatewayroute";

/// Create the webhook router with all validation endpoints
///
/// Currently supports:
/// - POST /validate-meshgate-dev-v1beta2-gatewayroute - Validate GatewayRoutes
pub fn webhook_router() -> Router {
    Router::new().route(
        API_PATH_VALIDATE_GATEWAY_ROUTE,
        post(gateway_route::validate_handler),
    )
}
