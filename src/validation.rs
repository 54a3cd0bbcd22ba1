//! Validation rules for GatewayRoute admission
//!
//! Two rule sets, both pure functions over spec snapshots:
//!
//! - [`validate_create`] checks structural well-formedness of a new route:
//!   exactly one route variant populated, matcher fields mutually consistent.
//! - [`validate_update`] enforces field-level immutability across an update,
//!   reporting every violated field in a single deterministic message.
//!
//! Rejection reasons are returned verbatim to the API server and are part of
//! the external contract; do not reword them.

use crate::crd::{GatewayRouteSpec, Hostname};
use crate::{Error, Result};

/// Kind name used in immutability rejection messages
const KIND: &str = "GatewayRoute";

/// Immutable spec fields, in the order they are reported
///
/// The scan iterates this declared order so rejection messages are
/// reproducible; never replace it with map iteration.
const IMMUTABLE_FIELDS: [&str; 3] = ["spec.awsName", "spec.meshRef", "spec.virtualGatewayRef"];

/// Validate a GatewayRoute spec on create
///
/// Exactly one of the gRPC, HTTP/2, and HTTP route variants must be
/// populated, and the variant's matcher must name at least one usable
/// criterion. Checks short-circuit: the first failing rule decides the
/// rejection reason.
///
/// For gRPC routes a present service name satisfies the matcher rule on its
/// own; hostname shape is not inspected further in that case.
pub fn validate_create(spec: &GatewayRouteSpec) -> Result<()> {
    match (&spec.grpc_route, &spec.http2_route, &spec.http_route) {
        (Some(grpc), None, None) => {
            let m = &grpc.match_;
            if m.service_name.is_none() && m.hostname.is_empty() {
                return Err(Error::validation(
                    "Either servicename or hostname must be specified",
                ));
            }
            Ok(())
        }
        (None, Some(http2), None) => {
            let m = &http2.match_;
            validate_prefix_and_hostname(m.prefix.as_deref(), &m.hostname)
        }
        (None, None, Some(http)) => {
            let m = &http.match_;
            validate_prefix_and_hostname(m.prefix.as_deref(), &m.hostname)
        }
        // zero or more than one populated variant
        _ => Err(Error::validation("No matching route specified")),
    }
}

/// Shared matcher rule for the HTTP and HTTP/2 route variants
///
/// A prefix match and a hostname match may not both be absent. When only a
/// hostname is given it must specify exactly one of `exact` and `suffix`.
/// A present prefix is accepted as-is; prefix well-formedness (e.g. a leading
/// slash) is not checked here.
fn validate_prefix_and_hostname(prefix: Option<&str>, hostname: &Hostname) -> Result<()> {
    if prefix.is_none() && hostname.is_empty() {
        return Err(Error::validation(
            "Either prefix or hostname must be specified",
        ));
    }
    if prefix.is_none() {
        match (&hostname.exact, &hostname.suffix) {
            (None, None) => {
                return Err(Error::validation(
                    "Either exact or suffix match for hostname must be specified",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(Error::validation(
                    "Both exact and suffix match for hostname are not allowed. Only one must be specified",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate a GatewayRoute update against its previous snapshot
///
/// Scans every immutable field (full scan, no short-circuit) and rejects with
/// all violated field paths joined in declaration order, so a client learns
/// every offending field from one response instead of fixing and retrying
/// field by field.
///
/// A field going absent-to-present, present-to-absent, or changing value all
/// count as a change; references compare by full value.
pub fn validate_update(new: &GatewayRouteSpec, old: &GatewayRouteSpec) -> Result<()> {
    let changed = changed_immutable_fields(new, old);
    if !changed.is_empty() {
        return Err(Error::validation(format!(
            "{} update may not change these fields: {}",
            KIND,
            changed.join(",")
        )));
    }
    Ok(())
}

/// Collect the dotted paths of immutable fields that differ between snapshots
fn changed_immutable_fields(new: &GatewayRouteSpec, old: &GatewayRouteSpec) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if new.aws_name != old.aws_name {
        changed.push(IMMUTABLE_FIELDS[0]);
    }
    if new.mesh_ref != old.mesh_ref {
        changed.push(IMMUTABLE_FIELDS[1]);
    }
    if new.virtual_gateway_ref != old.virtual_gateway_ref {
        changed.push(IMMUTABLE_FIELDS[2]);
    }
    changed
}
