//! GatewayRoute Custom Resource Definition
//!
//! A GatewayRoute describes how traffic arriving at a mesh virtual gateway is
//! matched (by gRPC service name, hostname, or path prefix) and which virtual
//! service it is forwarded to. Exactly one of the three route variants must be
//! populated; the admission webhook enforces that together with the matcher
//! rules and field immutability.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    Condition, GrpcGatewayRoute, HttpGatewayRoute, MeshReference, VirtualGatewayReference,
};

/// Specification for a GatewayRoute
///
/// The wire shape carries the three route variants as optional fields, as the
/// upstream mesh API does; "exactly one populated" is an admission-time
/// invariant, not a schema-level one.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "meshgate.dev",
    version = "v1beta2",
    kind = "GatewayRoute",
    plural = "gatewayroutes",
    shortname = "gr",
    status = "GatewayRouteStatus",
    namespaced,
    printcolumn = r#"{"name":"Arn","type":"string","jsonPath":".status.gatewayRouteArn"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRouteSpec {
    /// Mesh-side name of the route; defaults server-side to name_namespace
    ///
    /// Immutable after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_name: Option<String>,

    /// Priority for this route, lower values are matched first (0-1000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// gRPC route variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_route: Option<GrpcGatewayRoute>,

    /// HTTP/2 route variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2_route: Option<HttpGatewayRoute>,

    /// HTTP route variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_route: Option<HttpGatewayRoute>,

    /// Mesh that owns this route; populated by the controller at creation
    ///
    /// Immutable after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_ref: Option<MeshReference>,

    /// Virtual gateway this route is attached to; populated at creation
    ///
    /// Immutable after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_gateway_ref: Option<VirtualGatewayReference>,
}

/// Status for a GatewayRoute
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRouteStatus {
    /// ARN of the route in the mesh backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_route_arn: Option<String>,

    /// Generation observed by the route controller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Conditions representing the route state
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
