//! Supporting types for the GatewayRoute CRD

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hostname matching criteria for a gateway route
///
/// A value type: "empty" means neither field is set. At most one of `exact`
/// and `suffix` may be specified; that rule is enforced at admission, not in
/// the schema.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hostname {
    /// Match the full hostname exactly (e.g., "example.com")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,

    /// Match a hostname suffix (e.g., ".example.com")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Hostname {
    /// Returns true if neither exact nor suffix match is set
    pub fn is_empty(&self) -> bool {
        self.exact.is_none() && self.suffix.is_none()
    }
}

/// Matching criteria for a gRPC gateway route
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrpcGatewayRouteMatch {
    /// Fully qualified gRPC service name to match (e.g., "com.example.Greeter")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Hostname to match; absent fields mean no hostname matching
    #[serde(default, skip_serializing_if = "Hostname::is_empty")]
    pub hostname: Hostname,
}

/// Matching criteria for an HTTP or HTTP/2 gateway route
///
/// The same shape serves both `httpRoute` and `http2Route`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpGatewayRouteMatch {
    /// Path prefix to match (e.g., "/api")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Hostname to match; absent fields mean no hostname matching
    #[serde(default, skip_serializing_if = "Hostname::is_empty")]
    pub hostname: Hostname,
}

/// A gRPC route variant of a gateway route
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrpcGatewayRoute {
    /// Criteria for determining a request match
    #[serde(rename = "match")]
    pub match_: GrpcGatewayRouteMatch,

    /// Action taken when a request matches
    pub action: GatewayRouteAction,
}

/// An HTTP or HTTP/2 route variant of a gateway route
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpGatewayRoute {
    /// Criteria for determining a request match
    #[serde(rename = "match")]
    pub match_: HttpGatewayRouteMatch,

    /// Action taken when a request matches
    pub action: GatewayRouteAction,
}

/// Action to take for a matched request
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRouteAction {
    /// Target the matched request is forwarded to
    pub target: GatewayRouteTarget,
}

/// Forwarding target of a gateway route action
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRouteTarget {
    /// Virtual service the traffic is routed to
    pub virtual_service: GatewayRouteVirtualService,

    /// Port on the target; defaults to the virtual service's listener port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

/// Virtual service reference wrapper within a gateway route target
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRouteVirtualService {
    /// Reference to the VirtualService the traffic is routed to
    pub virtual_service_ref: VirtualServiceReference,
}

/// Reference to a VirtualService resource
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServiceReference {
    /// Namespace of the virtual service; defaults to the route's namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Name of the virtual service
    pub name: String,
}

/// Reference to the Mesh that owns a gateway route
///
/// Compared by full value during immutability checks: both `name` and `uid`
/// pin the route to one specific mesh object for its lifetime.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeshReference {
    /// Name of the mesh
    pub name: String,

    /// UID of the mesh object
    pub uid: String,
}

/// Reference to the VirtualGateway a route is attached to
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualGatewayReference {
    /// Namespace of the virtual gateway; defaults to the route's namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Name of the virtual gateway
    pub name: String,

    /// UID of the virtual gateway object
    pub uid: String,
}

/// Condition status following Kubernetes conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Kubernetes-style condition for status reporting
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct Condition {
    /// Type of condition (e.g., GatewayRouteActive)
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Machine-readable reason for the condition
    pub reason: String,

    /// Human-readable message
    pub message: String,

    /// Last time the condition transitioned
    #[serde(rename = "lastTransitionTime")]
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Create a new condition with the current timestamp
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason: reason.into(),
            message: message.into(),
            last_transition_time: Utc::now(),
        }
    }
}
