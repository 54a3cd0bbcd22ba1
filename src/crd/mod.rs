//! Custom Resource Definitions for meshgate
//!
//! This module contains the GatewayRoute CRD and its supporting types.

mod gateway_route;
mod types;

pub use gateway_route::{GatewayRoute, GatewayRouteSpec, GatewayRouteStatus};
pub use types::{
    Condition, ConditionStatus, GatewayRouteAction, GatewayRouteTarget, GatewayRouteVirtualService,
    GrpcGatewayRoute, GrpcGatewayRouteMatch, Hostname, HttpGatewayRoute, HttpGatewayRouteMatch,
    MeshReference, VirtualGatewayReference, VirtualServiceReference,
};
