//! Admission dispatch integration tests
//!
//! Drives serialized AdmissionReview payloads, as the API server would send
//! them, through the webhook dispatch path and checks the resulting
//! allow/deny decisions and reason strings.

use kube::api::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionReview};
use serde_json::{json, Value};

use meshgate::webhook::gateway_route::admit;

const UID: &str = "705ab4f5-6393-11e8-b7cc-42010a800002";

fn request(
    operation: &str,
    object: Option<Value>,
    old_object: Option<Value>,
) -> AdmissionRequest<DynamicObject> {
    let review = json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": UID,
            "kind": {"group": "meshgate.dev", "version": "v1beta2", "kind": "GatewayRoute"},
            "resource": {"group": "meshgate.dev", "version": "v1beta2", "resource": "gatewayroutes"},
            "requestKind": {"group": "meshgate.dev", "version": "v1beta2", "kind": "GatewayRoute"},
            "requestResource": {"group": "meshgate.dev", "version": "v1beta2", "resource": "gatewayroutes"},
            "name": "my-gr",
            "namespace": "awesome-ns",
            "operation": operation,
            "userInfo": {"username": "kubernetes-admin"},
            "object": object,
            "oldObject": old_object,
            "dryRun": false
        }
    });
    let review: AdmissionReview<DynamicObject> =
        serde_json::from_value(review).expect("valid AdmissionReview fixture");
    review.try_into().expect("review carries a request")
}

fn gateway_route(spec: Value) -> Value {
    json!({
        "apiVersion": "meshgate.dev/v1beta2",
        "kind": "GatewayRoute",
        "metadata": {"name": "my-gr", "namespace": "awesome-ns"},
        "spec": spec
    })
}

fn http_spec(prefix: &str) -> Value {
    json!({
        "httpRoute": {
            "match": {"prefix": prefix},
            "action": {
                "target": {"virtualService": {"virtualServiceRef": {"name": "color-service"}}}
            }
        }
    })
}

fn full_spec(aws_name: &str, mesh_name: &str) -> Value {
    let mut spec = http_spec("/");
    spec["awsName"] = json!(aws_name);
    spec["meshRef"] = json!({"name": mesh_name, "uid": "408d3036-7dec-11ea-b156-0e30aabe1ca8"});
    spec["virtualGatewayRef"] = json!({
        "name": "my-vg",
        "namespace": "gateway-ns",
        "uid": "346d3036-7dec-11ea-b678-0e30aabe1dg2"
    });
    spec
}

#[test]
fn create_with_valid_http_route_is_allowed() {
    let req = request("CREATE", Some(gateway_route(http_spec("/"))), None);
    let resp = admit(&req);
    assert!(resp.allowed);
    assert_eq!(resp.uid, UID);
}

#[test]
fn create_with_no_route_variant_is_denied() {
    let req = request("CREATE", Some(gateway_route(json!({}))), None);
    let resp = admit(&req);
    assert!(!resp.allowed);
    assert_eq!(resp.result.message, "No matching route specified");
}

#[test]
fn create_grpc_without_service_name_or_hostname_is_denied() {
    let spec = json!({
        "grpcRoute": {
            "match": {},
            "action": {
                "target": {"virtualService": {"virtualServiceRef": {"name": "greeter"}}}
            }
        }
    });
    let req = request("CREATE", Some(gateway_route(spec)), None);
    let resp = admit(&req);
    assert!(!resp.allowed);
    assert_eq!(
        resp.result.message,
        "Either servicename or hostname must be specified"
    );
}

#[test]
fn update_changing_immutable_fields_is_denied_with_all_violations() {
    let old = gateway_route(full_spec("my-gr_awesome-ns", "my-mesh"));
    let new = gateway_route(full_spec("my-gr_awesome-ns_my-cluster", "another-mesh"));
    let req = request("UPDATE", Some(new), Some(old));
    let resp = admit(&req);
    assert!(!resp.allowed);
    assert_eq!(
        resp.result.message,
        "GatewayRoute update may not change these fields: spec.awsName,spec.meshRef"
    );
}

#[test]
fn update_of_mutable_fields_is_allowed() {
    let old = gateway_route(full_spec("my-gr_awesome-ns", "my-mesh"));
    let mut new_spec = full_spec("my-gr_awesome-ns", "my-mesh");
    new_spec["priority"] = json!(42);
    new_spec["httpRoute"]["match"]["prefix"] = json!("/v2");
    let req = request("UPDATE", Some(gateway_route(new_spec)), Some(old));
    let resp = admit(&req);
    assert!(resp.allowed);
}

#[test]
fn delete_is_allowed_without_validation() {
    // Deletes arrive with only the old object; no rule set applies.
    let old = gateway_route(full_spec("my-gr_awesome-ns", "my-mesh"));
    let req = request("DELETE", None, Some(old));
    let resp = admit(&req);
    assert!(resp.allowed);
}

#[test]
fn undecodable_payload_is_denied_with_decode_message() {
    // The route variant must be an object; a bare string is a client defect,
    // reported distinctly from rule rejections.
    let req = request(
        "CREATE",
        Some(gateway_route(json!({"httpRoute": "not-a-route"}))),
        None,
    );
    let resp = admit(&req);
    assert!(!resp.allowed);
    assert!(
        resp.result
            .message
            .starts_with("failed to decode admission payload"),
        "unexpected message: {}",
        resp.result.message
    );
}

#[test]
fn update_missing_old_object_is_denied_as_decode_error() {
    let new = gateway_route(full_spec("my-gr_awesome-ns", "my-mesh"));
    let req = request("UPDATE", Some(new), None);
    let resp = admit(&req);
    assert!(!resp.allowed);
    assert!(resp
        .result
        .message
        .starts_with("failed to decode admission payload"));
}
