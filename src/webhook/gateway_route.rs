//! GatewayRoute Validation Webhook
//!
//! Handles AdmissionReview requests for GatewayRoute resources: decodes the
//! old/new payloads and dispatches to the create/update validators. Deletes
//! are accepted without validation.

use axum::Json;
use kube::api::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info};

use crate::crd::GatewayRoute;
use crate::validation;
use crate::{Error, Result};

/// Handle a validating admission review for GatewayRoutes
pub async fn validate_handler(
    Json(body): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    // Convert review to request
    let req: AdmissionRequest<DynamicObject> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    Json(admit(&req).into_review())
}

/// Decide a single GatewayRoute admission request
///
/// Create runs the structural validator on the new object, Update runs the
/// transition validator on (new, old), and Delete is accepted unchanged. A
/// payload that does not decode into a GatewayRoute is denied with a decode
/// message rather than silently ignored.
pub fn admit(req: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let outcome = match req.operation {
        Operation::Create => {
            decode(req.object.as_ref()).and_then(|route| validation::validate_create(&route.spec))
        }
        Operation::Update => decode(req.object.as_ref()).and_then(|new| {
            let old = decode(req.old_object.as_ref())?;
            validation::validate_update(&new.spec, &old.spec)
        }),
        // Deletes carry no spec to validate
        Operation::Delete | Operation::Connect => Ok(()),
    };

    match outcome {
        Ok(()) => {
            debug!(
                uid = %req.uid,
                name = %req.name,
                namespace = ?req.namespace,
                operation = ?req.operation,
                "GatewayRoute admitted"
            );
            AdmissionResponse::from(req)
        }
        Err(e) => {
            if e.is_rejection() {
                info!(
                    uid = %req.uid,
                    name = %req.name,
                    namespace = ?req.namespace,
                    reason = %e,
                    "GatewayRoute rejected"
                );
            } else {
                error!(
                    uid = %req.uid,
                    name = %req.name,
                    namespace = ?req.namespace,
                    error = %e,
                    "GatewayRoute admission payload not decodable"
                );
            }
            AdmissionResponse::from(req).deny(e.to_string())
        }
    }
}

/// Decode a dynamic admission payload into a typed GatewayRoute
fn decode(obj: Option<&DynamicObject>) -> Result<GatewayRoute> {
    let obj = obj.ok_or_else(|| Error::decode("no object in request"))?;
    let value = serde_json::to_value(obj).map_err(|e| Error::decode(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ApiResource;
    use kube::core::GroupVersionKind;

    fn gateway_route_resource() -> ApiResource {
        ApiResource::from_gvk(&GroupVersionKind {
            group: "meshgate.dev".to_string(),
            version: "v1beta2".to_string(),
            kind: "GatewayRoute".to_string(),
        })
    }

    fn dynamic_route(spec: serde_json::Value) -> DynamicObject {
        let mut obj = DynamicObject::new("my-gr", &gateway_route_resource());
        obj.metadata.namespace = Some("awesome-ns".to_string());
        obj.data = serde_json::json!({ "spec": spec });
        obj
    }

    #[test]
    fn test_decode_valid_route() {
        let obj = dynamic_route(serde_json::json!({
            "httpRoute": {
                "match": {"prefix": "/"},
                "action": {
                    "target": {"virtualService": {"virtualServiceRef": {"name": "color"}}}
                }
            }
        }));
        let route = decode(Some(&obj)).expect("decodes");
        assert_eq!(route.metadata.name.as_deref(), Some("my-gr"));
        assert!(route.spec.http_route.is_some());
    }

    #[test]
    fn test_decode_missing_object_is_decode_error() {
        let err = decode(None).expect_err("no object");
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_malformed_spec_is_decode_error() {
        // A spec whose route variant is a bare string cannot be a GatewayRoute
        let obj = dynamic_route(serde_json::json!({ "httpRoute": "not-a-route" }));
        let err = decode(Some(&obj)).expect_err("malformed");
        assert!(matches!(err, Error::Decode(_)));
        assert!(!err.is_rejection());
    }
}
