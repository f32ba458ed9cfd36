//! Request tracking middleware
//!
//! Every request gets an `x-request-id` (kept if the client sent one), the
//! id is echoed on the response, and credential headers are marked sensitive
//! so `TraceLayer` never prints them.

use http::{HeaderName, HeaderValue, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

/// Prefix of generated request ids
pub const REQUEST_ID_PREFIX: &str = "req";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Generates `req_<uuid v7>` ids; v7 keeps them time-sortable in logs
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTimeOrderedRequestId;

impl MakeRequestId for MakeTimeOrderedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("{}_{}", REQUEST_ID_PREFIX, Uuid::now_v7().simple());
        let header_value = HeaderValue::from_str(&id).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Create a request ID layer that fills in missing `x-request-id` headers
pub fn request_id_layer() -> SetRequestIdLayer<MakeTimeOrderedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTimeOrderedRequestId)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .map(|&h| HeaderName::from_static(h))
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
