//! HTTP middleware shared by every route

pub mod request_tracking;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
    MakeTimeOrderedRequestId, REQUEST_ID_PREFIX, SENSITIVE_HEADERS,
};
