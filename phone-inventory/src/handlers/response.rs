//! Success response bodies
//!
//! Mutations and lookups answer with a `{status, message, phone}` envelope;
//! the listing answers with [`Page`](crate::repository::Page) directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::Phone;

pub const CREATED_MESSAGE: &str = "phone Created Successfully";
pub const SHOW_MESSAGE: &str = "phone Existes";
pub const UPDATED_MESSAGE: &str = "phone updated successfully";
pub const DELETED_MESSAGE: &str = "phone deleted successfully";

/// `{status:true, message, phone}`
#[derive(Debug, Clone, Serialize)]
pub struct PhoneResponse {
    pub status: bool,
    pub message: &'static str,
    pub phone: Phone,
}

impl PhoneResponse {
    pub fn new(message: &'static str, phone: Phone) -> Self {
        Self {
            status: true,
            message,
            phone,
        }
    }
}

impl IntoResponse for PhoneResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Delete acknowledgement.
///
/// Sent with 204 and a JSON body for compatibility with existing clients;
/// the HTTP connection layer may drop the body since 204 forbids one.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub status: bool,
    pub message: &'static str,
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self {
            status: true,
            message: DELETED_MESSAGE,
        }
    }
}

impl IntoResponse for DeletedResponse {
    fn into_response(self) -> Response {
        (StatusCode::NO_CONTENT, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn test_phone_envelope_shape() {
        let now = Utc::now();
        let response = PhoneResponse::new(
            CREATED_MESSAGE,
            Phone {
                id: 1,
                company: "apple".to_string(),
                model: "iphone 16 pro".to_string(),
                quantity: 12345,
                price: Decimal::from(1099),
                created_at: now,
                updated_at: now,
            },
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], json!(true));
        assert_eq!(value["message"], json!("phone Created Successfully"));
        assert_eq!(value["phone"]["company"], json!("apple"));
    }

    #[test]
    fn test_deleted_status() {
        let response = DeletedResponse::default().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let value = serde_json::to_value(DeletedResponse::default()).unwrap();
        assert_eq!(
            value,
            json!({"status": true, "message": "phone deleted successfully"})
        );
    }
}
