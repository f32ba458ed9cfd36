//! API error types for phone handlers
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl owns
//! the mapping to status codes and JSON bodies:
//!
//! | kind | status | body |
//! |---|---|---|
//! | `ValidationFailed` | 401 | `{status:false, message:"validation error", errors}` |
//! | `NotFound` | 404 | empty |
//! | `InternalError` | 500 | `{status:false, message}` (plus `error` for `get`) |
//!
//! # Example
//!
//! ```rust
//! use phone_inventory::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Phone", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("42".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use crate::validation::ValidationErrors;

/// Message sent with every validation rejection
pub const VALIDATION_MESSAGE: &str = "validation error";

/// Message sent when a single phone could not be loaded
pub const SHOW_FAILURE_MESSAGE: &str = "phone could not be retrieved";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing a page of phones
    List,
    /// Getting a single phone by ID
    Get,
    /// Creating a new phone
    Create,
    /// Updating an existing phone
    Update,
    /// Deleting a phone
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Request body failed the create rules
    ValidationFailed,
    /// The path id does not resolve to a phone
    NotFound,
    /// Anything else that went wrong while handling the request
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::NotFound => write!(f, "not_found"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind.
    ///
    /// Validation failures answer 401 so existing clients keep working.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Failure text; sent to the client for internal errors
    pub message: String,
    /// Per-field messages for validation failures
    pub errors: Option<ValidationErrors>,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            errors: None,
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// Create a validation failed error carrying per-field messages
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(
                ApiOperation::Create,
                ApiErrorKind::ValidationFailed,
                VALIDATION_MESSAGE,
            )
        }
    }

    /// Create an internal error
    pub fn internal(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InternalError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ValidationBody {
    status: bool,
    message: String,
    errors: ValidationErrors,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    status: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        match self.kind {
            ApiErrorKind::NotFound => {
                tracing::debug!(
                    operation = %self.operation,
                    entity_type = ?self.entity_type,
                    entity_id = ?self.entity_id,
                    "Phone not found"
                );
                status.into_response()
            }
            ApiErrorKind::ValidationFailed => {
                let errors = self.errors.unwrap_or_default();
                tracing::warn!(
                    operation = %self.operation,
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "Request rejected by validation"
                );
                let body = ValidationBody {
                    status: false,
                    message: self.message,
                    errors,
                };
                (status, Json(body)).into_response()
            }
            ApiErrorKind::InternalError => {
                tracing::error!(
                    operation = %self.operation,
                    entity_type = ?self.entity_type,
                    entity_id = ?self.entity_id,
                    "API error: {}", self.message
                );
                let body = if self.operation == ApiOperation::Get {
                    FailureBody {
                        status: false,
                        message: SHOW_FAILURE_MESSAGE.to_string(),
                        error: Some(self.message),
                    }
                } else {
                    FailureBody {
                        status: false,
                        message: self.message,
                        error: None,
                    }
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::List | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::FindById | RepositoryOperation::Ping => ApiOperation::Get,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::ConnectionFailed
            | RepositoryErrorKind::Timeout
            | RepositoryErrorKind::DatabaseError
            | RepositoryErrorKind::Other => ApiErrorKind::InternalError,
        };

        Self {
            operation,
            kind,
            message: err.message,
            errors: None,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}
