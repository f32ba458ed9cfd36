//! HTTP handlers for the phone resource
//!
//! Handlers are generic over [`PhoneRepository`](crate::repository::PhoneRepository)
//! and take their store from [`AppState`](crate::state::AppState). Errors are
//! reported through [`ApiError`], whose `IntoResponse` impl decides status
//! codes and bodies.
//!
//! # Integration with Axum
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use phone_inventory::handlers::phones;
//!
//! let router: Router<AppState<MemoryPhoneRepository>> = Router::new()
//!     .route("/phones", get(phones::list).post(phones::create));
//! ```

mod error;
pub mod phones;
mod response;

// Re-export all public types
pub use error::{ApiError, ApiErrorKind, ApiOperation, SHOW_FAILURE_MESSAGE, VALIDATION_MESSAGE};
pub use response::{
    DeletedResponse, PhoneResponse, CREATED_MESSAGE, DELETED_MESSAGE, SHOW_MESSAGE,
    UPDATED_MESSAGE,
};
