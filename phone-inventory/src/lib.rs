//! # phone-inventory
//!
//! REST service for a phone inventory: a paginated listing plus create, show,
//! update and delete over a single `phones` table.
//!
//! ## Features
//!
//! - **Storage**: PostgreSQL via sqlx, or an in-process store when no database is configured
//! - **Validation**: create requests are checked field by field with per-field messages
//! - **Middleware stack**: request ids, sensitive header masking, panic recovery, body limits, compression, CORS
//! - **Observability**: structured `tracing` logs in JSON or pretty format
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use phone_inventory::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(MemoryPhoneRepository::new(), config.clone());
//!
//!     Server::new(config).serve(router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::database::{create_pool, run_migrations};
    pub use crate::error::{DatabaseError, DatabaseOperation, Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, ApiOperation};
    pub use crate::health::{health, readiness};
    pub use crate::models::{NewPhone, Phone, PhoneChanges, PhoneId};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        MemoryPhoneRepository, Page, Pagination, PgPhoneRepository, PhoneRepository, PhoneStore,
        RepositoryError, RepositoryErrorKind, RepositoryResult, PER_PAGE,
    };
    pub use crate::routes::{api_routes, router};
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::validation::{CreatePhoneRequest, ValidationErrors};

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, patch, post, put},
        Json, Router,
    };
}
