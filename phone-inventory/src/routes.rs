//! Route table
//!
//! ```text
//! GET     /api/phones            list
//! POST    /api/phones            create
//! GET     /api/phones/{id}       show
//! PUT     /api/phones/{id}       update
//! PATCH   /api/phones/{id}       update
//! DELETE  /api/phones/{id}       destroy
//! GET     /health                liveness
//! GET     /ready                 readiness
//! ```

use axum::{routing::get, Router};

use crate::{handlers::phones, health, repository::PhoneRepository, state::AppState};

/// Phone resource routes, relative to the API prefix
pub fn api_routes<R: PhoneRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/phones", get(phones::list::<R>).post(phones::create::<R>))
        .route(
            "/phones/{id}",
            get(phones::show::<R>)
                .put(phones::update::<R>)
                .patch(phones::update::<R>)
                .delete(phones::destroy::<R>),
        )
}

/// Full application router with state attached
pub fn router<R: PhoneRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health::health::<R>))
        .route("/ready", get(health::readiness::<R>))
        .nest("/api", api_routes::<R>())
        .with_state(state)
}
